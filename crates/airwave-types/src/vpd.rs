//! Vapor pressure deficit.

/// Compute the vapor pressure deficit in kPa.
///
/// Uses the Tetens approximation for saturation vapor pressure:
///
/// ```text
/// svp = 0.6108 * exp(17.27 * T / (T + 237.3))
/// avp = RH / 100 * svp
/// vpd = avp - svp
/// ```
///
/// `temperature_c` is taken to be in °C. The sign convention here is
/// actual minus saturation, so the result is never positive for humidity in
/// `0..=100`.
///
/// ```
/// use airwave_types::vapor_pressure_deficit;
///
/// assert_eq!(vapor_pressure_deficit(20.0, 100.0), 0.0);
/// assert!(vapor_pressure_deficit(25.0, 40.0) < 0.0);
/// ```
#[must_use]
pub fn vapor_pressure_deficit(temperature_c: f64, relative_humidity: f64) -> f64 {
    let saturation = saturation_vapor_pressure(temperature_c);
    let actual = relative_humidity / 100.0 * saturation;
    actual - saturation
}

/// Saturation vapor pressure in kPa at the given temperature (°C).
#[must_use]
pub fn saturation_vapor_pressure(temperature_c: f64) -> f64 {
    0.6108 * (17.27 * temperature_c / (temperature_c + 237.3)).exp()
}
