//! Byte-layout decoders for the Wave current-values characteristic.
//!
//! Both hardware revisions publish a 20-byte little-endian record on the same
//! characteristic, but with different field layouts:
//!
//! | Model | Layout | Fields used |
//! |-------|--------|-------------|
//! | Wave | 4 × `u8`, 8 × `u16` | humidity (byte 1), radon (words 4, 5), temperature (word 6) |
//! | Wave Plus | pad, `i8`, pad, `i8`, 6 × `u16`, 4 pad | humidity, light, radon ×2, temperature, pressure, CO2, VOC |
//!
//! Decoding is all-or-nothing: a buffer of the wrong length is rejected before
//! any field is read.

use bytes::Buf;

use crate::error::{ParseError, ParseResult};
use crate::types::{MeasurementKey, Measurements, WaveModel};
use crate::vpd::vapor_pressure_deficit;

/// Length of a Wave (first generation) reading.
pub const WAVE_READING_BYTES: usize = 20;

/// Length of a Wave Plus reading.
pub const WAVE_PLUS_READING_BYTES: usize = 20;

/// Divisor turning raw Wave radon counts into pCi/L (1 pCi/L = 37 Bq/m³).
pub const RADON_BQ_PER_PCI: f64 = 37.0;

impl WaveModel {
    /// Exact length of a reading for this model.
    #[must_use]
    pub fn reading_len(&self) -> usize {
        match self {
            WaveModel::Wave => WAVE_READING_BYTES,
            WaveModel::WavePlus => WAVE_PLUS_READING_BYTES,
        }
    }

    /// Decode a raw reading using this model's layout.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if `data` is not exactly
    /// [`reading_len`](Self::reading_len) bytes.
    pub fn decode(&self, data: &[u8]) -> ParseResult<Measurements> {
        match self {
            WaveModel::Wave => decode_wave(data),
            WaveModel::WavePlus => decode_wave_plus(data),
        }
    }
}

fn check_len(data: &[u8], expected: usize) -> ParseResult<()> {
    match data.len() {
        n if n < expected => Err(ParseError::InsufficientBytes {
            expected,
            actual: n,
        }),
        n if n > expected => Err(ParseError::UnexpectedLength {
            expected,
            actual: n,
        }),
        _ => Ok(()),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Decode a first-generation Wave reading (`<4B8H`).
///
/// - byte 1: humidity in half-percent
/// - word 4: short-term radon, raw Bq/m³ (stored as pCi/L, 2 decimals)
/// - word 5: long-term radon, raw Bq/m³ (stored as pCi/L, 2 decimals)
/// - word 6: temperature in hundredths of a degree
///
/// The remaining bytes and words are ignored.
///
/// # Errors
///
/// Returns [`ParseError::InsufficientBytes`] or [`ParseError::UnexpectedLength`]
/// unless `data` is exactly [`WAVE_READING_BYTES`] long.
pub fn decode_wave(data: &[u8]) -> ParseResult<Measurements> {
    check_len(data, WAVE_READING_BYTES)?;

    let mut buf = data;
    let _version = buf.get_u8();
    let humidity_raw = buf.get_u8();
    buf.advance(2);
    let words: [u16; 8] = std::array::from_fn(|_| buf.get_u16_le());

    let humidity = f64::from(humidity_raw) / 2.0;
    // Assumed Celsius; the device's configured unit is never queried.
    let temperature = f64::from(words[6]) / 100.0;

    let mut values = Measurements::new();
    values.insert(MeasurementKey::Humidity, humidity);
    values.insert(
        MeasurementKey::ShortRadon,
        round2(f64::from(words[4]) / RADON_BQ_PER_PCI),
    );
    values.insert(
        MeasurementKey::LongRadon,
        round2(f64::from(words[5]) / RADON_BQ_PER_PCI),
    );
    values.insert(MeasurementKey::Temperature, temperature);
    values.insert(
        MeasurementKey::Vpd,
        vapor_pressure_deficit(temperature, humidity),
    );
    Ok(values)
}

/// Decode a Wave Plus reading (`<xbxbHHHHHHxxxx`).
///
/// - byte 1: humidity in half-percent (signed)
/// - byte 3: light (signed)
/// - words: short-term radon, long-term radon (Bq/m³), temperature (1/100 °C),
///   pressure (1/50 hPa), CO2 (ppm), VOC (ppb)
///
/// # Errors
///
/// Returns [`ParseError::InsufficientBytes`] or [`ParseError::UnexpectedLength`]
/// unless `data` is exactly [`WAVE_PLUS_READING_BYTES`] long.
pub fn decode_wave_plus(data: &[u8]) -> ParseResult<Measurements> {
    check_len(data, WAVE_PLUS_READING_BYTES)?;

    let mut buf = data;
    buf.advance(1);
    let humidity_raw = buf.get_i8();
    buf.advance(1);
    let light_raw = buf.get_i8();
    let short_radon = buf.get_u16_le();
    let long_radon = buf.get_u16_le();
    let temp_raw = buf.get_u16_le();
    let pressure_raw = buf.get_u16_le();
    let co2 = buf.get_u16_le();
    let voc = buf.get_u16_le();

    let humidity = f64::from(humidity_raw) / 2.0;
    // Assumed Celsius; the device's configured unit is never queried.
    let temperature = f64::from(temp_raw) / 100.0;

    let mut values = Measurements::new();
    values.insert(MeasurementKey::Humidity, humidity);
    values.insert(MeasurementKey::Light, f64::from(light_raw));
    values.insert(MeasurementKey::ShortRadon, f64::from(short_radon));
    values.insert(MeasurementKey::LongRadon, f64::from(long_radon));
    values.insert(MeasurementKey::Temperature, temperature);
    values.insert(MeasurementKey::Pressure, f64::from(pressure_raw) / 50.0);
    values.insert(MeasurementKey::Co2, f64::from(co2));
    values.insert(MeasurementKey::Voc, f64::from(voc));
    values.insert(
        MeasurementKey::Vpd,
        vapor_pressure_deficit(temperature, humidity),
    );
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a Wave record from its humidity byte and eight words.
    fn wave_bytes(humidity: u8, words: [u16; 8]) -> Vec<u8> {
        let mut out = vec![0x01, humidity, 0x00, 0x00];
        for w in words {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out
    }

    /// Build a Wave Plus record from its signed bytes and six words.
    fn wave_plus_bytes(humidity: i8, light: i8, words: [u16; 6]) -> Vec<u8> {
        let mut out = vec![0x01, humidity as u8, 0x00, light as u8];
        for w in words {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0, 0, 0]);
        out
    }

    #[test]
    fn test_decode_wave_humidity_and_radon() {
        // byte 1 = 0x28 (40) -> 20.0 %, word 4 = 100 -> 100/37 = 2.70 pCi/L
        let bytes = wave_bytes(0x28, [0, 0, 0, 0, 100, 37, 2150, 0]);
        assert_eq!(bytes.len(), WAVE_READING_BYTES);

        let values = decode_wave(&bytes).unwrap();
        assert_eq!(values.get(MeasurementKey::Humidity), Some(20.0));
        assert_eq!(values.get(MeasurementKey::ShortRadon), Some(2.70));
        assert_eq!(values.get(MeasurementKey::LongRadon), Some(1.0));
        assert_eq!(values.get(MeasurementKey::Temperature), Some(21.5));
    }

    #[test]
    fn test_decode_wave_keys() {
        let values = decode_wave(&[0u8; WAVE_READING_BYTES]).unwrap();
        let keys: Vec<_> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                MeasurementKey::Humidity,
                MeasurementKey::Temperature,
                MeasurementKey::ShortRadon,
                MeasurementKey::LongRadon,
                MeasurementKey::Vpd,
            ]
        );
        assert!(!values.contains(MeasurementKey::Co2));
        assert!(!values.contains(MeasurementKey::Pressure));
    }

    #[test]
    fn test_decode_wave_ignores_other_fields() {
        let a = decode_wave(&wave_bytes(80, [0, 0, 0, 0, 370, 740, 2000, 0])).unwrap();
        let b = decode_wave(&wave_bytes(80, [0xFFFF, 1, 2, 3, 370, 740, 2000, 0xAAAA])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_wave_includes_vpd() {
        let values = decode_wave(&wave_bytes(100, [0, 0, 0, 0, 0, 0, 2500, 0])).unwrap();
        let expected = vapor_pressure_deficit(25.0, 50.0);
        assert_eq!(values.get(MeasurementKey::Vpd), Some(expected));
    }

    #[test]
    fn test_decode_wave_plus_fields() {
        let bytes = wave_plus_bytes(
            90,  // 45.0 %
            12,  // light
            [
                55,    // short radon
                48,    // long radon
                2234,  // 22.34 °C
                50650, // 1013.0 hPa
                612,   // ppm
                143,   // ppb
            ],
        );
        assert_eq!(bytes.len(), WAVE_PLUS_READING_BYTES);

        let values = decode_wave_plus(&bytes).unwrap();
        assert_eq!(values.get(MeasurementKey::Humidity), Some(45.0));
        assert_eq!(values.get(MeasurementKey::Light), Some(12.0));
        assert_eq!(values.get(MeasurementKey::ShortRadon), Some(55.0));
        assert_eq!(values.get(MeasurementKey::LongRadon), Some(48.0));
        assert_eq!(values.get(MeasurementKey::Temperature), Some(22.34));
        assert_eq!(values.get(MeasurementKey::Pressure), Some(1013.0));
        assert_eq!(values.get(MeasurementKey::Co2), Some(612.0));
        assert_eq!(values.get(MeasurementKey::Voc), Some(143.0));
        assert!(values.get(MeasurementKey::Vpd).unwrap() < 0.0);
        assert_eq!(values.len(), 9);
    }

    #[test]
    fn test_decode_wave_plus_signed_bytes() {
        let values = decode_wave_plus(&wave_plus_bytes(-2, -1, [0; 6])).unwrap();
        assert_eq!(values.get(MeasurementKey::Humidity), Some(-1.0));
        assert_eq!(values.get(MeasurementKey::Light), Some(-1.0));
    }

    #[test]
    fn test_decode_short_buffer_fails() {
        let err = decode_wave(&[0u8; 13]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InsufficientBytes {
                expected: 20,
                actual: 13
            }
        );
        assert!(err.to_string().contains("requires 20 bytes"));

        assert!(matches!(
            decode_wave_plus(&[]),
            Err(ParseError::InsufficientBytes { actual: 0, .. })
        ));
    }

    #[test]
    fn test_decode_long_buffer_fails() {
        let err = decode_wave_plus(&[0u8; 24]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedLength {
                expected: 20,
                actual: 24
            }
        );
    }

    #[test]
    fn test_model_decode_dispatch() {
        let bytes = wave_bytes(60, [0, 0, 0, 0, 0, 0, 1800, 0]);
        let via_model = WaveModel::Wave.decode(&bytes).unwrap();
        assert_eq!(via_model, decode_wave(&bytes).unwrap());
        assert_eq!(WaveModel::Wave.reading_len(), 20);
        assert_eq!(WaveModel::WavePlus.reading_len(), 20);
    }
}

/// Property-based tests for the decoders.
///
/// ```bash
/// cargo test -p airwave-types decode::proptests
/// ```
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Random buffers of any length never panic.
        #[test]
        fn decode_never_panics(data: Vec<u8>) {
            let _ = decode_wave(&data);
            let _ = decode_wave_plus(&data);
        }

        /// Any buffer shorter than the layout fails without a partial result.
        #[test]
        fn short_buffers_are_rejected(data in proptest::collection::vec(any::<u8>(), 0..20)) {
            let is_insufficient = matches!(
                decode_wave(&data),
                Err(ParseError::InsufficientBytes { .. })
            );
            prop_assert!(is_insufficient);
            let is_insufficient = matches!(
                decode_wave_plus(&data),
                Err(ParseError::InsufficientBytes { .. })
            );
            prop_assert!(is_insufficient);
        }

        #[test]
        fn wave_conversions(data in proptest::collection::vec(any::<u8>(), 20)) {
            let values = decode_wave(&data).unwrap();
            let word = |i: usize| u16::from_le_bytes([data[4 + 2 * i], data[5 + 2 * i]]);

            prop_assert_eq!(values.get(MeasurementKey::Humidity), Some(f64::from(data[1]) / 2.0));
            prop_assert_eq!(values.get(MeasurementKey::Temperature), Some(f64::from(word(6)) / 100.0));
            prop_assert_eq!(
                values.get(MeasurementKey::ShortRadon),
                Some((f64::from(word(4)) / 37.0 * 100.0).round() / 100.0)
            );
        }

        #[test]
        fn wave_plus_conversions(data in proptest::collection::vec(any::<u8>(), 20)) {
            let values = decode_wave_plus(&data).unwrap();
            let word = |i: usize| u16::from_le_bytes([data[4 + 2 * i], data[5 + 2 * i]]);

            prop_assert_eq!(values.get(MeasurementKey::Pressure), Some(f64::from(word(3)) / 50.0));
            prop_assert_eq!(values.get(MeasurementKey::Co2), Some(f64::from(word(4))));
            prop_assert_eq!(values.get(MeasurementKey::Voc), Some(f64::from(word(5))));
        }
    }
}
