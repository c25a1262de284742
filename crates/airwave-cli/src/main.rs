use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use airwave_cli::cli::{Cli, Commands, ConfigAction};
use airwave_cli::commands::{ReadArgs, WatchArgs, cmd_config, cmd_read, cmd_scan, cmd_watch};
use airwave_cli::config::{Config, resolve_sensors, resolve_timeout};
use airwave_cli::format::FormatOptions;

/// Default read timeout in seconds, matching the `--timeout` default.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "airwave", &mut io::stdout());
        return Ok(());
    }

    // Initialize tracing
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config_path = Config::path(cli.config.as_deref());
    // A broken file must not block `config path` or `config init --force`
    let config = match cli.command {
        Commands::Config {
            action: ConfigAction::Path | ConfigAction::Init { .. },
        } => Config::default(),
        _ => Config::load(&config_path)?,
    };
    tracing::debug!("Using config file {}", config_path.display());

    let opts = FormatOptions::new(cli.no_color || config.no_color).with_compact(cli.compact);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::Scan {
            timeout,
            format,
            all,
            no_header,
        } => {
            let opts = opts.with_no_header(no_header);
            cmd_scan(timeout, format, all, output, cli.quiet, &opts).await?;
        }
        Commands::Read { device, output: out } => {
            let sensors = resolve_sensors(
                device.device.as_deref(),
                device.model,
                out.unit_override(),
                &config,
            )?;
            let timeout = resolve_timeout(device.timeout, &config, DEFAULT_TIMEOUT_SECS);
            let opts = opts.with_no_header(out.no_header);
            cmd_read(ReadArgs {
                sensors,
                timeout: Duration::from_secs(timeout),
                format: out.format,
                output,
                quiet: cli.quiet,
                opts: &opts,
            })
            .await?;
        }
        Commands::Watch {
            device,
            output: out,
            interval,
            count,
        } => {
            let sensors = resolve_sensors(
                device.device.as_deref(),
                device.model,
                out.unit_override(),
                &config,
            )?;
            let timeout = resolve_timeout(device.timeout, &config, DEFAULT_TIMEOUT_SECS);
            let opts = opts.with_no_header(out.no_header);
            cmd_watch(WatchArgs {
                sensors,
                interval,
                count,
                timeout: Duration::from_secs(timeout),
                format: out.format,
                output,
                opts: &opts,
            })
            .await?;
        }
        Commands::Config { action } => {
            cmd_config(action, &config_path, &config)?;
        }
        // Handled above
        Commands::Completions { .. } => {}
    }

    Ok(())
}
