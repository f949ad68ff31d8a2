//! Hotel booking API - Application entry point
//!
//! CLI-based entry point that dispatches to various commands.

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hotel_booking::{
    cli::{Cli, Commands},
    commands,
    config::{Config, LogSettings},
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Flushes the log file when dropped at the end of main
    let _log_guard = init_tracing(&LogSettings::from_env(), cli.verbose);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {:?}", e);
        std::process::exit(1);
    }
}

/// Stdout plus a daily-rolling file under `LOG_DIR`.
///
/// `RUST_LOG` wins over `LOG_LEVEL`; `--verbose` forces debug.
fn init_tracing(settings: &LogSettings, verbose: bool) -> Option<WorkerGuard> {
    let filter = if verbose {
        EnvFilter::new("debug,sqlx=warn,sea_orm=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{},sqlx=warn,sea_orm=warn", settings.level))
        })
    };

    let (file_layer, guard) = match std::fs::create_dir_all(&settings.dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&settings.dir, settings.file_name());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("Cannot create log directory {}: {}", settings.dir, e);
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}
