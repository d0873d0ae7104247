use clap::Parser;
use ocr_prep::config::{Args, Config};
use ocr_prep::driver;
use ocr_prep::error::ErrorReport;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when the input image cannot be decoded
const DECODE_FAILURE: u8 = 255;

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from(args);

    tracing::info!("Starting ocr-prep v{}", env!("CARGO_PKG_VERSION"));

    let mut viewer = driver::viewer_for(config.display);
    match driver::run(&config, viewer.as_mut()) {
        Ok(result) => {
            if config.report {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::warn!("Failed to serialize report: {}", e),
                }
            }
            tracing::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if config.report {
                if let Ok(json) = serde_json::to_string_pretty(&ErrorReport::from(&e)) {
                    println!("{}", json);
                }
            }

            if e.is_decode_failure() {
                eprintln!("Error: Could not read image at: {}", config.input.display());
                tracing::debug!("{}", e);
                ExitCode::from(DECODE_FAILURE)
            } else {
                tracing::error!("{:#}", anyhow::Error::from(e));
                ExitCode::FAILURE
            }
        }
    }
}
