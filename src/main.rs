use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use qilabel::config::{Args, Config};
use qilabel::{sheet, Error};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from(Args::parse());
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(Error::MissingInput(path)) = err.downcast_ref::<Error>() {
                println!("Error: missing csv({})", path.display());
            } else {
                error!("{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    info!(mode = ?config.mode, input = %config.input.display(), "startup");

    let records = sheet::load_records(config)?;
    println!("Found: {} vcards", records.len());

    sheet::write_sheet(&records, config)
        .with_context(|| format!("generating {}", config.output.display()))?;

    println!(
        "Avery 5164 label PDF generated and saved as '{}'.",
        config.output.display()
    );
    Ok(())
}
