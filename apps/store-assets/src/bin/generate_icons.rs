use std::process::ExitCode;

use anyhow::{Context, Result};
use app_settings::AppSettings;
use store_assets::{generate_icon_set, logging};

fn main() -> ExitCode {
    logging::init();

    if let Err(err) = run() {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let settings = AppSettings::load().context("failed to load settings")?;

    for path in generate_icon_set(&settings.icons)? {
        println!("Created {}", path.display());
    }
    println!("All icons created successfully!");

    Ok(())
}
