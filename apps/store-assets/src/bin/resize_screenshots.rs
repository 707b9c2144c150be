use std::process::ExitCode;

use anyhow::{Context, Result};
use app_settings::AppSettings;
use store_assets::{logging, screenshots};

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
    let shots = &settings.screenshots;

    let report = screenshots::run(shots)?;
    let elapsed = report.finished_at - report.started_at;

    println!();
    println!("Processing complete in {} ms", elapsed.num_milliseconds());
    println!("Output folder: {}", shots.output_dir.display());
    println!(
        "Processed {} screenshots ({} saved, {} failed)",
        report.total(),
        report.succeeded(),
        report.failed()
    );
    for (path, cause) in report.failures() {
        println!("  failed: {} ({cause})", path.display());
    }
    println!("Target size: {} pixels", shots.target());
    println!("Format: 24-bit PNG (no alpha)");

    Ok(())
}
