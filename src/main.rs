use anyhow::Result;
use tracing::info;

use camper_scout::config::AppConfig;
use camper_scout::pipeline::Harvester;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("camper_scout=debug".parse()?),
        )
        .init();

    info!("Starting camper-scout...");

    let config = AppConfig::load()?;
    let report = Harvester::new(config)?.run()?;

    info!(
        "Scrape finished: {} pages scanned, {} listings collected, {} matched the threshold, {} exported, {} dropped",
        report.pages_scanned, report.summaries, report.matched, report.exported, report.dropped
    );

    Ok(())
}
