mod logging;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use nycrental_core::AppConfig;
use nycrental_scraper::{
    ClassBListSource, ListingClassifier, PipelineConfig, PipelineOrchestrator, ProxiedFetcher,
};

#[derive(Debug, Parser)]
#[command(name = "nycrental")]
#[command(about = "Check regulated NYC addresses for active rental listings")]
#[command(version)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Cli::parse();
    let config = nycrental_core::load_app_config()?;

    let run_dir = create_run_dir(&config.output_dir)?;
    let _log_guard = logging::init(&config.log_level, &run_dir)?;

    tracing::info!(run_dir = %run_dir.display(), "starting listing audit run");
    let result = run(&config, &run_dir).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "run failed");
    }
    result
}

async fn run(config: &AppConfig, run_dir: &Path) -> anyhow::Result<()> {
    let source = ClassBListSource::from_app_config(config)?;
    let items = source
        .list_work_items()
        .await
        .context("failed to load regulated address list")?;

    let fetcher = ProxiedFetcher::from_app_config(config)?;
    let classifier = ListingClassifier::new(&config.no_listing_phrases);
    let pipeline =
        PipelineOrchestrator::new(fetcher, classifier, PipelineConfig::from_app_config(config));

    let outcome = pipeline.run(items).await;

    let results_path = run_dir.join(output::RESULTS_FILE);
    output::write_records(&results_path, &outcome.records)
        .with_context(|| format!("failed to write {}", results_path.display()))?;
    tracing::info!(
        path = %results_path.display(),
        rows = outcome.records.len(),
        "results written"
    );

    if outcome.aborted {
        anyhow::bail!(
            "run aborted after {} consecutive failures; partial results in {}",
            config.abort_threshold,
            results_path.display()
        );
    }
    Ok(())
}

/// Creates `<output_dir>/run_<YYYYmmddHHMMSS>/` for this run's artifacts.
fn create_run_dir(output_dir: &Path) -> anyhow::Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let run_dir = output_dir.join(format!("run_{stamp}"));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create run directory {}", run_dir.display()))?;
    Ok(run_dir)
}
