mod config;
mod errors;
mod extraction;
mod llm_client;
mod pipeline;
mod profile;
mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::ai::AiExtractor;
use crate::llm_client::GroqClient;
use crate::pipeline::assembler::ProfileAssembler;
use crate::pipeline::batch::BatchCoordinator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credential or malformed numbers)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting alumni processor v{}", env!("CARGO_PKG_VERSION"));

    storage::ensure_input_dir(&config.input_dir).await?;

    let llm = GroqClient::new(
        config.groq_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
        config.llm_max_attempts,
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let coordinator = BatchCoordinator::new(ProfileAssembler::new(AiExtractor::new(Arc::new(llm))));

    let paths = storage::discover_inputs(&config.input_dir).await?;
    info!(
        "Found {} input files in {}",
        paths.len(),
        config.input_dir.display()
    );

    let mut inputs = Vec::with_capacity(paths.len());
    for path in &paths {
        inputs.push(storage::load_input(path).await);
    }

    let run = coordinator.run(inputs).await;

    for outcome in &run.outcomes {
        if let Err(e) = &outcome.result {
            warn!("Skipped {}[{}] ({})", outcome.source, outcome.index, e.code());
        }
    }

    for (ordinal, assembled) in run.profiles().enumerate() {
        match storage::write_profile(&config.output_dir, &assembled.profile, ordinal).await {
            Ok(path) => info!("Saved {}", path.display()),
            Err(e) => error!(
                "Could not save {}: {:#}",
                assembled.profile.display_name(),
                e
            ),
        }
    }

    storage::write_report(&config.output_dir, &run.report).await?;

    let report = &run.report;
    info!(
        "Processing complete: {}/{} succeeded, {} failed, average quality {:.2}, \
         {} with skills, {} missing batch, {} missing company, {} heuristic fallbacks",
        report.successfully_processed,
        report.total_profiles,
        report.failed,
        report.average_quality_score,
        report.profiles_with_skills,
        report.profiles_with_missing_batch,
        report.profiles_with_missing_company,
        report.heuristic_fallbacks
    );

    Ok(())
}
