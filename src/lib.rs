pub mod client;
pub mod comment;
pub mod config;
pub mod error;
pub mod event;
pub mod fetcher;
pub mod github;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod release;
pub mod resolver;
pub mod service;
pub mod snapshot;
pub mod sonarqube;
pub mod uris;

#[cfg(test)]
mod testing;

use anyhow::Context;
use chrono::Utc;
use client::{ClientConfig, RemoteClient};
use config::AppConfig;
use event::EventPayload;
use github::GitHubClient;
use orchestrator::Orchestrator;
use service::RequestService;
use sonarqube::{Sonarqube, DEFAULT_PAGE_SIZE};

/// Runs the action for the event described by `config`.
///
/// Anything other than a merged pull request is a silent no-op.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let event = EventPayload::load(&config.runner.github_event_path)?;
    let Some(pr_number) = event.merged_pull_request() else {
        tracing::info!("Event is not a merged pull request; nothing to do");
        return Ok(());
    };

    let repo_id = &config.runner.repository;
    tracing::info!(repo_id = %repo_id, pr_number, "Starting MeasureSoftGram action");

    let sonarqube = Sonarqube::new(config.sonar_info())?;
    let metrics = sonarqube.get_measures(DEFAULT_PAGE_SIZE).await?;

    let client = RemoteClient::new(&ClientConfig::new(
        config.inputs.msgram_service_token.clone(),
    ))?;
    let service = RequestService::new(client, &config.runner.msgram_service_host);

    let orchestrator = Orchestrator::new(
        repo_id.repo.clone(),
        repo_id.owner.clone(),
        config.inputs.product_name.clone(),
        metrics,
        Utc::now(),
    );
    let results = orchestrator.calculate_results(&service).await?;

    if let Some(current) = service.last_config() {
        let path = snapshot::save_msg_json(&config.runner.github_workspace, &current)
            .context("Failed to save the configuration snapshot")?;
        tracing::info!(path = %path.display(), "Saved configuration snapshot");
    }

    let message = comment::create_message(&results);
    let github = GitHubClient::new(config.inputs.github_token.clone())?;
    github
        .create_or_update_comment(repo_id, pr_number, &message)
        .await?;

    Ok(())
}
