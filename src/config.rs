//! Action configuration and environment variable parsing.
//!
//! GitHub exposes action inputs as `INPUT_<NAME>` variables (upper-cased, so
//! `sonarProjectKey` arrives as `INPUT_SONARPROJECTKEY`) and runner context as
//! `GITHUB_*` variables. Both are read with `envy`; a local `.env` file is
//! loaded first by the binary.

use crate::uris::DEFAULT_SERVICE_HOST;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// The owner of the repository (e.g., "fga-eps-mds").
    pub owner: String,
    /// The name of the repository (e.g., "2023-1-MeasureSoftGram-Action").
    pub repo: String,
}

impl RepoId {
    /// Parses an `owner/repo` pair, as found in `GITHUB_REPOSITORY`.
    pub fn parse(s: &str) -> Option<Self> {
        let (owner, repo) = s.trim().split_once('/')?;
        let (owner, repo) = (owner.trim(), repo.trim());
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(RepoId {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Inputs declared by the action, read from `INPUT_*` variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ActionInputs {
    /// SonarQube project key. Defaults to `{owner}_{repo}` when empty.
    #[serde(rename = "sonarprojectkey", default)]
    pub sonar_project_key: Option<String>,

    /// SonarQube host, e.g. `https://sonarcloud.io`.
    #[serde(default)]
    pub host: String,

    #[serde(rename = "sonartoken", default)]
    pub sonar_token: String,

    /// MeasureSoftGram product the repository belongs to.
    #[serde(rename = "productname", default)]
    pub product_name: String,

    /// Token used to comment on the pull request. Required.
    #[serde(rename = "githubtoken")]
    pub github_token: String,

    #[serde(rename = "msgramservicetoken", default)]
    pub msgram_service_token: String,
}

/// Context provided by the GitHub runner.
#[derive(Clone, Debug, Deserialize)]
pub struct RunnerEnv {
    #[serde(rename = "github_repository", deserialize_with = "deserialize_repo_id")]
    pub repository: RepoId,

    /// Path to the JSON payload of the triggering event.
    pub github_event_path: PathBuf,

    /// Directory the snapshot file is written under.
    #[serde(default = "default_workspace")]
    pub github_workspace: PathBuf,

    #[serde(default = "default_service_host")]
    pub msgram_service_host: String,
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

fn default_service_host() -> String {
    DEFAULT_SERVICE_HOST.to_string()
}

fn deserialize_repo_id<'de, D>(deserializer: D) -> Result<RepoId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    RepoId::parse(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("expected owner/repo, got '{s}'")))
}

/// Where and how to read SonarQube measures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SonarInfo {
    pub project_key: String,
    pub host: String,
    pub token: String,
}

/// Application configuration for one action run.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub inputs: ActionInputs,
    pub runner: RunnerEnv,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let inputs: ActionInputs = envy::prefixed("INPUT_")
            .from_env()
            .context("Failed to read action inputs")?;
        if inputs.github_token.trim().is_empty() {
            anyhow::bail!("Input required and not supplied: githubToken");
        }

        let runner: RunnerEnv = envy::from_env().context("Failed to read runner environment")?;

        Ok(Self { inputs, runner })
    }

    pub fn sonar_info(&self) -> SonarInfo {
        let project_key = self
            .inputs
            .sonar_project_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{}_{}",
                    self.runner.repository.owner, self.runner.repository.repo
                )
            });

        SonarInfo {
            project_key,
            host: self.inputs.host.clone(),
            token: self.inputs.sonar_token.clone(),
        }
    }
}
