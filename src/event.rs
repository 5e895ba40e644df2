use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// The parts of a GitHub event payload the action looks at.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    #[serde(default)]
    pub merged: Option<bool>,
}

impl EventPayload {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse event payload {}", path.display()))
    }

    /// Number of the pull request, when the event is a merged pull request.
    pub fn merged_pull_request(&self) -> Option<u64> {
        self.pull_request
            .as_ref()
            .filter(|pr| pr.merged == Some(true))
            .map(|pr| pr.number)
    }
}
