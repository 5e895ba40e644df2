//! SonarQube measures collector.
//!
//! The snapshot is forwarded untouched to the MeasureSoftGram SonarQube
//! collector, which knows the `component_tree` shape.

use crate::config::SonarInfo;
use anyhow::Context;
use reqwest::{Client, Url};
use serde_json::Value;

/// Metrics requested from SonarQube for every component.
pub const METRIC_KEYS: [&str; 12] = [
    "files",
    "functions",
    "complexity",
    "comment_lines_density",
    "duplicated_lines_density",
    "coverage",
    "ncloc",
    "tests",
    "test_errors",
    "test_failures",
    "test_execution_time",
    "security_rating",
];

pub const DEFAULT_PAGE_SIZE: u32 = 500;

const MEASURES_ERROR: &str = "Error getting project measures from SonarQube. \
    Please make sure you provided the host and token inputs.";

pub struct Sonarqube {
    http: Client,
    info: SonarInfo,
}

impl Sonarqube {
    pub fn new(info: SonarInfo) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(crate::client::DEFAULT_TIMEOUT)
            .build()
            .context("Failed to build SonarQube HTTP client")?;
        Ok(Self { http, info })
    }

    pub fn measures_url(&self, page_size: u32) -> anyhow::Result<Url> {
        let endpoint = format!(
            "{}/api/measures/component_tree",
            self.info.host.trim_end_matches('/')
        );
        let metric_keys = METRIC_KEYS.join(",");
        let page_size = page_size.to_string();

        Url::parse_with_params(
            &endpoint,
            [
                ("component", self.info.project_key.as_str()),
                ("metricKeys", metric_keys.as_str()),
                ("ps", page_size.as_str()),
            ],
        )
        .with_context(|| format!("Invalid SonarQube host '{}'", self.info.host))
    }

    /// Fetches the component tree measures of the configured project.
    pub async fn get_measures(&self, page_size: u32) -> anyhow::Result<Value> {
        let url = self.measures_url(page_size)?;
        tracing::info!(project = %self.info.project_key, "Fetching SonarQube measures");

        let mut request = self.http.get(url);
        if !self.info.token.is_empty() {
            request = request.basic_auth(&self.info.token, Some(""));
        }

        let metrics: Value = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .context(MEASURES_ERROR)?
            .json()
            .await
            .context(MEASURES_ERROR)?;

        Ok(metrics)
    }
}
