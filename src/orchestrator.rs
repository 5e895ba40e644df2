//! Result orchestration for one merged pull request.
//!
//! `Orchestrator` ties the pieces together:
//! 1. Resolving the organization, product and repository by name.
//! 2. Checking that a release is ongoing on the reference date.
//! 3. Running the calculation pipeline for the repository.
//! 4. Reshaping the calculated values into result records for the comment.

use crate::error::{MsgramError, Result};
use crate::models::{CalculatedCharacteristic, KeyValue, MsgBaseInfo, ResultRecord, TsqmiValue};
use crate::pipeline::{run_if_configured, Stage, StageOutput};
use crate::release::assert_release_ongoing;
use crate::resolver::resolve_in_listing;
use crate::service::MsgramApi;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Values surfaced from a full pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculationOutcome {
    pub characteristics: Vec<CalculatedCharacteristic>,
    pub tsqmi: TsqmiValue,
}

impl CalculationOutcome {
    pub fn into_record(self) -> ResultRecord {
        ResultRecord {
            characteristics: self
                .characteristics
                .into_iter()
                .map(|characteristic| KeyValue {
                    key: characteristic.key,
                    value: characteristic.latest.value,
                })
                .collect(),
            tsqmi: vec![KeyValue {
                key: "tsqmi".to_string(),
                value: self.tsqmi.value,
            }],
            ..ResultRecord::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct Orchestrator {
    /// Repository name as registered on MeasureSoftGram.
    pub repository: String,
    /// Owner login, matched against organization names.
    pub owner: String,
    pub product_name: String,
    /// Raw SonarQube snapshot submitted by the first stage.
    pub metrics: Value,
    /// Instant checked against release windows.
    pub reference_date: DateTime<Utc>,
}

impl Orchestrator {
    pub fn new(
        repository: impl Into<String>,
        owner: impl Into<String>,
        product_name: impl Into<String>,
        metrics: Value,
        reference_date: DateTime<Utc>,
    ) -> Self {
        Self {
            repository: repository.into(),
            owner: owner.into(),
            product_name: product_name.into(),
            metrics,
            reference_date,
        }
    }

    /// Produces one result record per ongoing release (currently always one).
    pub async fn calculate_results<A: MsgramApi>(&self, api: &A) -> Result<Vec<ResultRecord>> {
        let organizations = api.list_organizations().await?;
        let org_id = resolve_in_listing(&organizations, "organization", &self.owner)?;

        let products = api.list_products(org_id).await?;
        let product_id = resolve_in_listing(&products, "product", &self.product_name)?;

        let repositories = api.list_repositories(org_id, product_id).await?;
        let repo_id = resolve_in_listing(&repositories, "repository", &self.repository)?;

        let releases = api.list_releases(org_id, product_id).await?;
        let release = assert_release_ongoing(&releases, self.reference_date)?;
        tracing::info!(
            release = %release.name,
            release_id = release.id,
            org_id,
            product_id,
            repo_id,
            "Calculating results for ongoing release"
        );

        let identity = MsgBaseInfo::repository(org_id, product_id, repo_id);
        let outcome = self.create_metrics(api, identity).await?;

        Ok(vec![outcome.into_record()])
    }

    /// Submits the metrics and runs every calculation stage in order.
    pub async fn create_metrics<A: MsgramApi>(
        &self,
        api: &A,
        identity: MsgBaseInfo,
    ) -> Result<CalculationOutcome> {
        let mut characteristics = None;
        let mut tsqmi = None;

        for stage in Stage::sequence(self.metrics.clone()) {
            match run_if_configured(api, identity, stage).await? {
                StageOutput::Characteristics(values) => characteristics = Some(values),
                StageOutput::Tsqmi(value) => tsqmi = Some(value),
                StageOutput::MetricsInserted(_)
                | StageOutput::Measures(_)
                | StageOutput::Subcharacteristics(_) => {}
            }
        }

        match (characteristics, tsqmi) {
            (Some(characteristics), Some(tsqmi)) => Ok(CalculationOutcome {
                characteristics,
                tsqmi,
            }),
            _ => Err(MsgramError::NoData),
        }
    }
}
