//! Calculation pipeline: configuration-guarded dispatch of the five stages.
//!
//! Every stage re-checks that the product has a user-created configuration
//! before it runs. Stages do not consume each other's output; the order only
//! matters because the service computes each level from the one below.

use crate::error::{MsgramError, Result};
use crate::models::{
    CalculatedCharacteristic, CalculatedMeasure, CalculatedSubcharacteristic, MsgBaseInfo,
    TsqmiValue,
};
use crate::service::MsgramApi;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    /// Submit the raw SonarQube snapshot.
    InsertMetrics(Value),
    CalculateMeasures,
    CalculateCharacteristics,
    CalculateSubcharacteristics,
    CalculateTsqmi,
}

impl Stage {
    /// All stages, in the order the service needs them.
    pub fn sequence(metrics: Value) -> [Stage; 5] {
        [
            Stage::InsertMetrics(metrics),
            Stage::CalculateMeasures,
            Stage::CalculateCharacteristics,
            Stage::CalculateSubcharacteristics,
            Stage::CalculateTsqmi,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::InsertMetrics(_) => "insert-metrics",
            Stage::CalculateMeasures => "calculate-measures",
            Stage::CalculateCharacteristics => "calculate-characteristics",
            Stage::CalculateSubcharacteristics => "calculate-subcharacteristics",
            Stage::CalculateTsqmi => "calculate-tsqmi",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StageOutput {
    MetricsInserted(Value),
    Measures(Vec<CalculatedMeasure>),
    Characteristics(Vec<CalculatedCharacteristic>),
    Subcharacteristics(Vec<CalculatedSubcharacteristic>),
    Tsqmi(TsqmiValue),
}

/// Runs `stage` only if the product's configuration can be fetched.
///
/// The stage is dispatched at most once, with `identity` and the stage payload unchanged.
pub async fn run_if_configured<A: MsgramApi>(
    api: &A,
    identity: MsgBaseInfo,
    stage: Stage,
) -> Result<StageOutput> {
    if let Err(e) = api.get_current_config(&identity).await {
        tracing::error!(stage = stage.name(), error = %e, "Configuration check failed");
        return Err(MsgramError::ConfigurationUnavailable(Box::new(e)));
    }

    tracing::info!(stage = stage.name(), "Running stage");
    dispatch(api, &identity, stage).await
}

async fn dispatch<A: MsgramApi>(
    api: &A,
    identity: &MsgBaseInfo,
    stage: Stage,
) -> Result<StageOutput> {
    let output = match stage {
        Stage::InsertMetrics(metrics) => {
            StageOutput::MetricsInserted(api.insert_metrics(identity, &metrics).await?)
        }
        Stage::CalculateMeasures => StageOutput::Measures(api.calculate_measures(identity).await?),
        Stage::CalculateCharacteristics => {
            StageOutput::Characteristics(api.calculate_characteristics(identity).await?)
        }
        Stage::CalculateSubcharacteristics => {
            StageOutput::Subcharacteristics(api.calculate_subcharacteristics(identity).await?)
        }
        Stage::CalculateTsqmi => StageOutput::Tsqmi(api.calculate_tsqmi(identity).await?),
    };
    Ok(output)
}
