//! Records exchanged with the MeasureSoftGram service.
//!
//! All records are fetched fresh for every run and never mutated locally.

use crate::error::{MsgramError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Measure keys sent to `calculate/measures/`.
pub const MEASURE_KEYS: [&str; 6] = [
    "passed_tests",
    "test_builds",
    "test_coverage",
    "non_complex_file_density",
    "commented_file_density",
    "duplication_absense",
];

/// Characteristic keys sent to `calculate/characteristics/`.
pub const CHARACTERISTIC_KEYS: [&str; 2] = ["reliability", "maintainability"];

/// Subcharacteristic keys sent to `calculate/subcharacteristics/`.
pub const SUBCHARACTERISTIC_KEYS: [&str; 2] = ["modifiability", "testing_status"];

/// Identity tuple threaded through every remote operation.
///
/// A zero id is treated the same as a missing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MsgBaseInfo {
    pub org_id: Option<u64>,
    pub product_id: Option<u64>,
    pub repo_id: Option<u64>,
    pub release_id: Option<u64>,
}

impl MsgBaseInfo {
    pub fn repository(org_id: u64, product_id: u64, repo_id: u64) -> Self {
        Self {
            org_id: Some(org_id),
            product_id: Some(product_id),
            repo_id: Some(repo_id),
            release_id: None,
        }
    }

    pub fn require_product(&self) -> Result<(u64, u64)> {
        match (present(self.org_id), present(self.product_id)) {
            (Some(org_id), Some(product_id)) => Ok((org_id, product_id)),
            _ => Err(MsgramError::InsufficientArguments),
        }
    }

    pub fn require_repository(&self) -> Result<(u64, u64, u64)> {
        let (org_id, product_id) = self.require_product()?;
        let repo_id = present(self.repo_id).ok_or(MsgramError::InsufficientArguments)?;
        Ok((org_id, product_id, repo_id))
    }
}

fn present(id: Option<u64>) -> Option<u64> {
    id.filter(|id| *id != 0)
}

/// Anything that can be resolved by name from a listing.
pub trait Entity {
    fn id(&self) -> u64;
    fn name(&self) -> &str;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub actions: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub actions: ProductActions,
}

impl Product {
    /// The link to the product's current pre-config, if the service advertised a usable one.
    pub fn current_config_link(&self) -> Option<&LinkedResource> {
        self.actions
            .current_pre_config
            .as_ref()
            .filter(|link| !link.as_str().trim().is_empty())
    }
}

/// Action links published on a product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductActions {
    #[serde(
        rename = "get current pre-config",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_pre_config: Option<LinkedResource>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// An absolute URL handed out by the service, followed verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkedResource(String);

impl LinkedResource {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub latest_values: Value,
    #[serde(default)]
    pub historical_values: Value,
    #[serde(default)]
    pub actions: BTreeMap<String, Value>,
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(impl Entity for $ty {
            fn id(&self) -> u64 {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_entity!(Organization, Product, Repository);

/// One page of a paginated listing. Only `results` drives resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    #[serde(alias = "release_name")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_start_bound")]
    pub start_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_end_bound")]
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<u64>,
}

impl Release {
    /// Whether `instant` lies in `[start_at, end_at]`, both bounds inclusive.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_at <= instant && instant <= self.end_at
    }
}

/// Parses a release bound. Bare dates are pinned to the start or the end of that day (UTC).
fn parse_bound(raw: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let naive = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    naive.map(|naive| naive.and_utc())
}

fn deserialize_bound<'de, D>(deserializer: D, end_of_day: bool) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_bound(raw.trim(), end_of_day)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid release date: {raw}")))
}

fn deserialize_start_bound<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_bound(deserializer, false)
}

fn deserialize_end_bound<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_bound(deserializer, true)
}

/// Indicator configuration (thresholds and weights) authored by a user.
///
/// `created_config == false` marks the placeholder the service returns before
/// anyone configured the product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsgConfig {
    pub id: u64,
    pub name: String,
    pub data: ConfigData,
    pub created_at: String,
    pub created_config: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub key: String,
    pub weight: f64,
    #[serde(default)]
    pub subcharacteristics: Vec<Subcharacteristic>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subcharacteristic {
    pub key: String,
    pub weight: f64,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub key: String,
    pub weight: f64,
}

/// Latest stored value of a calculated indicator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatestValue {
    pub id: u64,
    pub value: f64,
    pub created_at: String,
    #[serde(
        default,
        alias = "measure_id",
        alias = "characteristic_id",
        alias = "subcharacteristic_id"
    )]
    pub parent_id: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculatedIndicator {
    pub id: u64,
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub latest: LatestValue,
}

pub type CalculatedMeasure = CalculatedIndicator;
pub type CalculatedCharacteristic = CalculatedIndicator;
pub type CalculatedSubcharacteristic = CalculatedIndicator;

/// The top-level quality index of a repository.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TsqmiValue {
    pub id: u64,
    pub value: f64,
    pub created_at: String,
}

/// The four server-side calculations, in dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Calculation {
    Measures,
    Characteristics,
    Subcharacteristics,
    Tsqmi,
}

impl Calculation {
    pub fn segment(self) -> &'static str {
        match self {
            Calculation::Measures => "measures",
            Calculation::Characteristics => "characteristics",
            Calculation::Subcharacteristics => "subcharacteristics",
            Calculation::Tsqmi => "tsqmi",
        }
    }

    /// Request body for the calculation: the fixed key list, or `{}` for the index.
    pub fn payload(self) -> Value {
        match self {
            Calculation::Measures => keyed_payload("measures", &MEASURE_KEYS),
            Calculation::Characteristics => keyed_payload("characteristics", &CHARACTERISTIC_KEYS),
            Calculation::Subcharacteristics => {
                keyed_payload("subcharacteristics", &SUBCHARACTERISTIC_KEYS)
            }
            Calculation::Tsqmi => Value::Object(Map::new()),
        }
    }
}

fn keyed_payload(field: &str, keys: &[&str]) -> Value {
    let entries = keys
        .iter()
        .map(|key| serde_json::json!({ "key": key }))
        .collect();
    let mut body = Map::new();
    body.insert(field.to_string(), Value::Array(entries));
    Value::Object(body)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: f64,
}

/// Per-release result handed to the comment formatter.
///
/// Only `characteristics` and `tsqmi` are filled today.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub characteristics: Vec<KeyValue>,
    pub subcharacteristics: Vec<KeyValue>,
    pub measures: Vec<KeyValue>,
    pub repository: Vec<KeyValue>,
    pub tsqmi: Vec<KeyValue>,
    pub version: Vec<KeyValue>,
}
