//! In-memory [`MsgramApi`] used by unit tests.

use crate::error::Result;
use crate::fetcher::ensure_created;
use crate::models::{
    CalculatedIndicator, ConfigData, LatestValue, Listing, MsgBaseInfo, MsgConfig, Organization,
    Product, ProductActions, Release, Repository, TsqmiValue,
};
use crate::service::MsgramApi;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    ListOrganizations,
    ListProducts(u64),
    ListRepositories(u64, u64),
    ListReleases(u64, u64),
    GetCurrentConfig(MsgBaseInfo),
    InsertMetrics(MsgBaseInfo, Value),
    CalculateMeasures(MsgBaseInfo),
    CalculateCharacteristics(MsgBaseInfo),
    CalculateSubcharacteristics(MsgBaseInfo),
    CalculateTsqmi(MsgBaseInfo),
}

pub(crate) struct FakeApi {
    calls: Mutex<Vec<Call>>,
    config: MsgConfig,
    releases: Vec<Release>,
}

impl FakeApi {
    /// `fga-eps-mds` / `MeasureSoftGram` / `2023-1-MeasureSoftGram-Action`, all id 1,
    /// with one release covering June 2023.
    pub(crate) fn measuresoftgram() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            config: MsgConfig {
                id: 1,
                name: "MSGRAM-1".to_string(),
                data: ConfigData::default(),
                created_at: "2023-06-01T10:00:00Z".to_string(),
                created_config: true,
            },
            releases: vec![Release {
                id: 1,
                name: "Sprint 10".to_string(),
                start_at: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
                end_at: Utc.with_ymd_and_hms(2023, 6, 30, 23, 59, 59).unwrap(),
                created_by: Some(1),
            }],
        }
    }

    pub(crate) fn without_created_config(mut self) -> Self {
        self.config.created_config = false;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn listing<T>(results: Vec<T>) -> Listing<T> {
    Listing {
        count: results.len() as u64,
        next: None,
        previous: None,
        results,
    }
}

fn indicator(id: u64, key: &str, value: f64) -> CalculatedIndicator {
    CalculatedIndicator {
        id,
        key: key.to_string(),
        name: None,
        description: None,
        latest: LatestValue {
            id,
            value,
            created_at: "2023-06-19T10:00:00Z".to_string(),
            parent_id: Some(id),
        },
    }
}

impl MsgramApi for FakeApi {
    async fn list_organizations(&self) -> Result<Listing<Organization>> {
        self.record(Call::ListOrganizations);
        Ok(listing(vec![Organization {
            id: 1,
            url: String::new(),
            name: "fga-eps-mds".to_string(),
            key: Some("fga-eps-mds".to_string()),
            description: None,
            products: vec![],
            actions: BTreeMap::new(),
        }]))
    }

    async fn list_products(&self, org_id: u64) -> Result<Listing<Product>> {
        self.record(Call::ListProducts(org_id));
        Ok(listing(vec![Product {
            id: 1,
            url: String::new(),
            name: "MeasureSoftGram".to_string(),
            key: None,
            organization: None,
            description: None,
            repositories: vec![],
            actions: ProductActions::default(),
        }]))
    }

    async fn list_repositories(
        &self,
        org_id: u64,
        product_id: u64,
    ) -> Result<Listing<Repository>> {
        self.record(Call::ListRepositories(org_id, product_id));
        Ok(listing(vec![Repository {
            id: 1,
            url: String::new(),
            name: "2023-1-MeasureSoftGram-Action".to_string(),
            key: None,
            description: None,
            product: None,
            latest_values: Value::Null,
            historical_values: Value::Null,
            actions: BTreeMap::new(),
        }]))
    }

    async fn list_releases(&self, org_id: u64, product_id: u64) -> Result<Vec<Release>> {
        self.record(Call::ListReleases(org_id, product_id));
        Ok(self.releases.clone())
    }

    async fn get_current_config(&self, identity: &MsgBaseInfo) -> Result<MsgConfig> {
        self.record(Call::GetCurrentConfig(*identity));
        let (_, product_id) = identity.require_product()?;
        ensure_created(self.config.clone(), product_id)
    }

    async fn insert_metrics(&self, identity: &MsgBaseInfo, metrics: &Value) -> Result<Value> {
        self.record(Call::InsertMetrics(*identity, metrics.clone()));
        Ok(json!({ "detail": "created" }))
    }

    async fn calculate_measures(&self, identity: &MsgBaseInfo) -> Result<Vec<CalculatedIndicator>> {
        self.record(Call::CalculateMeasures(*identity));
        Ok(vec![indicator(1, "passed_tests", 1.0)])
    }

    async fn calculate_characteristics(
        &self,
        identity: &MsgBaseInfo,
    ) -> Result<Vec<CalculatedIndicator>> {
        self.record(Call::CalculateCharacteristics(*identity));
        Ok(vec![indicator(1, "reliability", 0.9254618113429579)])
    }

    async fn calculate_subcharacteristics(
        &self,
        identity: &MsgBaseInfo,
    ) -> Result<Vec<CalculatedIndicator>> {
        self.record(Call::CalculateSubcharacteristics(*identity));
        Ok(vec![indicator(1, "testing_status", 0.5)])
    }

    async fn calculate_tsqmi(&self, identity: &MsgBaseInfo) -> Result<TsqmiValue> {
        self.record(Call::CalculateTsqmi(*identity));
        identity.require_repository()?;
        Ok(TsqmiValue {
            id: 1,
            value: 0.8359399436161667,
            created_at: "2023-06-19T10:00:00Z".to_string(),
        })
    }
}
