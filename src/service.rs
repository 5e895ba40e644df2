//! The MeasureSoftGram operations a run depends on.
//!
//! [`MsgramApi`] has one method per remote operation so the pipeline can
//! dispatch stages exhaustively and tests can substitute an in-memory service.
//! [`RequestService`] is the HTTP implementation.

use crate::client::RemoteClient;
use crate::error::{MsgramError, Result};
use crate::fetcher;
use crate::models::{
    Calculation, CalculatedCharacteristic, CalculatedMeasure, CalculatedSubcharacteristic, Listing,
    MsgBaseInfo, MsgConfig, Organization, Product, Release, Repository, TsqmiValue,
};
use crate::uris;
use serde_json::Value;
use std::sync::Mutex;

#[allow(async_fn_in_trait)]
pub trait MsgramApi {
    async fn list_organizations(&self) -> Result<Listing<Organization>>;

    async fn list_products(&self, org_id: u64) -> Result<Listing<Product>>;

    async fn list_repositories(&self, org_id: u64, product_id: u64)
        -> Result<Listing<Repository>>;

    async fn list_releases(&self, org_id: u64, product_id: u64) -> Result<Vec<Release>>;

    /// Configuration Fetcher: the user-created configuration of the product.
    async fn get_current_config(&self, identity: &MsgBaseInfo) -> Result<MsgConfig>;

    async fn insert_metrics(&self, identity: &MsgBaseInfo, metrics: &Value) -> Result<Value>;

    async fn calculate_measures(&self, identity: &MsgBaseInfo) -> Result<Vec<CalculatedMeasure>>;

    async fn calculate_characteristics(
        &self,
        identity: &MsgBaseInfo,
    ) -> Result<Vec<CalculatedCharacteristic>>;

    async fn calculate_subcharacteristics(
        &self,
        identity: &MsgBaseInfo,
    ) -> Result<Vec<CalculatedSubcharacteristic>>;

    async fn calculate_tsqmi(&self, identity: &MsgBaseInfo) -> Result<TsqmiValue>;
}

/// HTTP-backed [`MsgramApi`].
pub struct RequestService {
    client: RemoteClient,
    base_url: String,
    last_config: Mutex<Option<MsgConfig>>,
}

impl RequestService {
    /// `host` is the service root, e.g. `https://measuresoft.herokuapp.com`.
    pub fn new(client: RemoteClient, host: &str) -> Self {
        Self {
            client,
            base_url: uris::api_base(host),
            last_config: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The most recent configuration document fetched successfully.
    pub fn last_config(&self) -> Option<MsgConfig> {
        self.last_config
            .lock()
            .ok()
            .and_then(|config| config.clone())
    }

    async fn calculate<T>(&self, identity: &MsgBaseInfo, calculation: Calculation) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let (org_id, product_id, repo_id) = identity.require_repository()?;
        let url = uris::calculate(&self.base_url, org_id, product_id, repo_id, calculation);
        tracing::info!(calculation = calculation.segment(), "Requesting calculation");
        self.client.post(&url, &calculation.payload()).await
    }
}

impl MsgramApi for RequestService {
    async fn list_organizations(&self) -> Result<Listing<Organization>> {
        self.client.get(&uris::organizations(&self.base_url)).await
    }

    async fn list_products(&self, org_id: u64) -> Result<Listing<Product>> {
        self.client
            .get(&uris::products(&self.base_url, org_id))
            .await
    }

    async fn list_repositories(
        &self,
        org_id: u64,
        product_id: u64,
    ) -> Result<Listing<Repository>> {
        self.client
            .get(&uris::repositories(&self.base_url, org_id, product_id))
            .await
    }

    async fn list_releases(&self, org_id: u64, product_id: u64) -> Result<Vec<Release>> {
        self.client
            .get(&uris::releases(&self.base_url, org_id, product_id))
            .await
    }

    async fn get_current_config(&self, identity: &MsgBaseInfo) -> Result<MsgConfig> {
        let config = fetcher::get_current_config(&self.client, &self.base_url, identity).await?;
        if let Ok(mut last) = self.last_config.lock() {
            *last = Some(config.clone());
        }
        Ok(config)
    }

    async fn insert_metrics(&self, identity: &MsgBaseInfo, metrics: &Value) -> Result<Value> {
        let (org_id, product_id, repo_id) = identity.require_repository()?;
        if metrics.is_null() {
            return Err(MsgramError::InsufficientArguments);
        }

        let url = uris::sonarqube_collector(&self.base_url, org_id, product_id, repo_id);
        tracing::info!("Submitting SonarQube metrics");
        self.client
            .request(reqwest::Method::POST, &url, Some(metrics))
            .await
    }

    async fn calculate_measures(&self, identity: &MsgBaseInfo) -> Result<Vec<CalculatedMeasure>> {
        self.calculate(identity, Calculation::Measures).await
    }

    async fn calculate_characteristics(
        &self,
        identity: &MsgBaseInfo,
    ) -> Result<Vec<CalculatedCharacteristic>> {
        self.calculate(identity, Calculation::Characteristics).await
    }

    async fn calculate_subcharacteristics(
        &self,
        identity: &MsgBaseInfo,
    ) -> Result<Vec<CalculatedSubcharacteristic>> {
        self.calculate(identity, Calculation::Subcharacteristics)
            .await
    }

    async fn calculate_tsqmi(&self, identity: &MsgBaseInfo) -> Result<TsqmiValue> {
        self.calculate(identity, Calculation::Tsqmi).await
    }
}
