//! REST resource paths of the MeasureSoftGram service.
//!
//! Every function takes the `{host}/api/v1/` base produced by [`api_base`] and the
//! ids it needs; nothing here performs I/O.

use crate::models::Calculation;

/// Default MeasureSoftGram service used when `MSGRAM_SERVICE_HOST` is not set.
pub const DEFAULT_SERVICE_HOST: &str = "https://measuresoft.herokuapp.com";

pub fn api_base(host: &str) -> String {
    format!("{}/api/v1/", host.trim_end_matches('/'))
}

pub fn organizations(base: &str) -> String {
    format!("{base}organizations/")
}

pub fn organization_detail(base: &str, org_id: u64) -> String {
    format!("{base}organizations/{org_id}/")
}

pub fn products(base: &str, org_id: u64) -> String {
    format!("{}products/", organization_detail(base, org_id))
}

pub fn product_detail(base: &str, org_id: u64, product_id: u64) -> String {
    format!("{}{product_id}/", products(base, org_id))
}

pub fn repositories(base: &str, org_id: u64, product_id: u64) -> String {
    format!("{}repositories/", product_detail(base, org_id, product_id))
}

pub fn repository_detail(base: &str, org_id: u64, product_id: u64, repo_id: u64) -> String {
    format!("{}{repo_id}/", repositories(base, org_id, product_id))
}

pub fn releases(base: &str, org_id: u64, product_id: u64) -> String {
    format!("{}release/", product_detail(base, org_id, product_id))
}

pub fn sonarqube_collector(base: &str, org_id: u64, product_id: u64, repo_id: u64) -> String {
    format!(
        "{}collectors/sonarqube/",
        repository_detail(base, org_id, product_id, repo_id)
    )
}

pub fn calculate(
    base: &str,
    org_id: u64,
    product_id: u64,
    repo_id: u64,
    calculation: Calculation,
) -> String {
    format!(
        "{}calculate/{}/",
        repository_detail(base, org_id, product_id, repo_id),
        calculation.segment()
    )
}
