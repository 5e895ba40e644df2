use crate::client::RemoteClient;
use crate::error::{MsgramError, Result};
use crate::models::{MsgBaseInfo, MsgConfig, Product};
use crate::uris;

/// Fetches the indicator configuration a user created for the product.
///
/// Two hops: the product detail, then the pre-config link it advertises. The
/// second URL is followed verbatim, never rebuilt from a template.
pub async fn get_current_config(
    client: &RemoteClient,
    base: &str,
    identity: &MsgBaseInfo,
) -> Result<MsgConfig> {
    let (org_id, product_id) = identity.require_product()?;

    let url = uris::product_detail(base, org_id, product_id);
    tracing::debug!(url = %url, "Fetching product detail");
    let product: Product = client.get(&url).await?;

    let link = product
        .current_config_link()
        .ok_or(MsgramError::ConfigurationDiscovery)?;
    tracing::debug!(link = %link, "Following current pre-config link");
    let config: MsgConfig = client.get(link.as_str()).await?;

    ensure_created(config, product_id)
}

/// Rejects the placeholder document the service returns before a user configured anything.
pub fn ensure_created(config: MsgConfig, product_id: u64) -> Result<MsgConfig> {
    if config.created_config {
        Ok(config)
    } else {
        Err(MsgramError::ConfigurationNotCreated { product_id })
    }
}
