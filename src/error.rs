//! Failure taxonomy for a MeasureSoftGram run.
//!
//! Every variant carries a human-readable message; the binary reports it as the
//! reason the action failed. Nothing here is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MsgramError {
    /// A required identity field (org, product, repository) was absent or zero.
    #[error("Insufficient arguments provided to find object of calculation.")]
    InsufficientArguments,

    /// A name lookup failed against a listing.
    #[error("Entity {0} does not exist.")]
    EntityNotFound(String),

    /// The reference date falls outside every release window.
    #[error("No release is happening on {0}.")]
    NoOngoingRelease(String),

    /// The product detail did not advertise a pre-config link.
    #[error(
        "Error. It wasn't possible to get products actions urls. Check if you generated a release."
    )]
    ConfigurationDiscovery,

    /// The remote service returned its placeholder configuration.
    #[error(
        "Error: The user didn't created a release configuration for product {product_id}. \
         Please go to your MeasureSoftgram account and create one for this product."
    )]
    ConfigurationNotCreated { product_id: u64 },

    /// A calculation stage was refused because the configuration check failed.
    #[error("Error: The current configurations couldn't be recovered. {0}")]
    ConfigurationUnavailable(#[source] Box<MsgramError>),

    /// Transport failure, timeout, or a response without a usable payload.
    #[error("No data received from the API.")]
    NoData,

    /// The service answered with a non-2xx status.
    #[error("The API responded with status {status} for {url}.")]
    Status { status: u16, url: String },

    #[error("Not possible to write .json: {0}")]
    Snapshot(#[from] std::io::Error),
}

pub type Result<T, E = MsgramError> = std::result::Result<T, E>;
