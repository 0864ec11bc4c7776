//! Upstream Minecraft statistics providers.

mod client;
#[cfg(test)]
pub mod fake;
mod model;

pub use client::HttpUpstream;
pub use model::{Account, FormattedProfile};

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The identity provider has no record of the player.
    #[error("player not found")]
    NotFound,
    /// The provider rejected our api key.
    #[error("provider rejected the api key")]
    ProviderDegraded,
    #[error("provider request failed: {0}")]
    ProviderError(String),
}

impl From<reqwest::Error> for ApiError {
    /// Drops the url, whose query may carry an api key.
    fn from(e: reqwest::Error) -> Self {
        ApiError::ProviderError(e.without_url().to_string())
    }
}

/// Every third-party lookup the bot performs.
///
/// Implementations must not retry; each call is one request.
#[poise::async_trait]
pub trait Upstream: Send + Sync {
    /// Exact username to canonical account. Any failure is [`ApiError::NotFound`].
    async fn resolve(&self, username: &str) -> Result<Account, ApiError>;

    /// Names the correlation provider links to the account id.
    async fn linked_names(&self, id: &str) -> Result<Vec<Option<String>>, ApiError>;

    /// Raw reputation tag types for a username, in provider order.
    async fn tags(&self, username: &str) -> Result<Vec<String>, ApiError>;

    /// HTML stats fragment for an account id.
    async fn raw_stats(&self, id: &str) -> Result<String, ApiError>;

    async fn formatted_profile(&self, id: &str) -> Result<FormattedProfile, ApiError>;
}
