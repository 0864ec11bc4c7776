//! In-memory [`Upstream`] for tests.

use super::{Account, ApiError, FormattedProfile, Upstream};
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeUpstream {
    pub accounts: HashMap<String, Account>,
    pub linked: HashMap<String, Result<Vec<Option<String>>, ApiError>>,
    pub tags: HashMap<String, Result<Vec<String>, ApiError>>,
    pub stats: HashMap<String, String>,
    pub profiles: HashMap<String, FormattedProfile>,
}

impl FakeUpstream {
    /// Registers a resolvable account with the given final kills/deaths.
    pub fn player(mut self, name: &str, id: &str, final_kills: u64, final_deaths: u64) -> Self {
        self.accounts.insert(
            name.to_string(),
            Account {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self.stats
            .insert(id.to_string(), stats_html(final_kills, final_deaths));
        self
    }

    pub fn tagged(mut self, name: &str, tags: Result<Vec<&str>, ApiError>) -> Self {
        self.tags.insert(
            name.to_string(),
            tags.map(|tags| tags.into_iter().map(String::from).collect()),
        );
        self
    }

    pub fn linked(mut self, id: &str, names: Vec<Option<&str>>) -> Self {
        self.linked.insert(
            id.to_string(),
            Ok(names.into_iter().map(|n| n.map(String::from)).collect()),
        );
        self
    }
}

pub fn stats_html(final_kills: u64, final_deaths: u64) -> String {
    format!(
        "<table><tr><td>Final Kills</td><td>{}</td></tr><tr><td>Final Deaths</td><td>{}</td></tr></table>",
        final_kills, final_deaths
    )
}

#[poise::async_trait]
impl Upstream for FakeUpstream {
    async fn resolve(&self, username: &str) -> Result<Account, ApiError> {
        self.accounts.get(username).cloned().ok_or(ApiError::NotFound)
    }

    async fn linked_names(&self, id: &str) -> Result<Vec<Option<String>>, ApiError> {
        self.linked.get(id).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn tags(&self, username: &str) -> Result<Vec<String>, ApiError> {
        self.tags
            .get(username)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn raw_stats(&self, id: &str) -> Result<String, ApiError> {
        self.stats
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::ProviderError("no stats".to_string()))
    }

    async fn formatted_profile(&self, id: &str) -> Result<FormattedProfile, ApiError> {
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::ProviderError("no profile".to_string()))
    }
}
