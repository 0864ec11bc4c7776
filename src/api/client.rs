use super::{
    model::{FormattedResponse, QuickbuyResponse, UrchinResponse},
    Account, ApiError, FormattedProfile, Upstream,
};
use crate::settings::Settings;
use anyhow::{Context, Result};
use reqwest::{StatusCode, Url};
use std::time::Duration;

const API_KEY_HEADER: &str = "API-Key";
const INVALID_KEY_DETAIL: &str = "Invalid API key";

/// [`Upstream`] backed by the real providers over HTTP.
pub struct HttpUpstream {
    http: reqwest::Client,
    mojang_url: String,
    polsu_url: String,
    urchin_url: String,
    bwstats_url: String,
    polsu_key: String,
    urchin_key: String,
}

impl HttpUpstream {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("Failed to build http client.")?;

        Ok(Self {
            http,
            mojang_url: settings.mojang_url.clone(),
            polsu_url: settings.polsu_url.clone(),
            urchin_url: settings.urchin_url.clone(),
            bwstats_url: settings.bwstats_url.clone(),
            polsu_key: settings.polsu_key.clone(),
            urchin_key: settings.urchin_key.clone(),
        })
    }
}

/// Appends path segments to a base url, percent-encoding each one.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = Url::parse(base).map_err(|e| ApiError::ProviderError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::ProviderError(format!("'{}' cannot be a base url", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[poise::async_trait]
impl Upstream for HttpUpstream {
    async fn resolve(&self, username: &str) -> Result<Account, ApiError> {
        let url = endpoint(
            &self.mojang_url,
            &["users", "profiles", "minecraft", username],
        )
        .map_err(|_| ApiError::NotFound)?;

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!(
                    "Identity lookup for '{}' failed: {}",
                    username,
                    e.without_url()
                );
                return Err(ApiError::NotFound);
            }
        };

        if response.status() != StatusCode::OK {
            log::debug!(
                "Identity lookup for '{}' returned {}",
                username,
                response.status()
            );
            return Err(ApiError::NotFound);
        }

        response.json::<Account>().await.map_err(|e| {
            log::warn!("Undecodable identity for '{}': {}", username, e.without_url());
            ApiError::NotFound
        })
    }

    async fn linked_names(&self, id: &str) -> Result<Vec<Option<String>>, ApiError> {
        let url = endpoint(&self.polsu_url, &["polsu", "bedwars", "quickbuy", "all"])?;

        let response = self
            .http
            .get(url)
            .query(&[("uuid", id)])
            .header(API_KEY_HEADER, &self.polsu_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<QuickbuyResponse>().await?.linked_names()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::ProviderDegraded),
            status => Err(ApiError::ProviderError(format!("quickbuy returned {}", status))),
        }
    }

    async fn tags(&self, username: &str) -> Result<Vec<String>, ApiError> {
        let url = endpoint(&self.urchin_url, &["player", username])?;

        let response = self
            .http
            .get(url)
            .query(&[("api_key", &self.urchin_key)])
            .send()
            .await?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ApiError::ProviderDegraded);
        }
        if status != StatusCode::OK {
            return Err(ApiError::ProviderError(format!("urchin returned {}", status)));
        }

        let body = response.json::<UrchinResponse>().await?;
        if body.detail.as_deref() == Some(INVALID_KEY_DETAIL) {
            return Err(ApiError::ProviderDegraded);
        }

        Ok(body.tag_types())
    }

    async fn raw_stats(&self, id: &str) -> Result<String, ApiError> {
        let url = endpoint(&self.bwstats_url, &["user", id])?;

        let response = self.http.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ApiError::ProviderError(format!(
                "bwstats returned {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    async fn formatted_profile(&self, id: &str) -> Result<FormattedProfile, ApiError> {
        let url = endpoint(&self.polsu_url, &["polsu", "bedwars", "formatted"])?;

        let response = self
            .http
            .get(url)
            .query(&[("uuid", id)])
            .header(API_KEY_HEADER, &self.polsu_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ApiError::ProviderDegraded)
            }
            status => {
                return Err(ApiError::ProviderError(format!(
                    "formatted profile returned {}",
                    status
                )))
            }
        }

        let body = response.json::<FormattedResponse>().await?;
        match body.data {
            Some(profile) if body.success => Ok(profile),
            _ => Err(ApiError::ProviderError(
                "formatted profile was unsuccessful".to_string(),
            )),
        }
    }
}
