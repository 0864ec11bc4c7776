use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::PathBuf};

const FILENAME: &str = "settings.yaml";

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Discord's bot token
    pub token: String,
    /// Discord account id which owns the bot
    pub owner: u64,
    /// Discord accounts allowed to change render types.
    pub admins: HashSet<u64>,
    /// Key for the Polsu quickbuy and formatted profile endpoints.
    pub polsu_key: String,
    /// Key for the Urchin reputation endpoint.
    pub urchin_key: String,
    /// Channel which receives render change requests. 0 disables requests.
    pub render_requests_channel: u64,
    /// Channel which receives suggestions. 0 disables suggestions.
    pub suggestions_channel: u64,
    /// Timeout for every upstream request.
    pub request_timeout_secs: u64,
    pub mojang_url: String,
    pub polsu_url: String,
    pub urchin_url: String,
    pub bwstats_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: String::from("DISCORD_BOT_TOKEN_HERE"),
            owner: 999999999,
            admins: HashSet::new(),
            polsu_key: String::from("POLSU_API_KEY_HERE"),
            urchin_key: String::from("URCHIN_API_KEY_HERE"),
            render_requests_channel: 0,
            suggestions_channel: 0,
            request_timeout_secs: 10,
            mojang_url: String::from("https://api.mojang.com"),
            polsu_url: String::from("https://api.polsu.xyz"),
            urchin_url: String::from("https://urchin.ws"),
            bwstats_url: String::from("https://bwstats.shivam.pro"),
        }
    }
}

impl Settings {
    /// Location of the settings file, overridable with `BOT_SETTINGS`.
    pub fn path() -> String {
        std::env::var("BOT_SETTINGS").unwrap_or_else(|_| FILENAME.to_string())
    }

    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name(&Self::path()))
            // Add in settings from the environment (with a prefix of BOT)
            // Eg.. `BOT_POLSU_KEY=...` would set the `polsu_key` key
            .add_source(Environment::with_prefix("BOT"))
            .build()?
            .try_deserialize()
    }

    /// Whether the Discord user may change render types.
    pub fn is_admin(&self, user: u64) -> bool {
        self.owner == user || self.admins.contains(&user)
    }

    pub async fn save(&self) -> Result<()> {
        use tokio::io::AsyncWriteExt;

        let settings_path = Self::path();

        if let Some(parent) = PathBuf::from(&settings_path).parent() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        let mut file = tokio::fs::File::create(&settings_path).await?;
        file.write_all(
            serde_yaml::to_string(&self)
                .context("Failed to serialize settings")?
                .as_bytes(),
        )
        .await?;
        file.sync_all().await?;
        Ok(())
    }
}
