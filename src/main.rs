/// Alt account correlation
mod alts;
/// Upstream statistics providers
mod api;
/// checks for permission to execute a specific command
pub mod checks;
/// All available discord commands
mod commands;
/// discord setup
mod discord;
mod logger;
/// Bot Settings
mod settings;
/// Render type overrides
mod state;
/// Bedwars stats scraping and formatting
mod stats;

use anyhow::{Context, Result};
use api::HttpUpstream;
use settings::Settings;
use state::RenderStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logger::init()?;

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) if std::path::Path::new(&Settings::path()).exists() => {
            return Err(e).context("Failed to load settings.");
        }
        Err(e) => {
            log::warn!("Failed to load settings: {}", e);
            Settings::default()
                .save()
                .await
                .context("Failed to save default config.")?;
            println!("Created default settings. Please fill out. Exiting...");
            std::process::exit(0);
        }
    };

    let renders = RenderStore::load(RenderStore::path_from_env())
        .await
        .context("Failed to load render types.")?;
    let upstream = HttpUpstream::new(&settings).context("Failed to create upstream client.")?;

    discord::run(settings, renders, Arc::new(upstream))
        .await
        .context("Failed to start discord.")
}
