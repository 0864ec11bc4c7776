use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

const FILENAME: &str = "rendertype.yaml";

/// Render style used when no override exists.
pub const DEFAULT_RENDER: &str = "default";

/// Read access to per-player render style overrides.
pub trait RenderStyles {
    fn get(&self, username: &str) -> Option<&str>;

    fn render_style(&self, username: &str) -> String {
        self.get(username).unwrap_or(DEFAULT_RENDER).to_string()
    }
}

impl RenderStyles for HashMap<String, String> {
    fn get(&self, username: &str) -> Option<&str> {
        HashMap::get(self, username).map(String::as_str)
    }
}

/// Render style overrides which admins set per username.
///
/// Usernames are matched exactly as typed. Every write replaces the whole file.
#[derive(Debug)]
pub struct RenderStore {
    path: PathBuf,
    renders: BTreeMap<String, String>,
}

impl RenderStore {
    /// Location of the store, overridable with `BOT_RENDERS`.
    pub fn path_from_env() -> PathBuf {
        std::env::var("BOT_RENDERS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(FILENAME))
    }

    /// Loads the store, starting empty if the file does not exist yet.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let renders = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        log::info!(
            "Loaded {} render overrides from {}",
            renders.len(),
            path.display()
        );

        Ok(Self { path, renders })
    }

    /// Copy of all overrides, for use without holding the store.
    pub fn styles(&self) -> HashMap<String, String> {
        self.renders
            .iter()
            .map(|(name, style)| (name.clone(), style.clone()))
            .collect()
    }

    /// Sets the override and saves. Returns the previous override.
    ///
    /// Nothing changes in memory unless the file was written.
    pub async fn set(&mut self, username: &str, style: &str) -> Result<Option<String>> {
        let mut renders = self.renders.clone();
        let previous = renders.insert(username.to_string(), style.to_string());
        self.save(&renders).await?;
        self.renders = renders;
        Ok(previous)
    }

    async fn save(&self, renders: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create render store directory")?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let content =
            serde_yaml::to_string(renders).context("Failed to serialize render overrides")?;
        let written = Self::replace(&tmp, &self.path, content.as_bytes()).await;
        if written.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        written
    }

    async fn replace(tmp: &Path, path: &Path, content: &[u8]) -> Result<()> {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(tmp)
            .await
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        file.write_all(content).await?;
        file.sync_all().await?;

        tokio::fs::rename(tmp, path)
            .await
            .context("Failed to replace render store")?;
        Ok(())
    }
}

impl RenderStyles for RenderStore {
    fn get(&self, username: &str) -> Option<&str> {
        self.renders.get(username).map(String::as_str)
    }
}
