use serde::Deserialize;

/// Minecraft account as known to the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Canonical id (undashed uuid), stable across name changes.
    pub id: String,
    /// Display name with the provider's capitalisation.
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QuickbuyResponse {
    pub success: bool,
    pub data: Option<QuickbuyData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QuickbuyData {
    pub quickbuy: Option<Vec<QuickbuyEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QuickbuyEntry {
    pub username: Option<String>,
}

impl QuickbuyResponse {
    /// Names linked to the queried account. Entries without a username are kept as `None`.
    pub fn linked_names(self) -> Vec<Option<String>> {
        if !self.success {
            return Vec::new();
        }

        self.data
            .and_then(|data| data.quickbuy)
            .map(|entries| entries.into_iter().map(|entry| entry.username).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UrchinResponse {
    pub detail: Option<String>,
    pub tags: Vec<UrchinTag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UrchinTag {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl UrchinResponse {
    pub fn tag_types(self) -> Vec<String> {
        self.tags
            .into_iter()
            .filter_map(|tag| tag.kind)
            .filter(|kind| !kind.is_empty())
            .collect()
    }
}

/// Rank and colour-coded display name from the formatted-profile provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormattedProfile {
    pub rank: Option<String>,
    pub formatted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FormattedResponse {
    pub success: bool,
    pub data: Option<FormattedProfile>,
}
