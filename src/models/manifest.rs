use crate::models::pack::PackType;
use serde::{Deserialize, Serialize};

/// Entry point id written into pack manifests.
pub const INSTALLER_MAIN: &str = "main.Installer";
/// Entry point id written into recovery unit manifests.
pub const RECOVER_MAIN: &str = "main.Recover";

/// `mod.json` of a modpack.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackManifest {
    pub is_modpack: bool,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    pub author: String,
    #[serde(default = "default_min_game_version")]
    pub min_game_version: String,
    pub pack_type: PackType,
    #[serde(default = "default_hidden")]
    pub hidden: bool,
    #[serde(default)]
    pub skip_repeat: bool,
    #[serde(default)]
    pub raw_backup: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub uncheck: bool,
    #[serde(default)]
    pub mods: Vec<ModListing>,
    #[serde(default)]
    pub main: String,
}

/// One member mod as listed in a pack manifest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModListing {
    pub name: String,
    pub version: String,
    pub author: String,
    pub file: String,
}

/// `mod.json` of a recovery unit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupManifest {
    pub is_backup: bool,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub subtitle: String,
    pub version: String,
    pub author: String,
    pub hidden: bool,
    pub min_game_version: String,
    #[serde(default)]
    pub payload_id: Option<String>,
    pub main: String,
}

/// The subset of an ordinary mod's `mod.json` this tool cares about.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModMeta {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub min_game_version: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub is_modpack: bool,
    #[serde(default)]
    pub is_backup: bool,
}

impl ModMeta {
    /// Major component of `minGameVersion`, `0` when absent.
    pub fn min_major_version(&self) -> Option<u32> {
        match self.min_game_version.as_deref().map(str::trim) {
            None | Some("") => Some(0),
            Some(v) => v.split('.').next().and_then(|major| major.parse().ok()),
        }
    }
}

// Mod manifests in the wild write versions both as strings and as bare numbers.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

fn default_min_game_version() -> String {
    "0".into()
}

fn default_hidden() -> bool {
    true
}
