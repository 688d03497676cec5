use crate::models::pack::PackType;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// `pack.toml`, the authoring descriptor read by `pack build`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PackDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    pub icon: Option<Utf8PathBuf>,
    #[serde(default)]
    pub pack_type: PackType,
    #[serde(default)]
    pub skip_repeat: bool,
    #[serde(default)]
    pub raw_backup: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub uncheck: bool,
    #[serde(default)]
    pub mods: Vec<ModSource>,
    #[serde(default)]
    pub files: Vec<FileSource>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ModSource {
    pub file: Utf8PathBuf,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FileSource {
    pub file: Utf8PathBuf,
    pub to: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}
