use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A mod as registered in a target's mods directory.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoadedMod {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub author: String,
    pub dependencies: Vec<String>,
    pub min_game_version: Option<String>,
    /// Current location, including the disabled suffix when disabled.
    pub file: Utf8PathBuf,
    pub enabled: bool,
    pub is_modpack: bool,
    pub is_backup: bool,
}

/// Listing of a recovery unit found in a target.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RecoveryUnit {
    pub name: String,
    pub display_name: String,
    pub created: String,
    pub file: Utf8PathBuf,
    pub enabled: bool,
}
