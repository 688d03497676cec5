use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Bitmask of independent pack validation failures. Zero means the pack can be exported.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[display("{_0:#06b}")]
pub struct PackStatus(pub u8);

impl PackStatus {
    pub const METAINFO_INVALID: u8 = 0b0001;
    pub const FILES_INVALID: u8 = 0b0010;
    pub const MODS_INVALID: u8 = 0b0100;
    pub const MODS_DEPEND_INVALID: u8 = 0b1000;

    pub fn set(&mut self, bit: u8) {
        self.0 |= bit;
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_correct(&self) -> bool {
        self.0 == 0
    }

    pub fn metainfo_error(&self) -> bool {
        self.0 & Self::METAINFO_INVALID != 0
    }

    pub fn files_error(&self) -> bool {
        self.0 & Self::FILES_INVALID != 0
    }

    pub fn mods_error(&self) -> bool {
        self.0 & Self::MODS_INVALID != 0
    }

    pub fn mod_dependencies_error(&self) -> bool {
        self.0 & Self::MODS_DEPEND_INVALID != 0
    }

    /// Human readable names of the failing conditions.
    pub fn describe(&self) -> Vec<&'static str> {
        [
            (self.metainfo_error(), "metadata (display name, version or author) is blank"),
            (self.files_error(), "a file entry is missing or has no valid destination"),
            (self.mods_error(), "a member mod archive is missing"),
            (self.mod_dependencies_error(), "a member mod dependency is not bundled"),
        ]
        .into_iter()
        .filter_map(|(failed, msg)| failed.then_some(msg))
        .collect()
    }
}
