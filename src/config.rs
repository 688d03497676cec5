pub mod global;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "mod_packer";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub version: u8,
    /// Where raw backups are moved after an install. `None` leaves them in the data root.
    pub backup_dir: Option<Utf8PathBuf>,
    /// Default log level when neither `-v` nor `RUST_LOG` is given.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: 0,
            backup_dir: None,
            log_level: "info".into(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<AppSettings, confy::ConfyError> {
        confy::load(APP_NAME, None)
    }

}
