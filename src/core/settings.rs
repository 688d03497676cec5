use crate::models::error::PackError;
use crate::utils::toml::Toml;
use camino::{Utf8Path, Utf8PathBuf};
use toml::{Table, Value};
use tracing::debug;

/// The host's key/value settings store.
pub trait SettingsStore {
    /// Re-reads persisted values, replacing what is in memory.
    fn load(&mut self) -> Result<(), PackError>;

    /// Drops every in-memory value. Nothing is persisted until [`save`](Self::save).
    fn clear(&mut self);

    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    fn save(&self) -> Result<(), PackError>;
}

/// Top-level table of `settings.toml` in the data root. Values are kept as written.
pub struct FileSettings {
    path: Utf8PathBuf,
    values: Table,
}

impl FileSettings {
    pub fn open(path: &Utf8Path) -> Result<Self, PackError> {
        let mut settings = Self {
            path: path.to_owned(),
            values: Table::new(),
        };
        settings.load()?;
        Ok(settings)
    }
}

impl SettingsStore for FileSettings {
    fn load(&mut self) -> Result<(), PackError> {
        self.values = if self.path.exists() {
            Toml::read(&self.path)?
        } else {
            Table::new()
        };
        debug!("loaded {} settings from {}", self.values.len(), self.path);
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn save(&self) -> Result<(), PackError> {
        Toml::write(&self.path, &self.values)
    }
}
