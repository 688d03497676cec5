use crate::models::error::PackError;
use camino::Utf8Path;

pub struct Toml;

impl Toml {
    pub fn write<T: serde::Serialize>(path: &Utf8Path, data: &T) -> Result<(), PackError> {
        toml::to_string(data)
            .map_err(PackError::from)
            .and_then(|t| std::fs::write(path, t).map_err(PackError::from))
    }

    pub fn read<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, PackError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| PackError::MissingResource(format!("{path}: {e}")))?;
        toml::from_str::<T>(&s).map_err(|e| PackError::FormatError(format!("{path}: {e}")))
    }
}
