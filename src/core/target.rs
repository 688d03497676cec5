use crate::core::lock::TargetLock;
use crate::core::registry::{DirModRegistry, ModRegistry};
use crate::core::settings::{FileSettings, SettingsStore};
use crate::models::error::PackError;
use crate::models::paths::TargetPaths;
use camino::{Utf8Path, Utf8PathBuf};

/// A game data root together with the host collaborators that manage it.
pub struct Target {
    pub root: Utf8PathBuf,
    pub paths: TargetPaths,
    pub registry: Box<dyn ModRegistry>,
    pub settings: Box<dyn SettingsStore>,
}

impl Target {
    /// Opens an existing data root with the directory-backed registry and file settings.
    pub fn open(root: &Utf8Path) -> Result<Self, PackError> {
        if !root.is_dir() {
            return Err(PackError::MissingResource(format!("data root {root}")));
        }
        let root = dunce::canonicalize(root)?;
        let root = Utf8PathBuf::from_path_buf(root)
            .map_err(|p| PackError::FormatError(format!("Invalid UTF-8 path: {p:?}")))?;
        let paths = TargetPaths::new(&root);

        let registry = DirModRegistry::new(&paths.mods)?;
        let settings = FileSettings::open(&paths.settings)?;

        Ok(Self::with(&root, Box::new(registry), Box::new(settings)))
    }

    pub fn with(
        root: &Utf8Path,
        registry: Box<dyn ModRegistry>,
        settings: Box<dyn SettingsStore>,
    ) -> Self {
        Self {
            root: root.to_owned(),
            paths: TargetPaths::new(root),
            registry,
            settings,
        }
    }

    pub fn lock(&self) -> Result<TargetLock, PackError> {
        TargetLock::acquire(&self.paths.lock)
    }

    /// Name of the lock file inside the root.
    pub fn lock_name(&self) -> &str {
        self.paths.lock.file_name().unwrap_or_default()
    }
}
