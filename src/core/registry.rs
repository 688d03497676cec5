use crate::core::manifest::read_mod_meta;
use crate::models::error::PackError;
use crate::models::manifest::ModMeta;
use crate::models::mod_dto::LoadedMod;
use crate::models::paths::DISABLED_SUFFIX;
use crate::utils::file::FileUtils;
use crate::utils::path::same_path;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

/// The host's view of the installed mods of one data root.
pub trait ModRegistry {
    fn list(&self) -> Result<Vec<LoadedMod>, PackError>;

    fn find(&self, name: &str) -> Result<Option<LoadedMod>, PackError> {
        Ok(self.list()?.into_iter().find(|m| m.name == name))
    }

    /// The registered mod backed by `file`, whether currently enabled or not.
    fn locate(&self, file: &Utf8Path) -> Result<Option<LoadedMod>, PackError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|m| same_path(&enabled_path(&m.file), file) || same_path(&m.file, file)))
    }

    /// Registers a copy of `archive`. The imported mod is enabled.
    fn import(&mut self, archive: &Utf8Path) -> Result<LoadedMod, PackError>;

    fn remove(&mut self, installed: &LoadedMod) -> Result<(), PackError>;

    fn set_enabled(&mut self, installed: &LoadedMod, enabled: bool) -> Result<LoadedMod, PackError>;
}

/// Registry over a `mods` directory. A disabled mod carries [`DISABLED_SUFFIX`] on its
/// file name; anything without a readable manifest is ignored.
pub struct DirModRegistry {
    mods_dir: Utf8PathBuf,
}

impl DirModRegistry {
    pub fn new(mods_dir: &Utf8Path) -> Result<Self, PackError> {
        std::fs::create_dir_all(mods_dir)?;
        Ok(Self {
            mods_dir: mods_dir.to_owned(),
        })
    }

    fn load(&self, path: &Utf8Path) -> Option<LoadedMod> {
        let file_name = path.file_name()?;
        let enabled = !file_name.ends_with(DISABLED_SUFFIX);
        let bare = enabled_path(path);

        if path.is_file() && !is_archive_name(bare.as_str()) {
            return None;
        }

        match read_mod_meta(path) {
            Ok(meta) => Some(loaded(meta, path.to_owned(), enabled)),
            Err(e) => {
                debug!("skipping {path}: {e}");
                None
            }
        }
    }
}

impl ModRegistry for DirModRegistry {
    fn list(&self) -> Result<Vec<LoadedMod>, PackError> {
        Ok(FileUtils::list_dir(&self.mods_dir)?
            .iter()
            .filter_map(|p| self.load(p))
            .collect())
    }

    fn import(&mut self, archive: &Utf8Path) -> Result<LoadedMod, PackError> {
        let meta = read_mod_meta(archive)?;
        let name = archive
            .file_name()
            .ok_or_else(|| PackError::FormatError(format!("Unable to get file name for {archive}")))?;

        let dest = self.mods_dir.join(name);
        FileUtils::remove_entry(&dest)?;
        FileUtils::remove_entry(&with_disabled_suffix(&dest))?;
        FileUtils::copy_into(archive, &self.mods_dir)?;

        info!("imported {} {} as {dest}", meta.name, meta.version);
        Ok(loaded(meta, dest, true))
    }

    fn remove(&mut self, installed: &LoadedMod) -> Result<(), PackError> {
        debug!("removing {} ({})", installed.name, installed.file);
        FileUtils::remove_entry(&installed.file)
    }

    fn set_enabled(&mut self, installed: &LoadedMod, enabled: bool) -> Result<LoadedMod, PackError> {
        if installed.enabled == enabled {
            return Ok(installed.clone());
        }

        let bare = enabled_path(&installed.file);
        let dest = if enabled {
            bare
        } else {
            with_disabled_suffix(&bare)
        };
        std::fs::rename(&installed.file, &dest)?;
        debug!("{} {}", if enabled { "enabled" } else { "disabled" }, installed.name);

        Ok(LoadedMod {
            file: dest,
            enabled,
            ..installed.clone()
        })
    }
}

/// `path` without the disabled suffix.
pub fn enabled_path(path: &Utf8Path) -> Utf8PathBuf {
    match path.as_str().strip_suffix(DISABLED_SUFFIX) {
        Some(bare) => Utf8PathBuf::from(bare),
        None => path.to_owned(),
    }
}

fn with_disabled_suffix(path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{path}{DISABLED_SUFFIX}"))
}

fn is_archive_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".zip") || lower.ends_with(".jar")
}

fn loaded(meta: ModMeta, file: Utf8PathBuf, enabled: bool) -> LoadedMod {
    LoadedMod {
        display_name: meta.display_name.unwrap_or_else(|| meta.name.clone()),
        name: meta.name,
        version: meta.version,
        author: meta.author,
        dependencies: meta.dependencies,
        min_game_version: meta.min_game_version,
        file,
        enabled,
        is_modpack: meta.is_modpack,
        is_backup: meta.is_backup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_round_trip() {
        let p = Utf8Path::new("mods/a.zip");
        let disabled = with_disabled_suffix(p);
        assert_eq!(disabled, "mods/a.zip.disabled");
        assert_eq!(enabled_path(&disabled), p);
        assert_eq!(enabled_path(p), p);
    }

    #[test]
    fn only_zip_and_jar_are_archives() {
        assert!(is_archive_name("A.JAR"));
        assert!(is_archive_name("b.zip"));
        assert!(!is_archive_name("notes.txt"));
    }
}
