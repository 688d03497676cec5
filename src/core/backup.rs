use crate::core::archive::{ArchiveReader, ArchiveWriter};
use crate::core::manifest::{self, backup_manifest};
use crate::core::registry::ModRegistry;
use crate::core::target::Target;
use crate::models::error::PackError;
use crate::models::mod_dto::RecoveryUnit;
use crate::models::paths::PackLayout;
use crate::utils::file::FileUtils;
use crate::utils::snapshot::Snapshot;
use crate::utils::time::{format_date, get_unix_timestamp_millis};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

/// Receives a raw backup once an install has finished with it.
pub trait BackupSink {
    /// Takes ownership of the file at `backup` and returns where it ended up.
    fn accept(&mut self, backup: &Utf8Path) -> Result<Utf8PathBuf, PackError>;
}

/// Leaves the backup in the data root.
pub struct KeepInPlace;

impl BackupSink for KeepInPlace {
    fn accept(&mut self, backup: &Utf8Path) -> Result<Utf8PathBuf, PackError> {
        Ok(backup.to_owned())
    }
}

/// Moves the backup into a directory outside the data root.
pub struct MoveToDir(pub Utf8PathBuf);

impl BackupSink for MoveToDir {
    fn accept(&mut self, backup: &Utf8Path) -> Result<Utf8PathBuf, PackError> {
        let name = backup
            .file_name()
            .ok_or_else(|| PackError::FormatError(format!("Unable to get file name for {backup}")))?;
        let dest = self.0.join(name);
        FileUtils::move_file(backup, &dest)?;
        info!("backup moved to {dest}");
        Ok(dest)
    }
}

/// `{data_root}/backup-{millis}.zip`.
pub fn backup_path(root: &Utf8Path, millis: u128) -> Utf8PathBuf {
    root.join(format!("backup-{millis}.zip"))
}

/// Which files of the data root a recovery unit carries. The lock and `cache/` never
/// travel; `backup` is the archive being written.
pub fn in_payload(rel: &Utf8Path, backup: &Utf8Path, lock: &Utf8Path) -> bool {
    rel != backup
        && rel != lock
        && rel.components().next().map(|c| c.as_str()) != Some("cache")
}

/// Zips the whole data root, minus the backup itself and the lock file.
pub fn create_raw(target: &Target, millis: u128) -> Result<Utf8PathBuf, PackError> {
    let dest = backup_path(&target.root, millis);
    let backup_rel = relative_name(&dest)?;
    let lock_rel = Utf8PathBuf::from(target.lock_name());

    let mut writer = ArchiveWriter::create(&dest)?;
    let count = writer.add_dir_tree("", &target.root, |rel| {
        rel == backup_rel.as_path() || rel == lock_rel.as_path()
    })?;
    writer.finish()?;

    info!("raw backup of {count} files written to {dest}");
    Ok(dest)
}

/// Builds a recovery unit: the installer's non-pack entries, a generated backup manifest
/// and the data root under `backfiles/`.
pub fn create_recovery_unit(
    target: &Target,
    installer: &Utf8Path,
    min_game_version: &str,
    millis: u128,
) -> Result<Utf8PathBuf, PackError> {
    let layout = PackLayout::default();
    let dest = backup_path(&target.root, millis);
    let backup_rel = relative_name(&dest)?;
    let lock_rel = Utf8PathBuf::from(target.lock_name());
    let keep = |rel: &Utf8Path| in_payload(rel, &backup_rel, &lock_rel);

    let payload = Snapshot::capture(&target.root, keep)?;
    debug!("payload of {} files, digest {}", payload.len(), payload.digest());

    let mut writer = ArchiveWriter::create(&dest)?;

    let mut source = ArchiveReader::open(installer)?;
    let pack_entries = [
        layout.manifest.as_str().to_string(),
        layout.manifest_hjson.as_str().to_string(),
        layout.icon.as_str().to_string(),
    ];
    let pack_dirs = [
        format!("{}/", layout.assets),
        format!("{}/", layout.mods),
        format!("{}/", layout.backfiles),
    ];
    let copied = writer.copy_from(&mut source, |name| {
        pack_entries.iter().any(|e| e == name) || pack_dirs.iter().any(|d| name.starts_with(d.as_str()))
    })?;

    let manifest = backup_manifest(millis, min_game_version, Some(payload.digest()));
    writer.add_bytes(layout.manifest.as_str(), manifest::encode_backup(&manifest)?.as_bytes())?;

    let count = writer.add_dir_tree(layout.backfiles.as_str(), &target.root, |rel| !keep(rel))?;
    writer.finish()?;

    info!("recovery unit {} written ({copied} carried entries, {count} files)", manifest.name);
    Ok(dest)
}

/// Recovery units registered in `registry`, newest first.
pub fn list_recovery_units(registry: &dyn ModRegistry) -> Result<Vec<RecoveryUnit>, PackError> {
    let mut units: Vec<(u128, RecoveryUnit)> = registry
        .list()?
        .into_iter()
        .filter(|m| m.is_backup)
        .map(|m| {
            let millis = m.version.parse::<u128>().unwrap_or_default();
            let unit = RecoveryUnit {
                name: m.name,
                display_name: m.display_name,
                created: format_date(millis),
                file: m.file,
                enabled: m.enabled,
            };
            (millis, unit)
        })
        .collect();

    units.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(units.into_iter().map(|(_, unit)| unit).collect())
}

/// Millisecond stamp for a new backup.
pub fn new_stamp() -> u128 {
    get_unix_timestamp_millis()
}

fn relative_name(path: &Utf8Path) -> Result<Utf8PathBuf, PackError> {
    path.file_name()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| PackError::Unexpected(Some(format!("no file name in {path}"))))
}
