use crate::core::archive::ArchiveReader;
use crate::core::backup::list_recovery_units;
use crate::core::manifest::decode_backup;
use crate::core::target::Target;
use crate::models::error::PackError;
use crate::models::paths::PackLayout;
use crate::models::task_status::TaskStatus;
use crate::utils::context::TaskContext;
use crate::utils::file::FileUtils;
use crate::utils::path::same_path;
use crate::utils::snapshot::Snapshot;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

#[derive(Serialize, Clone, Debug)]
pub struct RecoveryReport {
    pub unit: Utf8PathBuf,
    pub restored: usize,
    /// `None` when the unit carries no payload digest.
    pub verified: Option<bool>,
}

/// The explicit unit, or the newest recovery unit registered in the target.
pub fn resolve_unit(target: &Target, unit: Option<&Utf8Path>) -> Result<Utf8PathBuf, PackError> {
    match unit {
        Some(path) if path.exists() => Ok(path.to_owned()),
        Some(path) => Err(PackError::MissingResource(path.to_string())),
        None => list_recovery_units(target.registry.as_ref())?
            .into_iter()
            .next()
            .map(|u| u.file)
            .ok_or(PackError::NoRecoveryUnit),
    }
}

/// Restores the data root from a recovery unit.
///
/// Everything except the unit and the lock file is deleted before the `backfiles/`
/// payload is extracted. Settings are reloaded from the restored files and the unit ends
/// up disabled.
#[instrument(skip(target), fields(root = %target.root))]
pub fn recover(target: &mut Target, unit: Option<&Utf8Path>) -> Result<RecoveryReport, PackError> {
    let unit_file = resolve_unit(target, unit)?;
    let _lock = target.lock()?;
    let layout = PackLayout::default();

    let mut archive = ArchiveReader::open(&unit_file)?;
    let text = archive
        .read_first(&[layout.manifest.as_str()])?
        .ok_or_else(|| PackError::NotAPack(format!("{unit_file} has no manifest")))?;
    let manifest = decode_backup(&text)?;
    info!("recovering from {} ({})", manifest.name, manifest.display_name);

    let lock_name = target.lock_name().to_string();
    let mods_dir = target.paths.mods.clone();
    for child in FileUtils::list_dir(&target.root)? {
        if child == mods_dir {
            for m in FileUtils::list_dir(&mods_dir)? {
                if !same_path(&m, &unit_file) {
                    FileUtils::remove_entry(&m)?;
                }
            }
        } else if !same_path(&child, &unit_file) && child.file_name() != Some(lock_name.as_str()) {
            FileUtils::remove_entry(&child)?;
        }
    }
    TaskContext::report(TaskStatus::Step("cleared data root".into()));

    let restored = archive.extract_prefix(layout.backfiles.as_str(), &target.root)?;
    TaskContext::report(TaskStatus::Step(format!("restored {} files", restored.len())));

    let verified = manifest.payload_id.as_deref().map(|expected| {
        let wanted: HashSet<&Utf8Path> = restored.iter().map(|p| p.as_path()).collect();
        match Snapshot::capture(&target.root, |rel| wanted.contains(rel)) {
            Ok(snapshot) if snapshot.digest() == expected => true,
            Ok(_) => {
                warn!("restored payload does not match the digest recorded in {}", manifest.name);
                false
            }
            Err(e) => {
                warn!("could not verify restored payload: {e}");
                false
            }
        }
    });

    target.settings.clear();
    target.settings.load()?;

    let unit_file = match target.registry.locate(&unit_file)? {
        Some(registered) => target.registry.set_enabled(&registered, false)?.file,
        None => unit_file,
    };

    info!("recovered {} files from {unit_file}", restored.len());
    Ok(RecoveryReport {
        unit: unit_file,
        restored: restored.len(),
        verified,
    })
}
