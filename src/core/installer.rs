use crate::core::backup::{self, BackupSink};
use crate::core::cache::ModIndex;
use crate::core::pack_reader::OpenedPack;
use crate::core::target::Target;
use crate::core::validator;
use crate::models::error::PackError;
use crate::models::pack::{FileEntry, ModEntry, PackModel, PackType};
use crate::models::status::PackStatus;
use crate::models::task_status::{InstallState, TaskStatus};
use crate::utils::context::TaskContext;
use crate::utils::file::FileUtils;
use crate::utils::path::{same_path, sanitize_relative};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{debug, error, info};

/// What an install run did.
#[derive(Serialize, Clone, Debug, Default)]
pub struct InstallReport {
    pub policy: PackType,
    pub imported: Vec<String>,
    pub unchanged: Vec<String>,
    pub files_copied: usize,
    pub files_skipped: usize,
    /// Raw backup location, or the disabled recovery unit.
    pub backup: Option<Utf8PathBuf>,
}

/// One install run of a pack into a target. Consumed by [`run`](Self::run).
pub struct Installer<'a> {
    pack: &'a PackModel,
    installer_file: &'a Utf8Path,
    min_game_version: String,
    target: &'a mut Target,
    state: InstallState,
    report: InstallReport,
}

impl<'a> Installer<'a> {
    pub fn new(opened: &'a OpenedPack, target: &'a mut Target) -> Self {
        Self {
            pack: &opened.model,
            installer_file: opened.archive_path(),
            min_game_version: opened.manifest.min_game_version.clone(),
            target,
            state: InstallState::Idle,
            report: InstallReport {
                policy: opened.model.pack_type,
                ..Default::default()
            },
        }
    }

    fn transition(&mut self, next: InstallState) {
        info!("install {}: {} -> {}", self.pack.effective_name(), self.state, next);
        self.state = next;
        TaskContext::report(TaskStatus::State(next));
    }

    /// Runs backup, policy and finalization with the target locked.
    /// A failure leaves the target as it is; nothing is rolled back.
    pub fn run(mut self, sink: &mut dyn BackupSink) -> Result<InstallReport, PackError> {
        match self.run_inner(sink) {
            Ok(()) => {
                self.transition(InstallState::Done);
                Ok(self.report)
            }
            Err(e) => {
                error!("install failed in state {}: {e}", self.state);
                self.transition(InstallState::Failed);
                Err(e)
            }
        }
    }

    fn run_inner(&mut self, sink: &mut dyn BackupSink) -> Result<(), PackError> {
        validator::ensure_valid(self.pack)?;
        let _lock = self.target.lock()?;

        let backup = if self.pack.pack_type.needs_backup() {
            self.transition(InstallState::BackingUp);
            Some(self.make_backup()?)
        } else {
            None
        };

        self.transition(InstallState::ApplyingPolicy);
        match self.pack.pack_type {
            PackType::Distribute => self.distribute()?,
            PackType::Shadow => self.shadow()?,
            PackType::Override => self.override_all()?,
        }

        if let Some(backup) = backup {
            self.transition(InstallState::Finalizing);
            self.finalize_backup(&backup, sink)?;
        }
        self.disable_installer()
    }

    fn make_backup(&self) -> Result<Utf8PathBuf, PackError> {
        let millis = backup::new_stamp();
        if self.pack.raw_backup {
            backup::create_raw(&*self.target, millis)
        } else {
            backup::create_recovery_unit(
                &*self.target,
                self.installer_file,
                &self.min_game_version,
                millis,
            )
        }
    }

    fn distribute(&mut self) -> Result<(), PackError> {
        let pack = self.pack;
        let mut index = ModIndex::build(self.target.registry.as_ref())?;
        for member in pack.mods() {
            self.install_member(member, &mut index)?;
        }
        self.copy_files(true)
    }

    fn shadow(&mut self) -> Result<(), PackError> {
        for installed in self.target.registry.list()? {
            if installed.enabled {
                self.target.registry.set_enabled(&installed, false)?;
            }
        }
        TaskContext::report(TaskStatus::Step("disabled installed mods".into()));

        let pack = self.pack;
        let mut index = ModIndex::build(self.target.registry.as_ref())?;
        for member in pack.mods() {
            self.install_member(member, &mut index)?;
            if let Some(installed) = index.get(&member.name) {
                if !installed.enabled {
                    self.target.registry.set_enabled(installed, true)?;
                    index.rebuild(self.target.registry.as_ref())?;
                }
            }
        }
        self.copy_files(true)
    }

    fn override_all(&mut self) -> Result<(), PackError> {
        let lock_name = self.target.lock_name().to_string();
        let mods_dir = self.target.paths.mods.clone();

        for child in FileUtils::list_dir(&self.target.root)? {
            let name = child.file_name().unwrap_or_default();
            let keep = child == mods_dir
                || same_path(&child, self.installer_file)
                || name == lock_name
                || name.contains("backup")
                || name == "cache";
            if !keep {
                debug!("override: removing {child}");
                FileUtils::remove_entry(&child)?;
            }
        }
        for child in FileUtils::list_dir(&mods_dir)? {
            if !same_path(&child, self.installer_file) {
                FileUtils::remove_entry(&child)?;
            }
        }
        TaskContext::report(TaskStatus::Step("cleared data root".into()));

        let pack = self.pack;
        for member in pack.mods() {
            self.target.registry.import(&member.file)?;
            self.report.imported.push(member.name.clone());
        }
        self.copy_files(false)?;

        self.target.settings.clear();
        self.target.settings.load()
    }

    /// Replaces the installed copy when it is absent, outdated or `force` is set.
    fn install_member(&mut self, member: &ModEntry, index: &mut ModIndex) -> Result<(), PackError> {
        let installed = index.get(&member.name).cloned();
        let replace = match &installed {
            None => true,
            Some(m) => self.pack.force || m.version != member.version,
        };

        if !replace {
            debug!("{} {} already installed", member.name, member.version);
            self.report.unchanged.push(member.name.clone());
            return Ok(());
        }

        if let Some(old) = &installed {
            self.target.registry.remove(old)?;
        }
        self.target.registry.import(&member.file)?;
        index.rebuild(self.target.registry.as_ref())?;
        if index.get(&member.name).is_none() {
            return Err(PackError::FormatError(format!(
                "{} was imported but is not recognized as a mod",
                member.file
            )));
        }

        TaskContext::report(TaskStatus::Step(format!("installed {} {}", member.name, member.version)));
        self.report.imported.push(member.name.clone());
        Ok(())
    }

    fn copy_files(&mut self, honor_skip_repeat: bool) -> Result<(), PackError> {
        let pack = self.pack;
        for entry in &pack.file_entries {
            let dest = destination(&self.target.root, entry)?;
            if honor_skip_repeat && pack.skip_repeat && dest.exists() {
                debug!("skipping existing {dest}");
                self.report.files_skipped += 1;
                continue;
            }
            if dest.is_dir() && !entry.file.is_dir() {
                FileUtils::remove_entry(&dest)?;
            }
            if entry.file.is_dir() {
                FileUtils::copy_recursive(&entry.file, &dest)?;
            } else {
                FileUtils::copy_file(&entry.file, &dest)?;
            }
            self.report.files_copied += 1;
        }
        Ok(())
    }

    fn finalize_backup(&mut self, backup: &Utf8Path, sink: &mut dyn BackupSink) -> Result<(), PackError> {
        if self.pack.raw_backup {
            self.report.backup = Some(sink.accept(backup)?);
            return Ok(());
        }

        let unit = self.target.registry.import(backup)?;
        let unit = self.target.registry.set_enabled(&unit, false)?;
        FileUtils::remove_entry(backup)?;
        info!("recovery unit {} registered at {}", unit.name, unit.file);
        self.report.backup = Some(unit.file);
        Ok(())
    }

    fn disable_installer(&mut self) -> Result<(), PackError> {
        if let Some(own) = self.target.registry.locate(self.installer_file)? {
            if own.enabled {
                self.target.registry.set_enabled(&own, false)?;
                debug!("disabled installer {}", own.name);
            }
        }
        Ok(())
    }
}

/// `{root}/{to}/{source file name}`. Destinations escaping the root are refused.
pub fn destination(root: &Utf8Path, entry: &FileEntry) -> Result<Utf8PathBuf, PackError> {
    let to = entry
        .to
        .as_deref()
        .ok_or(PackError::Validation(PackStatus(PackStatus::FILES_INVALID)))?;
    Ok(root.join(sanitize_relative(to)?).join(entry.file_name()))
}

/// Installs `opened` into `target` using the pack's own policy.
pub fn install(
    opened: &OpenedPack,
    target: &mut Target,
    sink: &mut dyn BackupSink,
) -> Result<InstallReport, PackError> {
    Installer::new(opened, target).run(sink)
}
