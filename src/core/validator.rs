use crate::models::error::PackError;
use crate::models::pack::PackModel;
use crate::models::status::PackStatus;
use crate::utils::path::is_safe_relative;
use std::collections::HashSet;

/// Inspects a pack before export or install. The model is never modified.
pub fn check(model: &PackModel) -> PackStatus {
    let mut status = PackStatus::default();

    let blank = |s: &str| s.trim().is_empty();
    if blank(&model.display_name) || blank(&model.version) || blank(&model.author) {
        status.set(PackStatus::METAINFO_INVALID);
    }

    let bad_file = model.file_entries.iter().any(|entry| {
        !entry.file.exists() || entry.to.as_deref().map_or(true, |to| !is_safe_relative(to))
    });
    if bad_file {
        status.set(PackStatus::FILES_INVALID);
    }

    if !model.uncheck {
        if model.enabled().any(|m| !m.file.exists()) {
            status.set(PackStatus::MODS_INVALID);
        }
        if !unmet_dependencies(model).is_empty() {
            status.set(PackStatus::MODS_DEPEND_INVALID);
        }
    }

    status
}

/// Dependencies of enabled members that no enabled member provides, as `member -> dependency`.
pub fn unmet_dependencies(model: &PackModel) -> Vec<String> {
    let provided: HashSet<&str> = model.enabled().map(|m| m.name.as_str()).collect();

    model
        .enabled()
        .flat_map(|m| {
            m.dependencies
                .iter()
                .filter(|dep| !provided.contains(dep.as_str()))
                .map(move |dep| format!("{} -> {dep}", m.name))
        })
        .collect()
}

/// Turns a failing status into the error an export or install reports.
pub fn ensure_valid(model: &PackModel) -> Result<(), PackError> {
    let status = check(model);
    if status.is_correct() {
        return Ok(());
    }
    if status.bits() == PackStatus::MODS_DEPEND_INVALID {
        return Err(PackError::Dependency(unmet_dependencies(model)));
    }
    Err(PackError::Validation(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pack::{FileEntry, ModEntry};
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    fn member(file: Utf8PathBuf, name: &str, deps: &[&str]) -> ModEntry {
        ModEntry {
            file,
            name: name.into(),
            display_name: name.into(),
            version: "1".into(),
            author: "alice".into(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            min_game_version: 0,
            enabled: true,
        }
    }

    fn valid_model(root: &camino::Utf8Path) -> PackModel {
        let mod_file = root.join("a.zip");
        std::fs::write(&mod_file, b"zip").unwrap();
        let asset = root.join("world.msav");
        std::fs::write(&asset, b"save").unwrap();

        let mut model = PackModel::default();
        model.display_name = "Pack".into();
        model.version = "1".into();
        model.author = "alice".into();
        model.add_mod(member(mod_file, "a", &[]));
        model.add_file(FileEntry::new(asset, Some("saves".into())));
        model
    }

    #[test]
    fn clean_model_is_correct() {
        let tmp = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        assert!(check(&valid_model(&root)).is_correct());
    }

    #[test]
    fn blank_author_sets_only_metainfo() {
        let tmp = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let mut model = valid_model(&root);
        model.author = "  ".into();
        assert_eq!(check(&model).bits(), PackStatus::METAINFO_INVALID);
    }

    #[test]
    fn missing_destination_or_escape_sets_files() {
        let tmp = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();

        let mut model = valid_model(&root);
        model.file_entries[0].to = None;
        assert_eq!(check(&model).bits(), PackStatus::FILES_INVALID);

        model.file_entries[0].to = Some("../outside".into());
        assert!(check(&model).files_error());

        model.file_entries[0].to = Some(String::new());
        assert!(check(&model).is_correct());
    }

    #[test]
    fn dependency_bit_respects_uncheck() {
        let tmp = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let mut model = valid_model(&root);
        model.add_mod(member(root.join("a.zip"), "b", &["a", "lib"]));

        assert_eq!(check(&model).bits(), PackStatus::MODS_DEPEND_INVALID);
        assert_eq!(unmet_dependencies(&model), ["b -> lib"]);
        assert!(matches!(ensure_valid(&model), Err(PackError::Dependency(_))));

        model.uncheck = true;
        assert!(check(&model).is_correct());
    }

    #[test]
    fn disabled_members_are_ignored() {
        let tmp = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let mut model = valid_model(&root);
        let ghost = member(root.join("missing.zip"), "ghost", &["nothing"]);
        model.add_mod(ModEntry {
            enabled: false,
            ..ghost.clone()
        });
        assert!(check(&model).is_correct());

        model.add_mod(ghost);
        let status = check(&model);
        assert!(status.mods_error());
        assert!(status.mod_dependencies_error());
        assert!(matches!(ensure_valid(&model), Err(PackError::Validation(_))));
    }
}
