use crate::core::archive::ArchiveReader;
use crate::models::error::PackError;
use crate::models::manifest::{
    BackupManifest, ModListing, ModMeta, PackManifest, INSTALLER_MAIN, RECOVER_MAIN,
};
use crate::models::pack::{PackModel, PackType};
use crate::models::paths::PackLayout;
use crate::utils::time::format_date;
use camino::Utf8Path;
use serde_json::Value;

/// Serializes the manifest of `model`. Only enabled members are listed.
pub fn encode(model: &PackModel) -> Result<String, PackError> {
    let manifest = to_manifest(model);
    Ok(serde_json::to_string_pretty(&manifest)?)
}

pub fn to_manifest(model: &PackModel) -> PackManifest {
    PackManifest {
        is_modpack: true,
        name: model.effective_name().to_string(),
        display_name: model.display_name.clone(),
        description: model.description.clone(),
        version: model.version.clone(),
        author: model.author.clone(),
        min_game_version: model.min_game_version().to_string(),
        pack_type: model.pack_type,
        hidden: true,
        skip_repeat: model.skip_repeat,
        raw_backup: model.raw_backup,
        force: model.force,
        uncheck: model.uncheck,
        mods: model
            .enabled()
            .map(|m| ModListing {
                name: m.name.clone(),
                version: m.version.clone(),
                author: m.author.clone(),
                file: m.packed_file_name(),
            })
            .collect(),
        main: INSTALLER_MAIN.to_string(),
    }
}

/// Parses a pack manifest.
///
/// Text that is not a JSON object fails with `FormatError`; a valid object without the
/// `isModpack` marker fails with `NotAPack`; a missing or unknown `packType` is a
/// `FormatError`. Unknown keys are ignored.
pub fn decode(text: &str) -> Result<PackManifest, PackError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PackError::FormatError(format!("not a valid manifest: {e}")))?;

    let Value::Object(map) = &value else {
        return Err(PackError::FormatError("not a valid manifest: expected an object".into()));
    };

    if !map.get("isModpack").and_then(Value::as_bool).unwrap_or(false) {
        return Err(PackError::NotAPack(
            map.get("name")
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>")
                .to_string(),
        ));
    }

    match map.get("packType") {
        None => return Err(PackError::FormatError("missing key `packType`".into())),
        Some(Value::String(s)) if PackType::parse(s).is_some() => {}
        Some(other) => {
            return Err(PackError::FormatError(format!("unknown pack type {other}")));
        }
    }

    serde_json::from_value(value).map_err(|e| PackError::FormatError(e.to_string()))
}

/// Copies the manifest-representable fields into a fresh model. Members are not resolved.
pub fn apply(manifest: &PackManifest, model: &mut PackModel) {
    model.name = manifest.name.clone();
    model.display_name = manifest.display_name.clone();
    model.description = manifest.description.clone();
    model.version = manifest.version.clone();
    model.author = manifest.author.clone();
    model.pack_type = manifest.pack_type;
    model.skip_repeat = manifest.skip_repeat;
    model.raw_backup = manifest.raw_backup;
    model.force = manifest.force;
    model.uncheck = manifest.uncheck;
}

/// Parses an ordinary mod's `mod.json` / `mod.hjson`.
pub fn decode_mod_meta(text: &str) -> Result<ModMeta, PackError> {
    let meta: ModMeta = serde_json::from_str(text)
        .map_err(|e| PackError::FormatError(format!("invalid mod manifest: {e}")))?;
    if meta.name.trim().is_empty() {
        return Err(PackError::FormatError("mod manifest has no name".into()));
    }
    Ok(meta)
}

/// Builds the manifest of a recovery unit created at `millis`.
pub fn backup_manifest(millis: u128, min_game_version: &str, payload_id: Option<String>) -> BackupManifest {
    let date = format_date(millis);
    BackupManifest {
        is_backup: true,
        name: format!("backup-{millis}"),
        display_name: format!("Backup {date}"),
        description: "Snapshot of the data directory taken before a modpack was installed. \
                      Run `pack recover` to restore it."
            .into(),
        subtitle: format!("taken {date}"),
        version: millis.to_string(),
        author: "backup".into(),
        hidden: true,
        min_game_version: min_game_version.to_string(),
        payload_id,
        main: RECOVER_MAIN.to_string(),
    }
}

pub fn encode_backup(manifest: &BackupManifest) -> Result<String, PackError> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

pub fn decode_backup(text: &str) -> Result<BackupManifest, PackError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PackError::FormatError(format!("not a valid manifest: {e}")))?;
    if !value.get("isBackup").and_then(Value::as_bool).unwrap_or(false) {
        return Err(PackError::NotAPack("not a recovery unit".into()));
    }
    serde_json::from_value(value).map_err(|e| PackError::FormatError(e.to_string()))
}

/// Reads the manifest of a member mod stored as an archive or as a directory.
/// `mod.json` wins over `mod.hjson`.
pub fn read_mod_meta(path: &Utf8Path) -> Result<ModMeta, PackError> {
    let layout = PackLayout::default();
    let candidates = [layout.manifest.as_str(), layout.manifest_hjson.as_str()];

    let text = if path.is_dir() {
        candidates
            .iter()
            .map(|name| path.join(name))
            .find(|p| p.is_file())
            .map(std::fs::read_to_string)
            .transpose()?
    } else {
        ArchiveReader::open(path)?.read_first(&candidates)?
    };

    let text = text.ok_or_else(|| PackError::FormatError(format!("{path} has no mod manifest")))?;
    decode_mod_meta(&text)
}
