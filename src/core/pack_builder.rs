use crate::core::archive::ArchiveWriter;
use crate::core::manifest::{self, read_mod_meta};
use crate::core::validator;
use crate::models::descriptor::PackDescriptor;
use crate::models::error::PackError;
use crate::models::pack::{FileEntry, ModEntry, PackModel};
use crate::models::paths::{PackLayout, SourcePaths};
use crate::utils::path::sanitize_relative;
use crate::utils::toml::Toml;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

/// Loads `pack.toml` from an authoring directory. Member metadata is read from each
/// member's own manifest; relative paths resolve against `source_dir`.
pub fn load_descriptor(source_dir: &Utf8Path) -> Result<PackModel, PackError> {
    let paths = SourcePaths::new(source_dir);
    let descriptor: PackDescriptor = Toml::read(&paths.descriptor)?;

    let mut model = PackModel::default();
    model.name = descriptor.name;
    model.display_name = descriptor.display_name;
    model.description = descriptor.description;
    model.version = descriptor.version;
    model.author = descriptor.author;
    model.icon = descriptor.icon.map(|icon| source_dir.join(icon));
    model.pack_type = descriptor.pack_type;
    model.skip_repeat = descriptor.skip_repeat;
    model.raw_backup = descriptor.raw_backup;
    model.force = descriptor.force;
    model.uncheck = descriptor.uncheck;

    for source in descriptor.mods {
        let file = source_dir.join(&source.file);
        let meta = read_mod_meta(&file)?;
        if let Some(old) = model.add_mod(ModEntry::from_meta(file, meta, source.enabled)) {
            warn!("{} by {} listed twice, keeping the later entry", old.name, old.author);
        }
    }

    for source in descriptor.files {
        model.add_file(FileEntry::new(source_dir.join(&source.file), source.to));
    }

    debug!(
        "loaded descriptor {}: {} mods, {} files",
        paths.descriptor,
        model.mods().len(),
        model.file_entries.len()
    );
    Ok(model)
}

/// Writes the pack archive for `model` to `output`.
///
/// The model is validated first; nothing is written when validation fails.
pub fn gen_file(model: &PackModel, output: &Utf8Path) -> Result<Utf8PathBuf, PackError> {
    validator::ensure_valid(model)?;

    let layout = PackLayout::default();
    let mut writer = ArchiveWriter::create(output)?;

    writer.add_bytes(layout.manifest.as_str(), manifest::encode(model)?.as_bytes())?;

    if let Some(icon) = model.icon.as_deref() {
        if model.has_icon() {
            writer.add_file(layout.icon.as_str(), icon)?;
        } else {
            warn!("icon {icon} not found, exporting without one");
        }
    }

    // Members stored as directories are zipped on the fly.
    let scratch = tempfile::tempdir()?;
    for member in model.enabled() {
        let name = PackLayout::entry(&layout.mods, Utf8Path::new(&member.packed_file_name()));
        if member.file.is_dir() {
            let zipped = Utf8PathBuf::from_path_buf(scratch.path().join(member.packed_file_name()))
                .map_err(|p| PackError::FormatError(format!("Invalid UTF-8 path: {p:?}")))?;
            let mut nested = ArchiveWriter::create(&zipped)?;
            nested.add_dir_tree("", &member.file, |_| false)?;
            writer.add_file(&name, &nested.finish()?)?;
        } else {
            writer.add_file(&name, &member.file)?;
        }
        debug!("packed {name}");
    }

    for entry in &model.file_entries {
        let to = sanitize_relative(entry.to.as_deref().unwrap_or_default())?;
        let dest = PackLayout::entry(&layout.assets, &to.join(entry.file_name()));
        if entry.file.is_dir() {
            writer.add_dir_tree(&dest, &entry.file, |_| false)?;
        } else {
            writer.add_file(&dest, &entry.file)?;
        }
    }

    let written = writer.finish()?;
    info!("exported {} {} to {written}", model.effective_name(), model.version);
    Ok(written)
}
