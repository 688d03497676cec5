use crate::core::archive::ArchiveReader;
use crate::core::manifest::{self, read_mod_meta};
use crate::models::error::PackError;
use crate::models::manifest::PackManifest;
use crate::models::pack::{FileEntry, ModEntry, PackModel};
use crate::models::paths::PackLayout;
use crate::utils::path::sanitize_relative;
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// A pack archive materialized for installation. Members, assets and the icon live in a
/// staging directory that is removed when this value is dropped.
pub struct OpenedPack {
    pub model: PackModel,
    pub manifest: PackManifest,
    archive_path: Utf8PathBuf,
    _staging: TempDir,
}

impl OpenedPack {
    /// Location of the pack archive itself.
    pub fn archive_path(&self) -> &Utf8Path {
        &self.archive_path
    }
}

/// Reads only the manifest of a pack archive.
pub fn read_manifest(path: &Utf8Path) -> Result<PackManifest, PackError> {
    let mut archive = ArchiveReader::open(path)?;
    manifest_of(&mut archive)
}

fn manifest_of(archive: &mut ArchiveReader) -> Result<PackManifest, PackError> {
    let layout = PackLayout::default();
    let text = archive
        .read_first(&[layout.manifest.as_str(), layout.manifest_hjson.as_str()])?
        .ok_or_else(|| PackError::NotAPack(format!("{} has no manifest", archive.path())))?;
    manifest::decode(&text)
}

/// Opens a pack archive and stages its members and assets.
///
/// Every listed member must be present in the archive (`MissingResource`) and carry its
/// own manifest (`FormatError`). Assets are re-rooted: `assets/<dir>/<file>` becomes a
/// file entry with destination `<dir>`.
pub fn read_pack(path: &Utf8Path) -> Result<OpenedPack, PackError> {
    let archive_path = match dunce::canonicalize(path) {
        Ok(p) => Utf8PathBuf::from_path_buf(p)
            .map_err(|p| PackError::FormatError(format!("Invalid UTF-8 path: {p:?}")))?,
        Err(_) => return Err(PackError::MissingResource(path.to_string())),
    };

    let mut archive = ArchiveReader::open(&archive_path)?;
    let manifest = manifest_of(&mut archive)?;
    info!("reading pack {} {} ({})", manifest.name, manifest.version, manifest.pack_type);

    let staging = tempfile::tempdir()?;
    let staging_root = Utf8PathBuf::from_path_buf(staging.path().to_path_buf())
        .map_err(|p| PackError::FormatError(format!("Invalid UTF-8 path: {p:?}")))?;
    let layout = PackLayout::default();

    let mut model = PackModel::default();
    manifest::apply(&manifest, &mut model);

    for listing in &manifest.mods {
        let rel = sanitize_relative(&listing.file)?;
        let entry = PackLayout::entry(&layout.mods, &rel);
        if !archive.contains(&entry) {
            return Err(PackError::MissingResource(format!("{archive_path}!/{entry}")));
        }

        let staged = staging_root.join(&layout.mods).join(&rel);
        archive.extract_entry(&entry, &staged)?;
        let meta = read_mod_meta(&staged).map_err(|e| match e {
            PackError::FormatError(msg) => PackError::FormatError(format!("member {entry}: {msg}")),
            other => other,
        })?;

        debug!("staged member {} {} from {entry}", meta.name, meta.version);
        model.add_mod(ModEntry::from_meta(staged, meta, true));
    }

    let assets_root = staging_root.join(&layout.assets);
    for rel in archive.extract_prefix(layout.assets.as_str(), &assets_root)? {
        let to = rel.parent().map(|p| p.as_str().to_string()).unwrap_or_default();
        model.add_file(FileEntry::new(assets_root.join(&rel), Some(to)));
    }

    if archive.contains(layout.icon.as_str()) {
        let icon = staging_root.join(&layout.icon);
        archive.extract_entry(layout.icon.as_str(), &icon)?;
        model.icon = Some(icon);
    }

    Ok(OpenedPack {
        model,
        manifest,
        archive_path,
        _staging: staging,
    })
}
