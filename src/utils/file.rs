use crate::models::error::PackError;
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

pub struct FileUtils;

impl FileUtils {
    /// Recursively copies a directory tree from source to destination.
    /// Creates all necessary directories and overwrites existing files.
    pub fn copy_recursive(src: &Utf8Path, dst: &Utf8Path) -> Result<(), PackError> {
        std::fs::create_dir_all(dst)?;

        for entry in WalkDir::new(src) {
            let entry = entry?;
            let src_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                PackError::FormatError(format!("Invalid UTF-8 path: {:?}", entry.path()))
            })?;

            let dst_path = dst.join(src_path.strip_prefix(src)?);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dst_path)?;
            } else {
                Self::copy_file(src_path, &dst_path)?;
            }
        }

        Ok(())
    }

    /// Copies one file, creating the destination's parent directories.
    pub fn copy_file(src: &Utf8Path, dst: &Utf8Path) -> Result<(), PackError> {
        if !src.exists() {
            return Err(PackError::MissingResource(src.to_string()));
        }
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(src, dst)?;
        Ok(())
    }

    /// Copies a file or a whole directory into `dst_dir`, keeping its name.
    pub fn copy_into(src: &Utf8Path, dst_dir: &Utf8Path) -> Result<Utf8PathBuf, PackError> {
        let name = src
            .file_name()
            .ok_or_else(|| PackError::FormatError(format!("Unable to get file name for {src}")))?;
        let dst = dst_dir.join(name);
        if src.is_dir() {
            Self::copy_recursive(src, &dst)?;
        } else {
            Self::copy_file(src, &dst)?;
        }
        Ok(dst)
    }

    /// Removes a file or directory tree. Missing paths are not an error.
    pub fn remove_entry(path: &Utf8Path) -> Result<(), PackError> {
        let Ok(meta) = path.symlink_metadata() else {
            return Ok(());
        };
        if meta.is_dir() {
            std::fs::remove_dir_all(path)?;
        } else {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Moves a file, falling back to copy + delete across filesystems.
    pub fn move_file(src: &Utf8Path, dst: &Utf8Path) -> Result<(), PackError> {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if std::fs::rename(src, dst).is_ok() {
            return Ok(());
        }
        std::fs::copy(src, dst)?;
        std::fs::remove_file(src)?;
        Ok(())
    }

    /// Immediate children of a directory as UTF-8 paths.
    pub fn list_dir(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, PackError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut children: Vec<Utf8PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .filter_map(|e| Utf8PathBuf::from_path_buf(e.path()).ok())
            .collect();
        children.sort();
        Ok(children)
    }

    /// All files below `root`, as paths relative to it, in sorted order.
    pub fn walk_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, PackError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                PackError::FormatError(format!("Invalid UTF-8 path: {:?}", entry.path()))
            })?;
            files.push(path.strip_prefix(root)?.to_path_buf());
        }
        Ok(files)
    }
}
