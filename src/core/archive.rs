use crate::models::error::PackError;
use crate::utils::file::FileUtils;
use crate::utils::path::sanitize_relative;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MAX_PREALLOC: u64 = 1 << 20;

/// Read side of a ZIP/JAR container.
pub struct ArchiveReader {
    path: Utf8PathBuf,
    archive: ZipArchive<File>,
}

impl ArchiveReader {
    pub fn open(path: &Utf8Path) -> Result<Self, PackError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PackError::MissingResource(path.to_string()),
            _ => PackError::from(e),
        })?;
        let archive = ZipArchive::new(file)
            .map_err(|e| PackError::FormatError(format!("{path} is not a readable archive: {e}")))?;

        Ok(Self {
            path: path.to_owned(),
            archive,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Reads one entry fully. A missing entry is a `MissingResource`.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>, PackError> {
        let mut entry = self.archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => {
                PackError::MissingResource(format!("{}!/{name}", self.path))
            }
            other => PackError::from(other),
        })?;
        // The header size is untrusted; cap the up-front allocation.
        let mut buf = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
        entry.read_to_end(&mut buf)?;
        Ok(buf)
    }

    pub fn read_to_string(&mut self, name: &str) -> Result<String, PackError> {
        String::from_utf8(self.read(name)?)
            .map_err(|e| PackError::FormatError(format!("{}!/{name}: {e}", self.path)))
    }

    /// Returns the content of the first of `names` present in the archive.
    pub fn read_first(&mut self, names: &[&str]) -> Result<Option<String>, PackError> {
        match names.iter().find(|n| self.contains(n)) {
            Some(name) => self.read_to_string(name).map(Some),
            None => Ok(None),
        }
    }

    /// Streams one entry into `dest`, creating parent directories.
    pub fn extract_entry(&mut self, name: &str, dest: &Utf8Path) -> Result<(), PackError> {
        let mut entry = self.archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => {
                PackError::MissingResource(format!("{}!/{name}", self.path))
            }
            other => PackError::from(other),
        })?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(dest)?;
        io::copy(&mut entry, &mut out)?;
        Ok(())
    }

    /// Extracts every file under `prefix/` into `dest`, re-rooted at `dest`.
    /// Returns the extracted paths relative to `dest`.
    pub fn extract_prefix(&mut self, prefix: &str, dest: &Utf8Path) -> Result<Vec<Utf8PathBuf>, PackError> {
        let prefix = format!("{}/", prefix.trim_end_matches('/'));
        let mut extracted = Vec::new();

        for i in 0..self.archive.len() {
            let mut entry = self.archive.by_index(i)?;
            let Some(rel) = entry.name().strip_prefix(&prefix) else {
                continue;
            };
            if rel.is_empty() {
                continue;
            }

            let rel = sanitize_relative(rel)?;
            let output_path = dest.join(&rel);

            if entry.is_dir() {
                fs::create_dir_all(&output_path)?;
                continue;
            }
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&output_path)?;
            io::copy(&mut entry, &mut out)?;
            extracted.push(rel);
        }

        debug!("extracted {} entries under {prefix} from {}", extracted.len(), self.path);
        Ok(extracted)
    }
}

/// Write side of a ZIP/JAR container. Entries are written in call order.
pub struct ArchiveWriter {
    path: Utf8PathBuf,
    inner: ZipWriter<File>,
}

impl ArchiveWriter {
    pub fn create(path: &Utf8Path) -> Result<Self, PackError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: path.to_owned(),
            inner: ZipWriter::new(File::create(path)?),
        })
    }

    pub fn add_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<(), PackError> {
        self.inner.start_file(name, file_options())?;
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Streams a file from disk into a new entry.
    pub fn add_file(&mut self, name: &str, src: &Utf8Path) -> Result<(), PackError> {
        let mut input = File::open(src).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PackError::MissingResource(src.to_string()),
            _ => PackError::from(e),
        })?;
        self.inner.start_file(name, file_options())?;
        io::copy(&mut input, &mut self.inner)?;
        Ok(())
    }

    /// Adds every file under `root` as `prefix/<relative path>`, skipping paths for which
    /// `skip` returns true. Returns the number of entries written.
    pub fn add_dir_tree(
        &mut self,
        prefix: &str,
        root: &Utf8Path,
        skip: impl Fn(&Utf8Path) -> bool,
    ) -> Result<usize, PackError> {
        let mut count = 0;
        for rel in FileUtils::walk_files(root)? {
            if skip(&rel) {
                continue;
            }
            let name = join_entry(prefix, &rel);
            self.add_file(&name, &root.join(&rel))?;
            count += 1;
        }
        Ok(count)
    }

    /// Copies entries of `source` in order, skipping names matched by `skip`.
    /// Every entry is read to its end (checksum verified) before the next one starts.
    pub fn copy_from(
        &mut self,
        source: &mut ArchiveReader,
        skip: impl Fn(&str) -> bool,
    ) -> Result<usize, PackError> {
        let mut count = 0;
        for i in 0..source.archive.len() {
            let mut entry = source.archive.by_index(i)?;
            let name = entry.name().to_string();
            if skip(&name) {
                continue;
            }
            if entry.is_dir() {
                self.inner.add_directory(name.as_str(), file_options())?;
            } else {
                self.inner.start_file(name.as_str(), file_options())?;
                io::copy(&mut entry, &mut self.inner)?;
            }
            count += 1;
        }
        Ok(count)
    }

    pub fn finish(self) -> Result<Utf8PathBuf, PackError> {
        self.inner.finish()?;
        Ok(self.path)
    }
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// `prefix/rel` with forward slashes; an empty prefix yields `rel`.
pub fn join_entry(prefix: &str, rel: &Utf8Path) -> String {
    let rel = rel.as_str().replace('\\', "/");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        rel
    } else {
        format!("{prefix}/{rel}")
    }
}
