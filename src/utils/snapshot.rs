use crate::models::error::PackError;
use crate::utils::file::FileUtils;
use crate::utils::id::{content_id, content_id_reader};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;

/// Relative path -> content id of every file under a root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub files: BTreeMap<Utf8PathBuf, String>,
}

impl Snapshot {
    /// Captures every file below `root` for which `keep` returns true.
    pub fn capture(
        root: &Utf8Path,
        keep: impl Fn(&Utf8Path) -> bool,
    ) -> Result<Self, PackError> {
        let mut files = BTreeMap::new();
        for rel in FileUtils::walk_files(root)? {
            if !keep(&rel) {
                continue;
            }
            let mut file = std::fs::File::open(root.join(&rel))?;
            files.insert(rel, content_id_reader(&mut file)?);
        }
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Single id over the whole listing, independent of traversal order.
    pub fn digest(&self) -> String {
        let listing: String = self
            .files
            .iter()
            .map(|(path, id)| format!("{}\t{id}\n", path.as_str().replace('\\', "/")))
            .collect();
        content_id(listing.as_bytes())
    }
}
