use crate::models::error::PackError;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use tracing::{debug, warn};
use uuid::Uuid;

/// Advisory single-writer lock on a data root, held for the whole of an install or
/// recovery. Released on drop.
#[derive(Debug)]
pub struct TargetLock {
    path: Utf8PathBuf,
    owner: Uuid,
}

impl TargetLock {
    pub fn acquire(path: &Utf8Path) -> Result<Self, PackError> {
        let owner = Uuid::new_v4();
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = std::fs::read_to_string(path).unwrap_or_default();
                return Err(PackError::TargetLocked(format!("{path} (held by {})", holder.trim())));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(owner.to_string().as_bytes())?;

        debug!("acquired {path} as {owner}");
        Ok(Self {
            path: path.to_owned(),
            owner,
        })
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }
}

impl Drop for TargetLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("failed to release {}: {e}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn second_acquire_fails_until_release() {
        let tmp = tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().join(".modpack.lock")).unwrap();

        let lock = TargetLock::acquire(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), lock.owner().to_string());

        let err = TargetLock::acquire(&path).unwrap_err();
        assert!(matches!(err, PackError::TargetLocked(_)));

        drop(lock);
        assert!(!path.exists());
        assert!(TargetLock::acquire(&path).is_ok());
    }
}
