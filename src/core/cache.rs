use crate::core::registry::ModRegistry;
use crate::models::error::PackError;
use crate::models::mod_dto::LoadedMod;
use crate::utils::time::get_unix_timestamp_millis;
use std::collections::BTreeMap;
use tracing::debug;

/// Identifies the registry snapshot an index was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotToken {
    pub entries: usize,
    pub built_at: u128,
}

/// Name -> installed mod, built from one registry listing.
///
/// The index does not observe the registry; callers rebuild it after mutating.
#[derive(Clone, Debug)]
pub struct ModIndex {
    mods: BTreeMap<String, LoadedMod>,
    token: SnapshotToken,
}

impl ModIndex {
    pub fn build(registry: &dyn ModRegistry) -> Result<Self, PackError> {
        let listing = registry.list()?;
        let token = SnapshotToken {
            entries: listing.len(),
            built_at: get_unix_timestamp_millis(),
        };

        let mut mods = BTreeMap::new();
        for m in listing {
            // An enabled copy shadows a disabled one of the same name.
            let shadowed =
                !m.enabled && matches!(mods.get(&m.name), Some(LoadedMod { enabled: true, .. }));
            if !shadowed {
                mods.insert(m.name.clone(), m);
            }
        }

        Ok(Self { mods, token })
    }

    /// Replaces the index with a fresh listing. Returns whether the listing differs from
    /// the snapshot the index was built from.
    pub fn rebuild(&mut self, registry: &dyn ModRegistry) -> Result<bool, PackError> {
        let fresh = Self::build(registry)?;
        let changed = fresh.token.entries != self.token.entries || fresh.mods != self.mods;
        if changed {
            debug!(
                "mod index refreshed: {} -> {} entries",
                self.token.entries, fresh.token.entries
            );
        }
        *self = fresh;
        Ok(changed)
    }

    pub fn get(&self, name: &str) -> Option<&LoadedMod> {
        self.mods.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::{Utf8Path, Utf8PathBuf};
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemRegistry {
        mods: RefCell<Vec<LoadedMod>>,
    }

    impl MemRegistry {
        fn push(&self, name: &str, file: &str, enabled: bool) {
            self.mods.borrow_mut().push(LoadedMod {
                name: name.into(),
                display_name: name.into(),
                version: "1".into(),
                author: "a".into(),
                dependencies: vec![],
                min_game_version: None,
                file: Utf8PathBuf::from(file),
                enabled,
                is_modpack: false,
                is_backup: false,
            });
        }
    }

    impl ModRegistry for MemRegistry {
        fn list(&self) -> Result<Vec<LoadedMod>, PackError> {
            Ok(self.mods.borrow().clone())
        }

        fn import(&mut self, _archive: &Utf8Path) -> Result<LoadedMod, PackError> {
            unreachable!()
        }

        fn remove(&mut self, _installed: &LoadedMod) -> Result<(), PackError> {
            unreachable!()
        }

        fn set_enabled(&mut self, _installed: &LoadedMod, _enabled: bool) -> Result<LoadedMod, PackError> {
            unreachable!()
        }
    }

    #[test]
    fn enabled_copy_shadows_disabled_one() {
        let registry = MemRegistry::default();
        registry.push("a", "mods/a.zip", true);
        registry.push("a", "mods/a-old.zip.disabled", false);
        registry.push("b", "mods/b.zip.disabled", false);

        let index = ModIndex::build(&registry).unwrap();
        assert_eq!(index.token.entries, 3);
        assert_eq!(index.get("a").unwrap().file, "mods/a.zip");
        assert!(!index.get("b").unwrap().enabled);
        assert!(index.get("c").is_none());
    }

    #[test]
    fn rebuild_reports_stale_snapshot() {
        let registry = MemRegistry::default();
        registry.push("a", "mods/a.zip", true);
        let mut index = ModIndex::build(&registry).unwrap();

        assert!(!index.rebuild(&registry).unwrap());

        registry.push("b", "mods/b.zip", true);
        assert!(index.get("b").is_none());
        assert!(index.rebuild(&registry).unwrap());
        assert_eq!(index.token.entries, 2);
        assert!(index.get("b").is_some());
    }
}
