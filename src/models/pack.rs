use crate::models::manifest::ModMeta;
use camino::{Utf8Path, Utf8PathBuf};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Install policy of a pack.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
pub enum PackType {
    /// Additive: imports members and files, never deletes.
    #[default]
    Distribute,
    /// Disables every installed mod, then installs and enables the members.
    Shadow,
    /// Wipes the data root (keeping backups and cache) and installs the pack in its place.
    Override,
}

impl PackType {
    pub const ALL: [PackType; 3] = [PackType::Distribute, PackType::Shadow, PackType::Override];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.to_string() == s)
    }

    /// Destructive policies take a backup first.
    pub fn needs_backup(&self) -> bool {
        !matches!(self, PackType::Distribute)
    }
}

#[derive(Clone, Debug)]
pub struct ModEntry {
    pub file: Utf8PathBuf,
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub author: String,
    pub dependencies: Vec<String>,
    pub min_game_version: u32,
    pub enabled: bool,
}

impl ModEntry {
    /// Member built from the mod's own manifest, which is authoritative for identity.
    pub fn from_meta(file: Utf8PathBuf, meta: ModMeta, enabled: bool) -> Self {
        Self {
            min_game_version: meta.min_major_version().unwrap_or(0),
            display_name: meta.display_name.unwrap_or_else(|| meta.name.clone()),
            name: meta.name,
            version: meta.version,
            author: meta.author,
            dependencies: meta.dependencies,
            file,
            enabled,
        }
    }

    /// File name the member is stored under inside a pack: `{name}-{version}.{ext}`.
    /// Jars keep their extension; directories and everything else are stored as zips.
    pub fn packed_file_name(&self) -> String {
        let ext = match self.file.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("jar") && !self.file.is_dir() => "jar",
            _ => "zip",
        };
        format!("{}-{}.{}", self.name, self.version, ext)
    }
}

// Identity is (name, author); version and file are payload.
impl PartialEq for ModEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.author == other.author
    }
}

impl Eq for ModEntry {}

impl Hash for ModEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.author.hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub file: Utf8PathBuf,
    /// Destination directory relative to the data root. `None` is rejected by the validator.
    pub to: Option<String>,
}

impl FileEntry {
    pub fn new(file: impl Into<Utf8PathBuf>, to: Option<String>) -> Self {
        Self {
            file: file.into(),
            to,
        }
    }

    pub fn file_name(&self) -> &str {
        self.file.file_name().unwrap_or_default()
    }
}

impl PartialOrd for FileEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file_name()
            .cmp(other.file_name())
            .then_with(|| self.file.cmp(&other.file))
    }
}

#[derive(Clone, Debug, Default)]
pub struct PackModel {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub author: String,

    pub icon: Option<Utf8PathBuf>,
    pub pack_type: PackType,

    pub skip_repeat: bool,
    pub raw_backup: bool,
    pub force: bool,
    pub uncheck: bool,

    mods: Vec<ModEntry>,
    pub file_entries: Vec<FileEntry>,
}

impl PackModel {
    /// Inserts a member mod. An entry with the same (name, author) is replaced in place
    /// and returned.
    pub fn add_mod(&mut self, entry: ModEntry) -> Option<ModEntry> {
        match self.mods.iter_mut().find(|m| **m == entry) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.mods.push(entry);
                None
            }
        }
    }

    pub fn mods(&self) -> &[ModEntry] {
        &self.mods
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ModEntry> {
        self.mods.iter().filter(|m| m.enabled)
    }

    pub fn add_file(&mut self, entry: FileEntry) {
        self.file_entries.push(entry);
    }

    /// File entries sorted by source file name, for listings.
    pub fn display_order(&self) -> Vec<&FileEntry> {
        let mut entries: Vec<_> = self.file_entries.iter().collect();
        entries.sort();
        entries
    }

    /// Internal id written to the manifest.
    pub fn effective_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.display_name
        } else {
            &self.name
        }
    }

    /// Strictest minimum game version among the enabled members.
    pub fn min_game_version(&self) -> u32 {
        self.enabled().map(|m| m.min_game_version).max().unwrap_or(0)
    }

    pub fn has_icon(&self) -> bool {
        self.icon.as_deref().is_some_and(Utf8Path::exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, version: &str, author: &str) -> ModEntry {
        ModEntry {
            file: Utf8PathBuf::from(format!("{name}.zip")),
            name: name.into(),
            display_name: name.into(),
            version: version.into(),
            author: author.into(),
            dependencies: vec![],
            min_game_version: 0,
            enabled: true,
        }
    }

    #[test]
    fn same_name_and_author_replaces_in_place() {
        let mut model = PackModel::default();
        assert!(model.add_mod(entry("a", "1", "x")).is_none());
        assert!(model.add_mod(entry("b", "1", "x")).is_none());

        let old = model.add_mod(entry("a", "2", "x")).unwrap();
        assert_eq!(old.version, "1");
        assert_eq!(model.mods().len(), 2);
        assert_eq!(model.mods()[0].name, "a");
        assert_eq!(model.mods()[0].version, "2");
    }

    #[test]
    fn packed_names_are_archives() {
        let mut jar = entry("a", "1", "x");
        jar.file = Utf8PathBuf::from("mods/a.JAR");
        assert_eq!(jar.packed_file_name(), "a-1.jar");

        let mut odd = entry("b", "2", "x");
        odd.file = Utf8PathBuf::from("mods/b.mod");
        assert_eq!(odd.packed_file_name(), "b-2.zip");

        let mut bare = entry("c", "3", "x");
        bare.file = Utf8PathBuf::from("mods/c");
        assert_eq!(bare.packed_file_name(), "c-3.zip");
    }

    #[test]
    fn different_author_is_a_different_mod() {
        let mut model = PackModel::default();
        model.add_mod(entry("a", "1", "x"));
        model.add_mod(entry("a", "1", "y"));
        assert_eq!(model.mods().len(), 2);
    }

    #[test]
    fn display_order_sorts_by_file_name() {
        let mut model = PackModel::default();
        model.add_file(FileEntry::new("z/b.txt", Some("x".into())));
        model.add_file(FileEntry::new("a/c.txt", Some("x".into())));
        model.add_file(FileEntry::new("q/a.txt", Some("x".into())));

        let names: Vec<_> = model.display_order().iter().map(|e| e.file_name()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
        assert_eq!(model.file_entries[0].file_name(), "b.txt");
    }

    #[test]
    fn min_game_version_ignores_disabled_members() {
        let mut model = PackModel::default();
        let mut a = entry("a", "1", "x");
        a.min_game_version = 140;
        let mut b = entry("b", "1", "x");
        b.min_game_version = 146;
        b.enabled = false;
        model.add_mod(a);
        model.add_mod(b);
        assert_eq!(model.min_game_version(), 140);
    }

    #[test]
    fn pack_type_parses_exact_names() {
        assert_eq!(PackType::parse("Shadow"), Some(PackType::Shadow));
        assert_eq!(PackType::parse("shadow"), None);
    }
}
