#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use mod_packer_lib::core::archive::ArchiveWriter;
use mod_packer_lib::core::pack_builder;
use mod_packer_lib::utils::snapshot::Snapshot;
use std::fs;
use tempfile::TempDir;

pub fn sandbox() -> (TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    (tmp, root)
}

/// Writes `{dir}/{name}.zip` holding a `mod.json` and one class file.
pub fn make_mod(dir: &Utf8Path, name: &str, version: &str, author: &str, deps: &[&str]) -> Utf8PathBuf {
    let path = dir.join(format!("{name}.zip"));
    let manifest = serde_json::json!({
        "name": name,
        "displayName": name.to_uppercase(),
        "version": version,
        "author": author,
        "dependencies": deps,
        "minGameVersion": "146",
    });

    let mut writer = ArchiveWriter::create(&path).unwrap();
    writer.add_bytes("mod.json", manifest.to_string().as_bytes()).unwrap();
    writer
        .add_bytes(&format!("classes/{name}.class"), format!("{name}@{version}").as_bytes())
        .unwrap();
    writer.finish().unwrap();
    path
}

/// A data root with two enabled mods, saved games, settings and a cache directory.
pub fn setup_target(root: &Utf8Path) -> Utf8PathBuf {
    let data = root.join("data");
    let mods = data.join("mods");
    fs::create_dir_all(&mods).unwrap();

    make_mod(&mods, "old", "1", "bob", &[]);
    make_mod(&mods, "other", "3", "carol", &[]);

    fs::create_dir_all(data.join("saves")).unwrap();
    fs::write(data.join("saves/world.msav"), "original world").unwrap();
    fs::create_dir_all(data.join("cache")).unwrap();
    fs::write(data.join("cache/sprites.bin"), "cached").unwrap();
    fs::write(data.join("settings.toml"), "locale = \"en\"\nvolume = 5\n").unwrap();

    data
}

pub struct SourceOptions<'a> {
    pub pack_type: &'a str,
    pub skip_repeat: bool,
    pub raw_backup: bool,
    pub force: bool,
}

impl Default for SourceOptions<'_> {
    fn default() -> Self {
        Self {
            pack_type: "Distribute",
            skip_repeat: false,
            raw_backup: false,
            force: false,
        }
    }
}

/// Authoring directory with member `modA` 2 by alice and `saves/world.msav`.
pub fn write_source(root: &Utf8Path, options: &SourceOptions) -> Utf8PathBuf {
    let source = root.join("source");
    fs::create_dir_all(source.join("mods")).unwrap();
    fs::create_dir_all(source.join("files")).unwrap();

    make_mod(&source.join("mods"), "modA", "2", "alice", &[]);
    fs::write(source.join("files/world.msav"), "packed world").unwrap();
    fs::write(source.join("files/readme.txt"), "hello").unwrap();

    let descriptor = format!(
        r#"name = "test-pack"
display_name = "Test Pack"
description = "integration pack"
version = "1.0"
author = "alice"
pack_type = "{}"
skip_repeat = {}
raw_backup = {}
force = {}

[[mods]]
file = "mods/modA.zip"

[[files]]
file = "files/world.msav"
to = "saves"

[[files]]
file = "files/readme.txt"
to = ""
"#,
        options.pack_type, options.skip_repeat, options.raw_backup, options.force
    );
    fs::write(source.join("pack.toml"), descriptor).unwrap();
    source
}

pub fn build_pack(root: &Utf8Path, options: &SourceOptions) -> Utf8PathBuf {
    let source = write_source(root, options);
    let model = pack_builder::load_descriptor(&source).unwrap();
    pack_builder::gen_file(&model, &root.join("out/test-pack.zip")).unwrap()
}

/// Every file under `root` except the cache, the lock and recovery units.
pub fn snapshot(root: &Utf8Path) -> Snapshot {
    Snapshot::capture(root, |rel| {
        let s = rel.as_str();
        !s.starts_with("cache") && !s.starts_with(".modpack.lock") && !s.starts_with("mods/backup-")
    })
    .unwrap()
}

pub fn file_names(dir: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

/// Adds a member stored as the directory `mods/{dir_name}` to an authoring directory.
pub fn add_dir_member(source: &Utf8Path, dir_name: &str, name: &str, version: &str) {
    let dir = source.join("mods").join(dir_name);
    fs::create_dir_all(dir.join("sprites")).unwrap();
    let manifest = serde_json::json!({
        "name": name,
        "version": version,
        "author": "dave",
        "minGameVersion": "146",
    });
    fs::write(dir.join("mod.json"), manifest.to_string()).unwrap();
    fs::write(dir.join("sprites/icon.png"), "png").unwrap();

    let descriptor = fs::read_to_string(source.join("pack.toml")).unwrap();
    let member = format!("[[mods]]\nfile = \"mods/{dir_name}\"\n\n[[files]]");
    fs::write(source.join("pack.toml"), descriptor.replacen("[[files]]", &member, 1)).unwrap();
}
