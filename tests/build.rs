mod common;

use common::{build_pack, make_mod, sandbox, write_source, SourceOptions};
use mod_packer_lib::commands::{settle, status_channel, validate::validate};
use mod_packer_lib::core::archive::ArchiveReader;
use mod_packer_lib::core::pack_builder::{gen_file, load_descriptor};
use mod_packer_lib::core::pack_reader::{read_manifest, read_pack};
use mod_packer_lib::core::validator::check;
use mod_packer_lib::models::error::PackError;
use mod_packer_lib::models::pack::{ModEntry, PackType};
use mod_packer_lib::models::status::PackStatus;
use std::fs;

#[test]
fn test_pack_scenario_exports_manifest_and_member() {
    let (_tmp, root) = sandbox();
    let source = write_source(&root, &SourceOptions::default());

    let model = load_descriptor(&source).unwrap();
    assert_eq!(check(&model).bits(), 0);
    assert_eq!(model.mods()[0].name, "modA");
    assert_eq!(model.mods()[0].min_game_version, 146);

    let out = gen_file(&model, &root.join("out/test-pack.zip")).unwrap();
    let mut archive = ArchiveReader::open(&out).unwrap();
    let text = archive.read_to_string("mod.json").unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["packType"], "Distribute");
    assert_eq!(json["isModpack"], true);
    assert_eq!(json["main"], "main.Installer");
    assert_eq!(json["minGameVersion"], "146");
    assert_eq!(json["mods"].as_array().unwrap().len(), 1);
    assert_eq!(json["mods"][0]["file"], "modA-2.zip");

    assert!(archive.contains("mods/modA-2.zip"));
    assert!(archive.contains("assets/saves/world.msav"));
    assert!(archive.contains("assets/readme.txt"));
    assert!(!archive.contains("icon.png"));
}

#[test]
fn test_read_pack_rebuilds_model() {
    let (_tmp, root) = sandbox();
    let out = build_pack(
        &root,
        &SourceOptions {
            pack_type: "Shadow",
            skip_repeat: true,
            ..Default::default()
        },
    );

    let opened = read_pack(&out).unwrap();
    let model = &opened.model;
    assert_eq!(model.name, "test-pack");
    assert_eq!(model.display_name, "Test Pack");
    assert_eq!(model.pack_type, PackType::Shadow);
    assert!(model.skip_repeat);

    let member = &model.mods()[0];
    assert_eq!((member.name.as_str(), member.version.as_str(), member.author.as_str()), ("modA", "2", "alice"));
    assert!(member.file.exists());

    let mut files: Vec<_> = model
        .file_entries
        .iter()
        .map(|f| (f.file_name().to_string(), f.to.clone().unwrap()))
        .collect();
    files.sort();
    assert_eq!(
        files,
        [
            ("readme.txt".to_string(), String::new()),
            ("world.msav".to_string(), "saves".to_string())
        ]
    );
    assert_eq!(check(model).bits(), 0);
}

#[test]
fn test_staging_is_removed_with_the_pack() {
    let (_tmp, root) = sandbox();
    let out = build_pack(&root, &SourceOptions::default());

    let opened = read_pack(&out).unwrap();
    let staged = opened.model.mods()[0].file.clone();
    assert!(staged.exists());
    drop(opened);
    assert!(!staged.exists());
}

#[test]
fn test_invalid_model_is_not_exported() {
    let (_tmp, root) = sandbox();
    let source = write_source(&root, &SourceOptions::default());
    let mut model = load_descriptor(&source).unwrap();
    model.author = String::new();
    model.file_entries[0].to = None;

    let out = root.join("out/bad.zip");
    match gen_file(&model, &out) {
        Err(PackError::Validation(status)) => {
            assert_eq!(status.bits(), PackStatus::METAINFO_INVALID | PackStatus::FILES_INVALID)
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(!out.exists());
}

#[test]
fn test_unbundled_dependency_is_a_dependency_error() {
    let (_tmp, root) = sandbox();
    let source = write_source(&root, &SourceOptions::default());
    let mut model = load_descriptor(&source).unwrap();

    let needy = make_mod(&source.join("mods"), "needy", "1", "alice", &["modA", "core-lib"]);
    let meta = mod_packer_lib::core::manifest::read_mod_meta(&needy).unwrap();
    model.add_mod(ModEntry::from_meta(needy, meta, true));

    match gen_file(&model, &root.join("out/needy.zip")) {
        Err(PackError::Dependency(unmet)) => assert_eq!(unmet, ["needy -> core-lib"]),
        other => panic!("expected dependency error, got {other:?}"),
    }

    model.uncheck = true;
    assert!(gen_file(&model, &root.join("out/needy.zip")).is_ok());
}

#[test]
fn test_disabled_member_is_left_out() {
    let (_tmp, root) = sandbox();
    let source = write_source(&root, &SourceOptions::default());
    make_mod(&source.join("mods"), "extra", "5", "dan", &[]);
    let mut descriptor = fs::read_to_string(source.join("pack.toml")).unwrap();
    descriptor.push_str("\n[[mods]]\nfile = \"mods/extra.zip\"\nenabled = false\n");
    fs::write(source.join("pack.toml"), descriptor).unwrap();

    let model = load_descriptor(&source).unwrap();
    assert_eq!(model.mods().len(), 2);

    let out = gen_file(&model, &root.join("out/p.zip")).unwrap();
    let manifest = read_manifest(&out).unwrap();
    assert_eq!(manifest.mods.len(), 1);
    assert!(!ArchiveReader::open(&out).unwrap().contains("mods/extra-5.zip"));
}

#[test]
fn test_missing_member_in_archive_is_reported() {
    let (_tmp, root) = sandbox();
    let path = root.join("broken.zip");
    let manifest = r#"{"isModpack":true,"name":"p","displayName":"P","version":"1","author":"a",
        "packType":"Distribute","mods":[{"name":"ghost","version":"1","author":"a","file":"ghost-1.zip"}]}"#;
    let mut writer = mod_packer_lib::core::archive::ArchiveWriter::create(&path).unwrap();
    writer.add_bytes("mod.json", manifest.as_bytes()).unwrap();
    writer.finish().unwrap();

    assert!(matches!(read_pack(&path), Err(PackError::MissingResource(_))));
}

#[test]
fn test_member_without_manifest_is_a_format_error() {
    let (_tmp, root) = sandbox();
    let path = root.join("nameless.zip");
    let manifest = r#"{"isModpack":true,"name":"p","displayName":"P","version":"1","author":"a",
        "packType":"Shadow","mods":[{"name":"bare","version":"1","author":"a","file":"bare-1.zip"}]}"#;

    let member = root.join("bare-1.zip");
    let mut inner = mod_packer_lib::core::archive::ArchiveWriter::create(&member).unwrap();
    inner.add_bytes("classes/Bare.class", b"code").unwrap();
    inner.finish().unwrap();

    let mut writer = mod_packer_lib::core::archive::ArchiveWriter::create(&path).unwrap();
    writer.add_bytes("mod.json", manifest.as_bytes()).unwrap();
    writer.add_file("mods/bare-1.zip", &member).unwrap();
    writer.finish().unwrap();

    assert!(matches!(read_pack(&path), Err(PackError::FormatError(_))));
}

#[test]
fn test_plain_mod_is_not_a_pack() {
    let (_tmp, root) = sandbox();
    let plain = make_mod(&root, "plain", "1", "a", &[]);
    assert!(matches!(read_pack(&plain), Err(PackError::NotAPack(_))));
}

#[tokio::test]
async fn test_validate_lists_files_by_name() {
    let (_tmp, root) = sandbox();
    let out = build_pack(&root, &SourceOptions::default());

    let (tx, printer) = status_channel();
    let report = settle(validate(out, tx).await, printer).await.unwrap();

    assert!(report.outcome().is_ok());
    assert_eq!(report.manifest.name, "test-pack");
    assert_eq!(report.files, ["readme.txt", "saves/world.msav"]);
}

#[tokio::test]
async fn test_failed_task_still_drains_status() {
    let (_tmp, root) = sandbox();
    let (tx, printer) = status_channel();
    let result = settle(validate(root.join("absent.zip"), tx).await, printer).await;
    assert!(matches!(result, Err(PackError::MissingResource(_))));
}
