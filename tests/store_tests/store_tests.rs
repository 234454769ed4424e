//! Tests for SaveStore
//!
//! These tests verify:
//! - Loading a directory with missing, plain, encrypted and corrupt files
//! - Persist → load round-trips
//! - Atomic writes (no temp files left behind)
//! - Config validation

use std::fs;
use std::path::Path;

use gdsave::codec::crypt::{decrypt_save, XOR_KEY};
use gdsave::{Config, Database, Level, Part, Persist, SaveError, SaveStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (SaveStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SaveStore::open_path(dir.path()).unwrap();
    (store, dir)
}

fn plain_store(dir: &Path) -> SaveStore {
    let config = Config::builder().save_dir(dir).encrypt(false).build();
    SaveStore::new(config).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_empty_directory_gives_defaults() {
    let (store, _dir) = setup_store();

    let database = store.load().unwrap();
    let (main, levels) = database.as_parts();

    assert!(main.is_defaulted());
    assert!(levels.is_defaulted());
    drop((main, levels));
    assert_eq!(database.username(), "unknown");
    assert!(database.load_my_levels().is_empty());
}

#[test]
fn test_load_missing_directory_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let store = SaveStore::open_path(&dir.path().join("not-created-yet")).unwrap();

    let database = store.load().unwrap();

    assert_eq!(database.udid(), "S0");
}

#[test]
fn test_load_garbage_files_gives_defaults() {
    let (store, dir) = setup_store();
    fs::write(dir.path().join("CCGameManager.dat"), b"\x00\x01garbage\xff").unwrap();
    fs::write(dir.path().join("CCLocalLevels.dat"), b"").unwrap();

    let database = store.load().unwrap();

    assert!(database.main().is_defaulted());
    assert!(database.levels().is_defaulted());
}

#[test]
fn test_load_plain_xml_files() {
    let (store, dir) = setup_store();
    fs::write(
        dir.path().join("CCGameManager.dat"),
        r#"<?xml version="1.0"?><plist version="1.0" gjver="2.0"><dict><k>GJA_001</k><s>Plain</s></dict></plist>"#,
    )
    .unwrap();

    let database = store.load().unwrap();

    assert!(!database.main().is_defaulted());
    assert_eq!(database.username(), "Plain");
    assert!(database.levels().is_defaulted());
}

#[test]
fn test_read_section_of_missing_file_is_empty() {
    let (store, dir) = setup_store();

    let bytes = store.read_section(&dir.path().join("nope.dat")).unwrap();

    assert!(bytes.is_empty());
}

// =============================================================================
// Persist Tests
// =============================================================================

#[test]
fn test_persist_then_load_round_trip() {
    let (store, _dir) = setup_store();

    let database = Database::empty();
    database.set_username("Persisted");
    database.set_account_id(777);
    database.dump_my_levels(&[Level::new(0, "Mine A"), Level::new(0, "Mine B")]).unwrap();
    database.dump_saved_levels(&[Level::new(128, "Downloaded")]).unwrap();
    database.dump(&store).unwrap();

    let loaded = store.load().unwrap();

    assert!(!loaded.main().is_defaulted());
    assert!(!loaded.levels().is_defaulted());
    assert_eq!(loaded.username(), "Persisted");
    assert_eq!(loaded.account_id(), 777);

    let mine: Vec<String> = loaded.load_my_levels().iter().map(|l| l.name.clone()).collect();
    assert_eq!(mine, vec!["Mine A", "Mine B"]);

    let saved = loaded.load_saved_levels();
    assert_eq!(saved.get_by_id(128).map(Level::name), Some("Downloaded"));
}

#[test]
fn test_persist_writes_encrypted_files() {
    let (store, dir) = setup_store();
    let database = Database::empty();
    database.set_username("Secret");

    store.persist(&database).unwrap();

    let raw = fs::read(dir.path().join("CCGameManager.dat")).unwrap();
    assert!(!raw.starts_with(b"<?xml"));

    let document = decrypt_save(&raw, XOR_KEY).unwrap();
    let text = String::from_utf8(document).unwrap();
    assert!(text.contains("<k>GJA_001</k><s>Secret</s>"));
}

#[test]
fn test_persist_plain_files() {
    let dir = TempDir::new().unwrap();
    let store = plain_store(dir.path());
    let database = Database::empty();
    database.set_player_name("Readable");

    database.dump(&store).unwrap();

    let text = fs::read_to_string(dir.path().join("CCGameManager.dat")).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains("<s>Readable</s>"));

    // Plain files load through an encrypting store as well
    let loaded = SaveStore::open_path(dir.path()).unwrap().load().unwrap();
    assert_eq!(loaded.player_name(), "Readable");
}

#[test]
fn test_persist_creates_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = SaveStore::open_path(&nested).unwrap();

    Database::empty().dump(&store).unwrap();

    assert!(nested.join("CCGameManager.dat").exists());
    assert!(nested.join("CCLocalLevels.dat").exists());
}

#[test]
fn test_persist_leaves_no_temp_files() {
    let (store, dir) = setup_store();

    Database::empty().dump(&store).unwrap();
    Database::empty().dump(&store).unwrap();

    assert_eq!(
        file_names(dir.path()),
        vec!["CCGameManager.dat", "CCLocalLevels.dat"]
    );
}

#[test]
fn test_failed_rename_removes_temp_file() {
    let (store, dir) = setup_store();
    // A non-empty directory where the section file should go
    let blocked = dir.path().join("CCGameManager.dat");
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep"), b"x").unwrap();

    let result = store.write_section(&blocked, &Part::default());

    assert!(matches!(result, Err(SaveError::Io(_))));
    assert!(!dir.path().join("CCGameManager.dat.tmp").exists());
    assert_eq!(file_names(dir.path()), vec!["CCGameManager.dat"]);
}

#[test]
fn test_persist_custom_file_names_and_key() {
    let dir = TempDir::new().unwrap();
    let config = Config::builder()
        .save_dir(dir.path())
        .main_file("main.dat")
        .levels_file("levels.dat")
        .xor_key(0x2a)
        .compression_level(9)
        .build();
    let store = SaveStore::new(config).unwrap();

    let database = Database::empty();
    database.set_udid("S99");
    database.dump(&store).unwrap();

    assert_eq!(file_names(dir.path()), vec!["levels.dat", "main.dat"]);
    assert_eq!(store.load().unwrap().udid(), "S99");

    // The default key cannot read it
    let default_key = SaveStore::new(
        Config::builder()
            .save_dir(dir.path())
            .main_file("main.dat")
            .levels_file("levels.dat")
            .build(),
    )
    .unwrap();
    assert_eq!(default_key.load().unwrap().udid(), "S0");
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.main_file, "CCGameManager.dat");
    assert_eq!(config.levels_file, "CCLocalLevels.dat");
    assert!(config.encrypt);
    assert_eq!(config.xor_key, 11);
    assert!(config.main_path().ends_with("CCGameManager.dat"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let same_names = Config::builder().main_file("x.dat").levels_file("x.dat").build();
    let empty_name = Config::builder().main_file("").build();
    let bad_level = Config::builder().compression_level(10).build();

    for config in [same_names, empty_name, bad_level] {
        assert!(matches!(SaveStore::new(config), Err(SaveError::Config(_))));
    }
}
