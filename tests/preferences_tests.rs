use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use fraudscope::api::{
    JsonFilePreferenceStore, MemoryPreferenceStore, ThemePreferenceStore, restore_theme,
    toggle_theme,
};
use fraudscope::render::Theme;

fn scratch_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("fraudscope-{name}-{}-{nanos}.json", process::id()))
}

#[test]
fn missing_preference_defaults_to_light() {
    let store = MemoryPreferenceStore::default();
    assert_eq!(restore_theme(&store), Theme::Light);
}

#[test]
fn toggle_persists_new_theme() {
    let store = MemoryPreferenceStore::with_value("light");

    let next = toggle_theme(&store, restore_theme(&store)).expect("toggle");

    assert_eq!(next, Theme::Dark);
    assert_eq!(store.load().expect("load").as_deref(), Some("dark"));
    assert_eq!(restore_theme(&store), Theme::Dark);
}

#[test]
fn unknown_stored_value_falls_back_to_light() {
    let store = MemoryPreferenceStore::with_value("solarized");
    assert_eq!(restore_theme(&store), Theme::Light);
}

#[test]
fn json_file_store_round_trips() {
    let path = scratch_path("roundtrip");
    let store = JsonFilePreferenceStore::new(&path);
    assert_eq!(store.load().expect("missing file is not an error"), None);

    store.save(Theme::Dark).expect("save");
    let raw = fs::read_to_string(&path).expect("file written");
    assert_eq!(raw, r#"{"theme":"dark"}"#);
    assert_eq!(restore_theme(&store), Theme::Dark);

    let _ = fs::remove_file(&path);
}

#[test]
fn corrupt_file_restores_light_theme() {
    let path = scratch_path("corrupt");
    fs::write(&path, "not json").expect("write fixture");
    let store = JsonFilePreferenceStore::new(&path);

    assert!(store.load().is_err());
    assert_eq!(restore_theme(&store), Theme::Light);

    let _ = fs::remove_file(&path);
}
