// Tests for the persisted settings store

use annomap_core::config::{
    AUTH_TOKEN_KEY, DATABASE_FILE, REFERENCE_ID_KEY, Settings, SettingsStore, database_path,
};
use tempfile::TempDir;

fn temp_store() -> (TempDir, SettingsStore) {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(&dir.path().join(DATABASE_FILE)).unwrap();
    (dir, store)
}

// ============================================================================
// Store lifecycle
// ============================================================================

#[test]
fn test_new_creates_database_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DATABASE_FILE);
    assert!(!SettingsStore::exists(&path));

    SettingsStore::new(&path).unwrap();
    assert!(SettingsStore::exists(&path));
}

#[test]
fn test_drop_removes_database_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DATABASE_FILE);
    SettingsStore::new(&path).unwrap();

    SettingsStore::drop(&path).unwrap();
    assert!(!SettingsStore::exists(&path));
}

#[test]
fn test_drop_missing_database_fails() {
    let dir = TempDir::new().unwrap();
    assert!(SettingsStore::drop(&dir.path().join(DATABASE_FILE)).is_err());
}

#[test]
fn test_values_persist_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DATABASE_FILE);

    {
        let store = SettingsStore::new(&path).unwrap();
        store.set_auth_token("secret-token").unwrap();
        store.set_reference_id("12345").unwrap();
    }

    let store = SettingsStore::new(&path).unwrap();
    assert_eq!(store.auth_token().unwrap().as_deref(), Some("secret-token"));
    assert_eq!(store.reference_id().unwrap().as_deref(), Some("12345"));
}

// ============================================================================
// Key-value access
// ============================================================================

#[test]
fn test_get_missing_key() {
    let (_dir, store) = temp_store();
    assert_eq!(store.get("nothing").unwrap(), None);
}

#[test]
fn test_set_overwrites_value() {
    let (_dir, store) = temp_store();
    store.set(REFERENCE_ID_KEY, "1").unwrap();
    store.set(REFERENCE_ID_KEY, "2").unwrap();
    assert_eq!(store.get(REFERENCE_ID_KEY).unwrap().as_deref(), Some("2"));
}

#[test]
fn test_remove_reports_whether_value_existed() {
    let (_dir, store) = temp_store();
    store.set(AUTH_TOKEN_KEY, "token").unwrap();

    assert!(store.remove(AUTH_TOKEN_KEY).unwrap());
    assert!(!store.remove(AUTH_TOKEN_KEY).unwrap());
    assert_eq!(store.auth_token().unwrap(), None);
}

#[test]
fn test_typed_accessors_use_known_keys() {
    let store = SettingsStore::in_memory().unwrap();
    store.set_auth_token("token").unwrap();
    store.set_reference_id("987").unwrap();

    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("token"));
    assert_eq!(store.get(REFERENCE_ID_KEY).unwrap().as_deref(), Some("987"));
}

// ============================================================================
// Snapshot
// ============================================================================

#[test]
fn test_load_empty_store() {
    let store = SettingsStore::in_memory().unwrap();
    assert_eq!(store.load().unwrap(), Settings::default());
}

#[test]
fn test_load_saved_settings() {
    let store = SettingsStore::in_memory().unwrap();
    store.set_auth_token("token").unwrap();
    store.set_reference_id("42").unwrap();

    assert_eq!(
        store.load().unwrap(),
        Settings {
            auth_token: Some("token".to_string()),
            reference_id: Some("42".to_string()),
        }
    );
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_database_path_joins_file_name() {
    let path = database_path("/tmp/annomap-test/");
    assert_eq!(path, std::path::PathBuf::from("/tmp/annomap-test/annomap.db"));
}

#[test]
fn test_database_path_expands_tilde() {
    let path = database_path("~/.config/annomap/");
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with(".config/annomap/annomap.db"));
}
