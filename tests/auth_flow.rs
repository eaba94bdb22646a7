//! Auth Flow Tests
//!
//! Register/login/validate flows against a real on-disk auth store.

use cubby::auth::{AuthError, AuthStore};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> AuthStore {
    AuthStore::open(dir.path().join("auth.redb")).unwrap()
}

#[test]
fn register_login_validate_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let user = store.register("alice", "password123").unwrap();
    assert_eq!(user.username, "alice");

    let token = store.login("alice", "password123").unwrap();
    assert_eq!(store.validate_token(&token).unwrap(), user.id);
}

#[test]
fn user_id_is_stable_across_logins() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let user = store.register("alice", "password123").unwrap();

    let t1 = store.login("alice", "password123").unwrap();
    let t2 = store.login("alice", "password123").unwrap();

    assert_eq!(store.validate_token(&t1).unwrap(), user.id);
    assert_eq!(store.validate_token(&t2).unwrap(), user.id);
}

#[test]
fn second_registration_of_a_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.register("alice", "password123").unwrap();

    assert!(matches!(
        store.register("alice", "differentpass"),
        Err(AuthError::UsernameTaken)
    ));

    // The original credentials still work
    assert!(store.login("alice", "password123").is_ok());
}

#[test]
fn login_rejects_bad_credentials_uniformly() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.register("alice", "password123").unwrap();

    let unknown = store.login("mallory", "password123").unwrap_err();
    let wrong = store.login("alice", "not-the-password").unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[test]
fn tokens_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("auth.redb");

    let (user_id, token) = {
        let store = AuthStore::open(&db_path).unwrap();
        let user = store.register("alice", "password123").unwrap();
        let token = store.login("alice", "password123").unwrap();
        (user.id, token)
    };

    let store = AuthStore::open(&db_path).unwrap();
    assert_eq!(store.validate_token(&token).unwrap(), user_id);
}

#[test]
fn validation_rules_match_registration_contract() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    // Username: 3-20 alphanumeric
    assert!(matches!(
        store.register("ab", "password123"),
        Err(AuthError::InvalidUsername)
    ));
    assert!(matches!(
        store.register("has spaces", "password123"),
        Err(AuthError::InvalidUsername)
    ));

    // Password: at least 8 characters
    assert!(matches!(
        store.register("alice", "seven77"),
        Err(AuthError::WeakPassword(_))
    ));

    // Nothing was persisted by the failed attempts
    assert!(store.find_user("ab").unwrap().is_none());
    assert!(store.find_user("alice").unwrap().is_none());
}
