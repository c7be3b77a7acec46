//! Tests for command dispatch.

use super::*;
use crate::exit_codes;
use crate::ids::FileId;
use crate::store::{FileStore, LockStore};
use clap::Parser;
use serial_test::serial;
use tempfile::TempDir;

/// A temp dir holding a config whose file store lives inside it.
fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let yaml = format!(
        "lease_ttl_seconds: 60\nstore_dir: '{}'\n",
        temp_dir.path().join("locks").display()
    );
    std::fs::write(temp_dir.path().join("doclease.yaml"), yaml).unwrap();
    temp_dir
}

fn run(temp_dir: &TempDir, args: &[&str]) -> Result<()> {
    let config = temp_dir.path().join("doclease.yaml");
    let mut argv = vec![
        "doclease".to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    dispatch(Cli::try_parse_from(argv).unwrap())
}

fn stored_owner(temp_dir: &TempDir, file_id: &str) -> Option<String> {
    let store = FileStore::open(temp_dir.path().join("locks")).unwrap();
    store
        .get(&FileId::new(file_id).unwrap())
        .unwrap()
        .map(|lock| lock.owner.to_string())
}

#[test]
fn test_init_writes_default_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("conf/doclease.yaml");

    init::cmd_init(&path, crate::cli::InitArgs { force: false }).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.lease_ttl_seconds, Config::default().lease_ttl_seconds);
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let temp_dir = setup();

    let err = run(&temp_dir, &["init"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert!(err.to_string().contains("already exists"));

    // The custom TTL survives the refused init.
    let config = Config::load(temp_dir.path().join("doclease.yaml")).unwrap();
    assert_eq!(config.lease_ttl_seconds, 60);

    run(&temp_dir, &["init", "--force"]).unwrap();
    let config = Config::load(temp_dir.path().join("doclease.yaml")).unwrap();
    assert_eq!(config.lease_ttl_seconds, 300);
}

#[test]
fn test_acquire_persists_and_conflicts() {
    let temp_dir = setup();

    run(&temp_dir, &["acquire", "doc-1", "--session", "alice"]).unwrap();
    assert_eq!(stored_owner(&temp_dir, "doc-1").as_deref(), Some("alice"));

    let err = run(&temp_dir, &["acquire", "doc-1", "--session", "bob"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::LOCK_CONFLICT);
    assert!(err.to_string().contains("alice"));
    assert_eq!(stored_owner(&temp_dir, "doc-1").as_deref(), Some("alice"));
}

#[test]
fn test_release_by_owner_and_stranger() {
    let temp_dir = setup();
    run(&temp_dir, &["acquire", "doc-1", "--session", "alice"]).unwrap();

    let err = run(&temp_dir, &["release", "doc-1", "--session", "bob"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::LOCK_CONFLICT);
    assert!(stored_owner(&temp_dir, "doc-1").is_some());

    run(&temp_dir, &["release", "doc-1", "--session", "alice"]).unwrap();
    assert!(stored_owner(&temp_dir, "doc-1").is_none());

    // Releasing again is a no-op, not an error.
    run(&temp_dir, &["release", "doc-1", "--session", "alice"]).unwrap();
}

#[test]
fn test_check_and_list_succeed() {
    let temp_dir = setup();
    run(&temp_dir, &["acquire", "doc-1", "--session", "alice"]).unwrap();

    run(&temp_dir, &["check", "doc-1", "--session", "bob"]).unwrap();
    run(&temp_dir, &["check", "doc-2", "--session", "bob"]).unwrap();
    run(&temp_dir, &["list"]).unwrap();
    run(&temp_dir, &["--json", "list"]).unwrap();
}

#[test]
fn test_json_mode_maps_statuses_to_exit_codes() {
    let temp_dir = setup();
    run(&temp_dir, &["--json", "acquire", "doc-1", "--session", "alice"]).unwrap();

    let err = run(&temp_dir, &["--json", "acquire", "doc-1", "--session", "bob"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::LOCK_CONFLICT);

    let err = run(&temp_dir, &["--json", "release", "doc-1", "--session", "bob"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::LOCK_CONFLICT);

    run(&temp_dir, &["--json", "check", "doc-1", "--session", "bob"]).unwrap();
    run(&temp_dir, &["--json", "release", "doc-1", "--session", "alice"]).unwrap();
}

#[test]
fn test_empty_identifiers_fail_validation() {
    let temp_dir = setup();

    let err = run(&temp_dir, &["acquire", "", "--session", "alice"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);

    let err = run(&temp_dir, &["--json", "acquire", " ", "--session", "alice"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);

    let err = run(&temp_dir, &["acquire", "doc-1", "--session", ""]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
}

#[test]
fn test_sweep_once_reports_success() {
    let temp_dir = setup();
    run(&temp_dir, &["acquire", "doc-1", "--session", "alice"]).unwrap();

    // Nothing has expired yet, so the lease survives the sweep.
    run(&temp_dir, &["sweep"]).unwrap();
    assert!(stored_owner(&temp_dir, "doc-1").is_some());
}

#[test]
fn test_memory_override_leaves_file_store_untouched() {
    let temp_dir = setup();

    run(&temp_dir, &["--store", "memory", "acquire", "doc-1", "--session", "alice"]).unwrap();
    assert!(stored_owner(&temp_dir, "doc-1").is_none());
}

#[test]
fn test_invalid_config_is_user_error() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("doclease.yaml"),
        "lease_ttl_seconds: 0\n",
    )
    .unwrap();

    let err = run(&temp_dir, &["list"]).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn test_resolve_session_explicit() {
    assert_eq!(
        resolve_session(Some("alice".to_string())).unwrap().as_str(),
        "alice"
    );
    assert!(resolve_session(Some("  ".to_string())).is_err());
}

#[test]
#[serial]
fn test_resolve_session_defaults_to_user_at_host() {
    let session = resolve_session(None).unwrap();
    assert!(session.as_str().contains('@'));
}

#[test]
#[serial]
fn test_session_env_var_is_used() {
    let temp_dir = setup();

    // SAFETY: env-mutating tests run serially.
    unsafe { std::env::set_var("DOCLEASE_SESSION", "carol") };
    let result = run(&temp_dir, &["acquire", "doc-1"]);
    unsafe { std::env::remove_var("DOCLEASE_SESSION") };

    result.unwrap();
    assert_eq!(stored_owner(&temp_dir, "doc-1").as_deref(), Some("carol"));
}

#[test]
fn test_response_error_prefers_error_field() {
    let body = serde_json::json!({ "error": "bad file_id" });
    let err = response_error(crate::api::STATUS_BAD_REQUEST, &body);
    assert!(matches!(err, LeaseError::Validation(ref m) if m == "bad file_id"));

    let body = serde_json::json!({ "action": "not_owner", "message": "held by bob" });
    let err = response_error(crate::api::STATUS_CONFLICT, &body);
    assert!(matches!(err, LeaseError::Conflict(ref m) if m == "held by bob"));
}
