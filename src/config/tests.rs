use std::io::Write;

use serial_test::serial;
use stockroom_client::OrderStatus;
use tempfile::NamedTempFile;

use super::*;

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_API_URL);
    assert_eq!(config.session.storage_key, DEFAULT_SESSION_KEY);
    assert!(config.workflow.transitions.is_none());
}

#[test]
fn test_config_for_test_is_valid() {
    assert!(Config::for_test().validate().is_ok());
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = yaml_file(
        r#"
api:
  base_url: https://api.shop.test
  timeout_secs: 5
cache:
  stale_time_secs: 10
session:
  storage_key: admin-session
"#,
    );

    let config = Config::load(file.path().to_str()).unwrap();

    assert_eq!(config.api.base_url, "https://api.shop.test");
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.cache.stale_time_secs, 10);
    assert_eq!(config.cache.max_capacity, 1_000);
    assert_eq!(config.session.storage_key, "admin-session");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let file = yaml_file("api:\n  base_url: https://from-file.test\n");
    std::env::set_var("STOCKROOM__API__BASE_URL", "https://from-env.test");
    std::env::set_var("STOCKROOM__CACHE__RETRY_ATTEMPTS", "7");

    let result = Config::load(file.path().to_str());

    std::env::remove_var("STOCKROOM__API__BASE_URL");
    std::env::remove_var("STOCKROOM__CACHE__RETRY_ATTEMPTS");

    let config = result.unwrap();
    assert_eq!(config.api.base_url, "https://from-env.test");
    assert_eq!(config.cache.retry_attempts, 7);
}

#[test]
#[serial]
fn test_config_env_var_names_file() {
    let file = yaml_file("api:\n  base_url: https://named.test\n");
    std::env::set_var(CONFIG_ENV_VAR, file.path());

    let result = Config::load(None);

    std::env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(result.unwrap().api.base_url, "https://named.test");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    let result = Config::load(Some("/nonexistent/stockroom.yaml"));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_invalid_workflow_is_rejected_at_load() {
    let file = yaml_file(
        r#"
workflow:
  transitions:
    NEW: [NEW]
"#,
    );

    let result = Config::load(file.path().to_str());
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
#[serial]
fn test_workflow_override_from_file() {
    let file = yaml_file(
        r#"
workflow:
  transitions:
    NEW: [PRINT, REFUND]
    PRINT: [PICKING_UP, REFUND]
    PICKING_UP: [PROCESSING, REFUND]
    PROCESSING: [SHIPPING, REFUND]
    SHIPPING: [DELIVERED, REFUND]
    DELIVERED: [REFUND]
    MISSING: [NEW, REFUND]
    REFUND: []
"#,
    );

    let config = Config::load(file.path().to_str()).unwrap();
    let table = config.workflow.table().unwrap();

    assert!(!table.can_transition(OrderStatus::New, OrderStatus::Missing));
    assert!(table.can_transition(OrderStatus::Missing, OrderStatus::New));
}

#[test]
fn test_zero_capacity_is_rejected() {
    let mut config = Config::for_test();
    config.cache.max_capacity = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}
