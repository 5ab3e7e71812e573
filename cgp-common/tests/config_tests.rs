//! Configuration resolution tests
//!
//! Uses serial_test: several tests set or clear process environment
//! variables and must not run in parallel.

use cgp_common::config::{
    load_toml_config, CliOverrides, DashboardConfig, StoreBackend, TomlConfig,
    DEFAULT_BIND_ADDRESS, ENV_AI_API_KEY, ENV_BIND_ADDRESS, ENV_STORE_BACKEND, ENV_SUPABASE_ANON_KEY,
    ENV_SUPABASE_URL,
};
use serial_test::serial;
use std::env;
use std::io::Write;

fn clear_env() {
    for name in [
        ENV_SUPABASE_URL,
        ENV_SUPABASE_ANON_KEY,
        ENV_AI_API_KEY,
        ENV_BIND_ADDRESS,
        ENV_STORE_BACKEND,
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_defaults_without_any_source() {
    clear_env();
    let config = DashboardConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    assert_eq!(config.store.backend, StoreBackend::Fixtures);
    assert!(config.ai.api_key.is_none());
    assert_eq!(config.log_level, "info");
}

#[test]
#[serial]
fn test_supabase_env_selects_rest() {
    clear_env();
    env::set_var(ENV_SUPABASE_URL, "https://example.supabase.co");
    env::set_var(ENV_SUPABASE_ANON_KEY, "anon");

    let config = DashboardConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Rest);
    assert_eq!(config.store.url.as_deref(), Some("https://example.supabase.co"));

    clear_env();
}

#[test]
#[serial]
fn test_rest_without_credentials_falls_back_to_fixtures() {
    clear_env();
    env::set_var(ENV_STORE_BACKEND, "rest");
    env::set_var(ENV_SUPABASE_URL, "https://example.supabase.co");

    let config = DashboardConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Fixtures);

    clear_env();
}

#[test]
#[serial]
fn test_priority_cli_over_env_over_toml() {
    clear_env();
    let mut toml = TomlConfig::default();
    toml.bind_address = Some("10.0.0.1:1000".to_string());
    toml.ai.api_key = Some("toml-key".to_string());

    let config = DashboardConfig::resolve(&CliOverrides::default(), &toml).unwrap();
    assert_eq!(config.bind_address, "10.0.0.1:1000");
    assert_eq!(config.ai.api_key.as_deref(), Some("toml-key"));

    env::set_var(ENV_BIND_ADDRESS, "10.0.0.2:2000");
    env::set_var(ENV_AI_API_KEY, "env-key");
    let config = DashboardConfig::resolve(&CliOverrides::default(), &toml).unwrap();
    assert_eq!(config.bind_address, "10.0.0.2:2000");
    assert_eq!(config.ai.api_key.as_deref(), Some("env-key"));

    let cli = CliOverrides {
        bind_address: Some("10.0.0.3:3000".to_string()),
        ..Default::default()
    };
    let config = DashboardConfig::resolve(&cli, &toml).unwrap();
    assert_eq!(config.bind_address, "10.0.0.3:3000");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_backend_in_env_is_an_error() {
    clear_env();
    env::set_var(ENV_STORE_BACKEND, "oracle");
    assert!(DashboardConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).is_err());
    clear_env();
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_toml_config(Some(&dir.path().join("absent.toml"))).unwrap();
    assert!(config.bind_address.is_none());
}

#[test]
fn test_config_file_is_parsed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "bind_address = \"0.0.0.0:8080\"\n[store]\nbackend = \"sqlite\"\n[logging]\nlevel = \"debug\""
    )
    .unwrap();

    let config = load_toml_config(Some(file.path())).unwrap();
    assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0:8080"));
    assert_eq!(config.store.backend, Some(StoreBackend::Sqlite));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "bind_address = [unclosed").unwrap();
    assert!(load_toml_config(Some(file.path())).is_err());
}
