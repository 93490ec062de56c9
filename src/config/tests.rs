//! Configuration tests

use super::*;
use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// The generated template must parse back to the same config
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: FileConfig = toml::from_str(&toml_str)
        .unwrap_or_else(|e| panic!("Default config should round-trip.\nTOML:\n{toml_str}\nError: {e}"));
    assert_eq!(Config::merge(parsed, no_env), config);
}

#[test]
fn test_config_roundtrip_custom_values() {
    let config = Config {
        api_base: Some("https://charts.example.com".to_string()),
        timeout_secs: Some(12),
        logging: LoggingConfig {
            level: "debug".to_string(),
            file_enabled: true,
            file_dir: PathBuf::from("/var/log/pie"),
            file_rotation: LogRotation::Hourly,
            file_prefix: "charts".to_string(),
        },
    };

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(Config::merge(parsed, no_env), config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
api_base = "https://file.example.com"
timeout_secs = 5

[logging]
level = "warn"
"#,
    )
    .unwrap();

    let env = env_of(&[
        (ENV_API_BASE, "https://env.example.com"),
        (ENV_TIMEOUT_SECS, "9"),
        (ENV_LOG_LEVEL, "trace"),
    ]);
    let config = Config::merge(file, env);

    assert_eq!(config.api_base.as_deref(), Some("https://env.example.com"));
    assert_eq!(config.timeout_secs, Some(9));
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn test_blank_and_zero_values_unset() {
    let env = env_of(&[(ENV_API_BASE, "  "), (ENV_TIMEOUT_SECS, "0")]);
    let config = Config::merge(FileConfig::default(), env);

    assert_eq!(config.api_base, None);
    assert_eq!(config.timeout_secs, None);
}

#[test]
fn test_unparseable_env_timeout_falls_back_to_file() {
    let file = FileConfig {
        timeout_secs: Some(30),
        ..FileConfig::default()
    };
    let config = Config::merge(file, env_of(&[(ENV_TIMEOUT_SECS, "soon")]));
    assert_eq!(config.timeout_secs, Some(30));
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging section
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_logging_partial_section_keeps_defaults() {
    let file: FileConfig = toml::from_str(
        r#"
[logging]
file_enabled = true
file_rotation = "NEVER"
"#,
    )
    .unwrap();
    let logging = Config::merge(file, no_env).logging;

    assert!(logging.file_enabled);
    assert_eq!(logging.file_rotation, LogRotation::Never);
    assert_eq!(logging.level, "info");
    assert_eq!(logging.file_prefix, "pie-chart");
}

#[test]
fn test_logging_unknown_rotation_rolls_daily() {
    let file: FileConfig = toml::from_str(
        r#"
[logging]
level = "debug"
file_rotation = "weekly"
file_dir = "/tmp/pie-logs"
"#,
    )
    .unwrap();
    let logging = file.logging.unwrap();

    assert_eq!(logging.file_rotation, LogRotation::Daily);
    assert_eq!(logging.file_dir, PathBuf::from("/tmp/pie-logs"));
    assert!(!logging.file_enabled);
}

#[test]
fn test_log_rotation_parse() {
    assert_eq!(LogRotation::parse("hourly"), LogRotation::Hourly);
    assert_eq!(LogRotation::parse("Daily"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
}

// ─────────────────────────────────────────────────────────────────────────────
// File reading
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_file_is_empty_config() {
    let path = std::env::temp_dir().join("pie-chart-missing-config-for-tests.toml");
    let _ = std::fs::remove_file(&path);

    let file = Config::read_file_config(&path).unwrap();
    assert!(file.api_base.is_none());
}

#[test]
fn test_broken_file_is_an_error() {
    let path = std::env::temp_dir().join(format!("pie-chart-broken-{}.toml", std::process::id()));
    std::fs::write(&path, "api_base = [unterminated").unwrap();

    let err = Config::read_file_config(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));

    let _ = std::fs::remove_file(&path);
}
