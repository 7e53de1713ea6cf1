//! Tests for config functionality.

use crate::config::{DEFAULT_MODE, PidFileConfig, SignalPolicy};
use crate::error::PidFileError;
use std::path::PathBuf;

extern "C" fn noop_handler(_sig: libc::c_int) {}

#[test]
fn test_default_config() {
    let config = PidFileConfig::default();

    assert!(config.name.is_none());
    assert!(config.directory.is_none());
    assert!(config.enforce_suffix);
    assert!(!config.force_temp_dir);
    assert!(matches!(config.term_signal, SignalPolicy::Auto));
    assert!(config.register_exit_hook);
    assert!(config.lock);
    assert!(!config.allow_same_pid);
    assert_eq!(config.mode, Some(DEFAULT_MODE));
    assert!(config.uid.is_none());
    assert!(config.gid.is_none());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = PidFileConfig::from_yaml("").unwrap();

    // Should use all defaults
    assert!(config.lock);
    assert_eq!(config.mode, Some(0o644));
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
name: worker
lock: false
"#;
    let config = PidFileConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.name.as_deref(), Some("worker"));
    assert!(!config.lock);

    // Unspecified values should use defaults
    assert!(config.enforce_suffix);
    assert!(config.register_exit_hook);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
name: daemon.pid
directory: /var/lib/daemon
enforce_suffix: false
force_temp_dir: true
term_signal: enabled
register_exit_hook: false
lock: false
allow_same_pid: true
mode: 0o600
uid: 1000
gid: 100
"#;
    let config = PidFileConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.name.as_deref(), Some("daemon.pid"));
    assert_eq!(config.directory, Some(PathBuf::from("/var/lib/daemon")));
    assert!(!config.enforce_suffix);
    assert!(config.force_temp_dir);
    assert!(matches!(config.term_signal, SignalPolicy::Enabled));
    assert!(!config.register_exit_hook);
    assert!(!config.lock);
    assert!(config.allow_same_pid);
    assert_eq!(config.mode, Some(0o600));
    assert_eq!(config.uid, Some(1000));
    assert_eq!(config.gid, Some(100));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
name: worker
some_future_option: 12
"#;
    let config = PidFileConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.name.as_deref(), Some("worker"));
}

#[test]
fn test_invalid_signal_policy_is_rejected() {
    let err = PidFileConfig::from_yaml("term_signal: sometimes\n").unwrap_err();
    assert!(matches!(err, PidFileError::Configuration(_)));
}

#[test]
fn test_validate_rejects_empty_name() {
    let config = PidFileConfig::named("  ");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn test_validate_rejects_name_with_separator() {
    let config = PidFileConfig::named("nested/app");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("path separator"));
}

#[test]
fn test_validate_rejects_oversized_mode() {
    let config = PidFileConfig::default().with_mode(Some(0o17777));
    assert!(matches!(
        config.validate(),
        Err(PidFileError::Configuration(_))
    ));
}

#[test]
fn test_builder_methods() {
    let config = PidFileConfig::named("alpha")
        .with_directory("/tmp/alpha")
        .with_lock(false)
        .with_allow_same_pid(true)
        .with_exit_hook(false)
        .with_term_signal(SignalPolicy::Custom(noop_handler))
        .with_owner(Some(0), None);

    assert_eq!(config.name.as_deref(), Some("alpha"));
    assert_eq!(config.directory, Some(PathBuf::from("/tmp/alpha")));
    assert!(!config.lock);
    assert!(config.allow_same_pid);
    assert!(!config.register_exit_hook);
    assert_eq!(config.term_signal.as_str(), "custom");
    assert_eq!(config.uid, Some(0));
    assert!(config.gid.is_none());
}

#[test]
fn test_yaml_roundtrip_skips_custom_handler() {
    let config = PidFileConfig::named("beta").with_mode(None);
    let yaml = config.to_yaml().unwrap();
    assert!(yaml.contains("name: beta"));

    let parsed = PidFileConfig::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.name.as_deref(), Some("beta"));
    assert_eq!(parsed.mode, None);
}

#[test]
fn test_zero_mode_means_untouched() {
    assert_eq!(PidFileConfig::default().with_mode(Some(0)).effective_mode(), None);
    assert_eq!(PidFileConfig::default().with_mode(None).effective_mode(), None);
    assert_eq!(
        PidFileConfig::default().with_mode(Some(0o600)).effective_mode(),
        Some(0o600)
    );
}

#[test]
fn test_signal_policy_from_str() {
    assert!(matches!(SignalPolicy::from_str("auto"), Some(SignalPolicy::Auto)));
    assert!(matches!(SignalPolicy::from_str("off"), Some(SignalPolicy::Disabled)));
    assert!(matches!(SignalPolicy::from_str("enabled"), Some(SignalPolicy::Enabled)));
    assert!(SignalPolicy::from_str("custom").is_none());
}

#[test]
fn test_load_missing_file_is_configuration_error() {
    let err = PidFileConfig::load("/nonexistent/pidguard.yaml").unwrap_err();
    assert!(matches!(err, PidFileError::Configuration(_)));
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("pidguard.yaml");
    std::fs::write(&path, "name: gamma\nforce_temp_dir: true\n").unwrap();

    let config = PidFileConfig::load(&path).unwrap();
    assert_eq!(config.name.as_deref(), Some("gamma"));
    assert!(config.force_temp_dir);
}
