use super::*;
use std::collections::HashMap;

#[test]
fn test_default_config() {
    let config = FarewellConfig::default();
    assert!(config.remote.enabled);
    assert_eq!(config.remote.base_url, "https://api.jsonbin.io/v3");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.delay(), Duration::from_millis(1000));
    assert!(config.retry.jitter().is_none());
    assert_eq!(config.images.trusted_host, "res.cloudinary.com");
    assert!(!config.logging.file);
    config.validate().unwrap();
}

#[test]
fn test_default_remote_is_not_usable() {
    assert!(!FarewellConfig::default().remote.is_usable());
}

#[test]
fn test_parse_toml() {
    let toml_str = r#"
[remote]
bin_id = "65d4a8c5dc74654018a9e3c2"
api_key = "$2a$10$abcdefghijkl"

[retry]
max_attempts = 5
delay_ms = 250
jitter_ms = 50

[cache]
dir = "/tmp/farewell-cache"
"#;
    let config: FarewellConfig = toml::from_str(toml_str).unwrap();
    assert!(config.remote.is_usable());
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.jitter(), Some(Duration::from_millis(50)));
    assert_eq!(
        config.cache.resolved_dir(),
        PathBuf::from("/tmp/farewell-cache")
    );
    // untouched sections keep defaults
    assert_eq!(config.page.recipient, "Poorva Bhide");
}

#[test]
fn test_disabled_remote_is_not_usable() {
    let config: FarewellConfig = toml::from_str(
        r#"
[remote]
enabled = false
bin_id = "abc"
api_key = "key"
"#,
    )
    .unwrap();
    assert!(!config.remote.is_usable());
}

#[test]
fn test_overrides_win_over_file() {
    let mut config = FarewellConfig::default();
    config.remote.api_key = "from-file".into();
    let env: HashMap<&str, &str> = [(ENV_API_KEY, "from-env"), (ENV_BIN_ID, "bin-env")].into();
    config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
    assert_eq!(config.remote.api_key, "from-env");
    assert_eq!(config.remote.bin_id, "bin-env");
}

#[test]
fn test_blank_overrides_are_ignored() {
    let mut config = FarewellConfig::default();
    config.remote.api_key = "from-file".into();
    config.apply_overrides(|_| Some("   ".to_string()));
    assert_eq!(config.remote.api_key, "from-file");
}

#[test]
fn test_validate_rejects_zero_attempts() {
    let mut config = FarewellConfig::default();
    config.retry.max_attempts = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("max_attempts"));
}

#[test]
fn test_validate_rejects_bad_base_url() {
    let mut config = FarewellConfig::default();
    config.remote.base_url = "not a url".into();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_homecoming() {
    let mut config = FarewellConfig::default();
    config.page.homecoming = "soon".into();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_trusted_host() {
    let mut config = FarewellConfig::default();
    config.images.trusted_host = " ".into();
    assert!(config.validate().is_err());
}

#[test]
fn test_api_key_redacted_in_debug_and_display() {
    let mut config = FarewellConfig::default();
    config.remote.api_key = "$2a$10$supersecretvalue".into();
    let debug = format!("{:?}", config.remote);
    let display = config.remote.to_string();
    assert!(!debug.contains("supersecret"));
    assert!(!display.contains("supersecret"));
    assert!(!display.contains("$2a$10$"));
    assert!(display.contains("****alue"));
}

#[test]
fn test_redacted_for_display_keeps_other_fields() {
    let mut config = FarewellConfig::default();
    config.remote.api_key = "abcdefghijklmnop".into();
    config.remote.bin_id = "bin".into();
    let redacted = config.redacted_for_display();
    assert_eq!(redacted.remote.api_key, "****mnop");
    assert_eq!(redacted.remote.bin_id, "bin");
}

#[test]
fn test_mask_short_key_hides_everything() {
    assert_eq!(mask_api_key(""), "");
    assert_eq!(mask_api_key("   "), "");
    assert_eq!(mask_api_key("abc"), "****");
    assert_eq!(mask_api_key("abcdefghijk"), "****");
}

#[test]
fn test_mask_shows_only_tail_of_master_key() {
    let masked = mask_api_key("$2a$10$Vx9TqkS3pLr8aBcDeF");
    assert_eq!(masked, "****cDeF");
}

#[test]
fn test_default_template_parses_and_validates() {
    let config: FarewellConfig = toml::from_str(&FarewellConfig::default_template()).unwrap();
    config.validate().unwrap();
    assert_eq!(config.retry.max_attempts, 3);
}

#[test]
fn test_load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[retry]\nmax_attempts = 2\n").unwrap();
    let config = FarewellConfig::load(Some(&path)).unwrap();
    assert_eq!(config.retry.max_attempts, 2);
}

#[test]
fn test_load_explicit_missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let err = FarewellConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[retry]\nmax_attempts = 0\n").unwrap();
    assert!(FarewellConfig::load(Some(&path)).is_err());
}

#[test]
fn test_save_default_template_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    FarewellConfig::save_default_template(&path, false).unwrap();
    assert!(path.exists());
    assert!(FarewellConfig::save_default_template(&path, false).is_err());
    FarewellConfig::save_default_template(&path, true).unwrap();
}
