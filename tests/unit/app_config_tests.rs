/*!
 * Tests for application configuration
 */

use anyhow::Result;
use chapterize::app_config::{Config, LogLevel};
use crate::common;

#[test]
fn test_defaultConfig_shouldCarryExpectedDefaults() {
    let config = Config::default();

    assert_eq!(config.analysis.model, "gemini-2.0-flash");
    assert_eq!(config.transcription.model, "gemini-2.5-pro");
    assert_eq!(config.transcription.poll_max_attempts, 60);
    assert_eq!(config.transcription.poll_interval_secs, 5);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.api_key.is_empty());
    assert!(config.endpoint.is_empty());
}

#[test]
fn test_defaultConfig_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_saveAndLoad_shouldRoundTrip() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.api_key = "test-key".to_string();
    config.analysis.show_name = "テスト番組".to_string();
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.api_key, "test-key");
    assert_eq!(loaded.analysis.show_name, "テスト番組");

    Ok(())
}

/// Partial config files fill missing fields from defaults
#[test]
fn test_load_withPartialJson_shouldApplyDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &dir.path().to_path_buf(),
        "conf.json",
        r#"{ "api_key": "abc", "transcription": { "poll_max_attempts": 10 } }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.api_key, "abc");
    assert_eq!(config.transcription.poll_max_attempts, 10);
    assert_eq!(config.transcription.poll_interval_secs, 5);
    assert_eq!(config.analysis.model, "gemini-2.0-flash");

    Ok(())
}

#[test]
fn test_load_withMalformedJson_shouldError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(&dir.path().to_path_buf(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withBadEndpoint_shouldError() {
    let mut config = Config::default();
    config.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroPollAttempts_shouldError() {
    let mut config = Config::default();
    config.transcription.poll_max_attempts = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptyModel_shouldError() {
    let mut config = Config::default();
    config.analysis.model = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_effectiveApiKey_withoutEnvVar_shouldUseConfigValue() {
    // Note: assumes GEMINI_API_KEY is not set in the test environment
    if std::env::var("GEMINI_API_KEY").is_ok() {
        return;
    }

    let mut config = Config::default();
    config.api_key = "from-config".to_string();
    assert_eq!(config.effective_api_key(), "from-config");
}
