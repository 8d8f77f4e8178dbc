//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{EwmError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_app_config(&settings.app)?;
    validate_database_config(&settings.database)?;
    validate_stats_config(&settings.stats)?;
    validate_event_rules(&settings.events)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_app_config(config: &super::AppConfig) -> Result<()> {
    if config.name.is_empty() {
        return Err(EwmError::Config(
            "Application name is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EwmError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(EwmError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EwmError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(EwmError::Config(
            "Database acquire timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate stats service configuration
fn validate_stats_config(config: &super::StatsConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EwmError::Config(
            "Stats service URL is required".to_string()
        ));
    }

    url::Url::parse(&config.url)?;

    if config.timeout_seconds == 0 {
        return Err(EwmError::Config(
            "Stats timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

fn validate_event_rules(config: &super::EventRulesConfig) -> Result<()> {
    if config.user_min_lead_hours < 0 || config.admin_min_lead_hours < 0 {
        return Err(EwmError::Config(
            "Event lead times cannot be negative".to_string()
        ));
    }

    if config.default_page_size <= 0 {
        return Err(EwmError::Config(
            "Default page size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EwmError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EwmError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if config.directory.is_empty() {
        return Err(EwmError::Config(
            "Log directory is required".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_min_connections_above_max_is_rejected() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        assert_matches!(validate_settings(&settings), Err(EwmError::Config(_)));
    }

    #[test]
    fn test_malformed_stats_url_is_rejected() {
        let mut settings = Settings::default();
        settings.stats.url = "not a url".to_string();
        assert_matches!(validate_settings(&settings), Err(EwmError::UrlParse(_)));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(EwmError::Config(_)));
    }

    #[test]
    fn test_negative_lead_time_is_rejected() {
        let mut settings = Settings::default();
        settings.events.admin_min_lead_hours = -1;
        assert_matches!(validate_settings(&settings), Err(EwmError::Config(_)));
    }
}
