//! # Configuration Module
//!
//! This module handles loading and validating configuration from
//! environment variables. All settings are centralized here.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! println!("Cap: {}", config.ledger.cap_total);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description | Example |
//! |----------|-------------|---------|
//! | `LEDGER_CAP_TOTAL` | Maximum value the ledger may hold | `1000000` |
//! | `LEDGER_CAP_PER_WITHDRAWAL` | Maximum value per withdrawal | `50000` |
//! | `LEDGER_SCRIPT` | Operation script to replay | `~/ledger/batch.json` |
//! | `LEDGER_BLOCKED_PAYEES` | Principals whose payouts fail | `mallory,eve` |

use std::env;

use custodial_ledger::{LedgerConfig, Principal};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Failed to parse a value
    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

/// Backend configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ==========================================
    // LEDGER SETTINGS
    // ==========================================

    /// The two ceilings the hosted ledger is created with.
    ///
    /// Fixed for the lifetime of the process.
    pub ledger: LedgerConfig,

    /// Principals whose payouts are refused by the payout rail.
    ///
    /// Lets an operator rehearse what a refusing recipient does to a batch
    /// (every withdrawal to them reverts with `TransferFailed`).
    pub blocked_payees: Vec<Principal>,

    // ==========================================
    // BATCH SETTINGS
    // ==========================================

    /// Path to the JSON operation script, with `~` and `$VARS` expanded.
    ///
    /// Default: `./ledger-script.json`
    pub script_path: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Use `dotenvy::dotenv()` before calling this to load from `.env` file.
    ///
    /// ## Returns
    ///
    /// - `Ok(AppConfig)` - Configuration loaded successfully
    /// - `Err(ConfigError)` - A required variable is missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let cap_total = parse_amount("LEDGER_CAP_TOTAL", &get_env("LEDGER_CAP_TOTAL")?)?;
        let cap_per_withdrawal = parse_amount(
            "LEDGER_CAP_PER_WITHDRAWAL",
            &get_env("LEDGER_CAP_PER_WITHDRAWAL")?,
        )?;

        let raw_script = get_env_or_default("LEDGER_SCRIPT", "./ledger-script.json");
        let script_path = shellexpand::full(&raw_script)
            .map_err(|e| ConfigError::ParseError("LEDGER_SCRIPT".to_string(), e.to_string()))?
            .into_owned();

        Ok(Self {
            ledger: LedgerConfig::new(cap_total, cap_per_withdrawal),
            blocked_payees: parse_principals(&get_env_or_default("LEDGER_BLOCKED_PAYEES", "")),
            script_path,
        })
    }
}

/// Read a ceiling the ledger cannot start without (`LEDGER_CAP_*`).
///
/// An unset or non-UTF-8 value is reported as `MissingEnvVar`.
fn get_env(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

/// Read an optional batch setting (`LEDGER_SCRIPT`, `LEDGER_BLOCKED_PAYEES`),
/// falling back to `default` when it is unset.
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).ok().unwrap_or_else(|| default.to_owned())
}

fn parse_amount(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .replace('_', "")
        .parse()
        .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}", e)))
}

/// Split a comma-separated list, skipping blanks.
fn parse_principals(raw: &str) -> Vec<Principal> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Principal::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_or_default() {
        // Should return default when not set
        let value = get_env_or_default("NONEXISTENT_VAR_12345", "default_value");
        assert_eq!(value, "default_value");
    }

    #[test]
    fn test_missing_required_var() {
        let err = get_env("NONEXISTENT_LEDGER_VAR_12345").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvVar(ref k) if k == "NONEXISTENT_LEDGER_VAR_12345"
        ));
    }

    #[test]
    fn test_set_vars_override_defaults() {
        env::set_var("LEDGER_TEST_CAP_12345", "250");
        assert_eq!(get_env("LEDGER_TEST_CAP_12345").unwrap(), "250");
        assert_eq!(get_env_or_default("LEDGER_TEST_CAP_12345", "1"), "250");
        env::remove_var("LEDGER_TEST_CAP_12345");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("CAP", "1_000_000").unwrap(), 1_000_000);
        assert_eq!(parse_amount("CAP", " 42 ").unwrap(), 42);
        assert!(matches!(
            parse_amount("CAP", "-5"),
            Err(ConfigError::ParseError(ref k, _)) if k == "CAP"
        ));
    }

    #[test]
    fn test_parse_principals() {
        assert_eq!(
            parse_principals("mallory, eve,,"),
            vec![Principal::from("mallory"), Principal::from("eve")]
        );
        assert!(parse_principals("").is_empty());
    }
}
