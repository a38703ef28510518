//! Application settings loaded from `config.toml`.
//!
//! Every section is optional. A missing file yields [`Settings::default`], so the
//! service starts with the standard peso denominations and no seeded employees.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Customer display channel settings
    pub display: DisplaySettings,
    /// Denominations accepted in a closing tally
    pub denominations: Vec<DenominationConfig>,
    /// Employees created on start if missing
    pub employees: Vec<EmployeeConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            display: DisplaySettings::default(),
            denominations: default_denominations(),
            employees: Vec::new(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Customer display channel settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Seconds a published event stays visible without an ack
    pub event_ttl_secs: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { event_ttl_secs: 300 }
    }
}

/// Physical form of a denomination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenominationKind {
    /// Paper note
    Bill,
    /// Coin
    Coin,
}

/// A single supported denomination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenominationConfig {
    /// Label used as the key of a breakdown, e.g. `"0.25"`
    pub label: String,
    /// Face value
    pub value: f64,
    /// Bill or coin
    pub kind: DenominationKind,
}

/// An employee to seed
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeConfig {
    /// Display name
    pub name: String,
    /// Role, defaults to `"cashier"`
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "cashier".to_string()
}

fn denomination(label: &str, value: f64, kind: DenominationKind) -> DenominationConfig {
    DenominationConfig {
        label: label.to_string(),
        value,
        kind,
    }
}

/// Bills 1000/500/200/100/50/20 and coins 10/5/1/0.25/0.10/0.05.
#[must_use]
pub fn default_denominations() -> Vec<DenominationConfig> {
    use DenominationKind::{Bill, Coin};
    vec![
        denomination("1000", 1000.0, Bill),
        denomination("500", 500.0, Bill),
        denomination("200", 200.0, Bill),
        denomination("100", 100.0, Bill),
        denomination("50", 50.0, Bill),
        denomination("20", 20.0, Bill),
        denomination("10", 10.0, Coin),
        denomination("5", 5.0, Coin),
        denomination("1", 1.0, Coin),
        denomination("0.25", 0.25, Coin),
        denomination("0.10", 0.10, Coin),
        denomination("0.05", 0.05, Coin),
    ]
}

impl Settings {
    fn validate(self) -> Result<Self> {
        if self.denominations.is_empty() {
            return Err(Error::Config {
                message: "At least one denomination must be configured".to_string(),
            });
        }
        if let Some(bad) = self
            .denominations
            .iter()
            .find(|d| !d.value.is_finite() || d.value <= 0.0)
        {
            return Err(Error::Config {
                message: format!("Denomination '{}' must have a positive value", bad.label),
            });
        }
        // Stored breakdowns are keyed by label, so the label must spell the value.
        if let Some(bad) = self.denominations.iter().find(|d| {
            d.label
                .trim()
                .parse::<f64>()
                .map_or(true, |v| (v - d.value).abs() > 1e-9)
        }) {
            return Err(Error::Config {
                message: format!(
                    "Denomination label '{}' must be the numeric face value {}",
                    bad.label, bad.value
                ),
            });
        }
        Ok(self)
    }
}

/// Parses settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid or a
/// denomination has a non-positive value.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `CASH_DRAWER_CONFIG` (default `./config.toml`), falling back
/// to defaults when the file does not exist.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("CASH_DRAWER_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_settings(&path)
    } else {
        info!(path = %path, "No config file found, using default settings");
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            [server]
            bind_address = "0.0.0.0:8080"

            [display]
            event_ttl_secs = 60

            [[denominations]]
            label = "100"
            value = 100.0
            kind = "bill"

            [[denominations]]
            label = "0.25"
            value = 0.25
            kind = "coin"

            [[employees]]
            name = "Maria"

            [[employees]]
            name = "Jose"
            role = "manager"
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.server.bind_address, "0.0.0.0:8080");
        assert_eq!(settings.display.event_ttl_secs, 60);
        assert_eq!(settings.denominations.len(), 2);
        assert_eq!(settings.denominations[1].value, 0.25);
        assert_eq!(settings.denominations[1].kind, DenominationKind::Coin);
        assert_eq!(settings.employees[0].role, "cashier");
        assert_eq!(settings.employees[1].role, "manager");
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.server.bind_address, "127.0.0.1:3000");
        assert_eq!(settings.display.event_ttl_secs, 300);
        assert_eq!(settings.denominations.len(), 12);
        assert!(settings.employees.is_empty());
    }

    #[test]
    fn test_non_positive_denomination_rejected() {
        let toml_str = r#"
            [[denominations]]
            label = "zero"
            value = 0.0
            kind = "coin"
        "#;
        assert!(matches!(
            parse_settings(toml_str),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_label_must_match_value() {
        let toml_str = r#"
            [[denominations]]
            label = "quarter"
            value = 0.25
            kind = "coin"
        "#;
        assert!(matches!(
            parse_settings(toml_str),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_settings("/nonexistent/cash-drawer/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
