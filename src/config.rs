//! Duo configuration
//!
//! Board wiring and reset timing. Pin numbers are carried for whoever builds
//! the [`crate::hal`] implementations; the controller itself only uses the
//! reset pulse width.

use serde::{Deserialize, Serialize};

use crate::{Opl3DuoError, Result};

/// Default selector (unit) pin on the OPL3 Duo board.
pub const DEFAULT_SELECTOR_PIN: u8 = 6;
/// Default reset pin.
pub const DEFAULT_RESET_PIN: u8 = 8;
/// Default reset pulse width in milliseconds.
pub const DEFAULT_RESET_PULSE_MS: u32 = 1;

/// Configuration for an [`crate::Opl3Duo`].
///
/// # Examples
///
/// ```
/// use opl3_duo::DuoConfig;
///
/// let cfg = DuoConfig::from_json(r#"{ "reset_pulse_ms": 5 }"#).unwrap();
/// assert_eq!(cfg.reset_pulse_ms, 5);
/// assert_eq!(cfg.selector_pin, 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuoConfig {
    /// Digital output selecting unit 0 (low) or unit 1 (high)
    pub selector_pin: u8,
    /// Digital output driving the chips' /IC reset input
    pub reset_pin: u8,
    /// Low time of the reset pulse, at least 1 ms
    pub reset_pulse_ms: u32,
}

impl Default for DuoConfig {
    fn default() -> Self {
        Self {
            selector_pin: DEFAULT_SELECTOR_PIN,
            reset_pin: DEFAULT_RESET_PIN,
            reset_pulse_ms: DEFAULT_RESET_PULSE_MS,
        }
    }
}

impl DuoConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DuoConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration for wiring and timing mistakes.
    pub fn validate(&self) -> Result<()> {
        if self.reset_pulse_ms == 0 {
            return Err(Opl3DuoError::Config(
                "reset_pulse_ms must be at least 1".to_string(),
            ));
        }
        if self.selector_pin == self.reset_pin {
            return Err(Opl3DuoError::Config(format!(
                "selector and reset share pin {}",
                self.selector_pin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DuoConfig::default();
        assert_eq!(cfg.selector_pin, DEFAULT_SELECTOR_PIN);
        assert_eq!(cfg.reset_pin, DEFAULT_RESET_PIN);
        assert_eq!(cfg.reset_pulse_ms, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let cfg = DuoConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DuoConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = DuoConfig {
            selector_pin: 2,
            reset_pin: 3,
            reset_pulse_ms: 4,
        };
        let json = cfg.to_json().unwrap();
        assert_eq!(DuoConfig::from_json(&json).unwrap(), cfg);
    }

    #[test]
    fn test_zero_pulse_rejected() {
        let err = DuoConfig::from_json(r#"{ "reset_pulse_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, Opl3DuoError::Config(_)));
    }

    #[test]
    fn test_shared_pin_rejected() {
        let err = DuoConfig::from_json(r#"{ "selector_pin": 8 }"#).unwrap_err();
        assert!(err.to_string().contains("share pin 8"));
    }

    #[test]
    fn test_malformed_json() {
        let err = DuoConfig::from_json("{ reset_pulse_ms: }").unwrap_err();
        assert!(matches!(err, Opl3DuoError::Json(_)));
    }
}
