//! Engine configuration structures.

use serde::{Deserialize, Serialize};

/// Scheduler engine configuration.
///
/// One tick represents one simulated minute; `tick_interval_secs` only
/// controls how often the runtime driver fires it in wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of interchangeable units in the pool (K).
    pub unit_count: u32,
    /// Minimum waiting minutes before a waiter becomes time-slice eligible.
    pub time_slice_ticks: u64,
    /// Degrees per tick an unserved room drifts back toward baseline.
    pub recovery_rate: f64,
    /// Billing rate applied per unit of energy.
    pub energy_rate: f64,
    /// Wall-clock seconds between ticks when driven by the runtime.
    pub tick_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unit_count: 3,
            time_slice_ticks: 2,
            recovery_rate: 0.5,
            energy_rate: 1.0,
            tick_interval_secs: 10,
        }
    }
}

impl EngineConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A human-readable description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.unit_count == 0 {
            return Err("unit_count must be greater than 0".into());
        }
        if self.time_slice_ticks == 0 {
            return Err("time_slice_ticks must be greater than 0".into());
        }
        if self.recovery_rate <= 0.0 {
            return Err("recovery_rate must be greater than 0".into());
        }
        if self.energy_rate < 0.0 {
            return Err("energy_rate must not be negative".into());
        }
        if self.tick_interval_secs == 0 {
            return Err("tick_interval_secs must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse engine configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse or validation failure as a human-readable string.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment, honoring a `.env` file.
    ///
    /// Recognized variables (all optional, defaults otherwise):
    /// `HVAC_UNIT_COUNT`, `HVAC_TIME_SLICE_TICKS`, `HVAC_RECOVERY_RATE`,
    /// `HVAC_ENERGY_RATE`, `HVAC_TICK_INTERVAL_SECS`.
    ///
    /// # Errors
    ///
    /// Unparseable variable values or validation failure.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("HVAC_UNIT_COUNT") {
            cfg.unit_count = v.parse().map_err(|e| format!("HVAC_UNIT_COUNT: {e}"))?;
        }
        if let Ok(v) = std::env::var("HVAC_TIME_SLICE_TICKS") {
            cfg.time_slice_ticks = v
                .parse()
                .map_err(|e| format!("HVAC_TIME_SLICE_TICKS: {e}"))?;
        }
        if let Ok(v) = std::env::var("HVAC_RECOVERY_RATE") {
            cfg.recovery_rate = v.parse().map_err(|e| format!("HVAC_RECOVERY_RATE: {e}"))?;
        }
        if let Ok(v) = std::env::var("HVAC_ENERGY_RATE") {
            cfg.energy_rate = v.parse().map_err(|e| format!("HVAC_ENERGY_RATE: {e}"))?;
        }
        if let Ok(v) = std::env::var("HVAC_TICK_INTERVAL_SECS") {
            cfg.tick_interval_secs = v
                .parse()
                .map_err(|e| format!("HVAC_TICK_INTERVAL_SECS: {e}"))?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_unit_count_rejected() {
        let cfg = EngineConfig {
            unit_count: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_time_slice_rejected() {
        let cfg = EngineConfig {
            time_slice_ticks: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_round_trip_with_partial_fields() {
        let cfg = EngineConfig::from_json_str(r#"{"unit_count": 5}"#).unwrap();
        assert_eq!(cfg.unit_count, 5);
        assert_eq!(cfg.time_slice_ticks, 2);
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(EngineConfig::from_json_str(r#"{"unit_count": 0}"#).is_err());
        assert!(EngineConfig::from_json_str("not json").is_err());
    }

    // Single test so the HVAC_UNIT_COUNT mutations never race each other
    // under the parallel test runner.
    #[test]
    fn env_overrides_one_field_and_rejects_bad_values() {
        std::env::set_var("HVAC_UNIT_COUNT", "5");
        let cfg = EngineConfig::from_env().unwrap();
        assert_eq!(cfg.unit_count, 5);
        assert_eq!(cfg.time_slice_ticks, 2);

        std::env::set_var("HVAC_UNIT_COUNT", "lots");
        assert!(EngineConfig::from_env().is_err());

        std::env::set_var("HVAC_UNIT_COUNT", "0");
        assert!(EngineConfig::from_env().is_err());

        std::env::remove_var("HVAC_UNIT_COUNT");
    }
}
