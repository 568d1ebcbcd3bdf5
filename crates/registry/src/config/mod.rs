//! Database configuration.
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid configuration.
//!
//! ```toml
//! name = "playground study"
//! ticks_per_second = 1000
//! ```


use serde::{Deserialize, Serialize};

/// Default database tick rate.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;

/// Configuration parse and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid database config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("ticks_per_second must be positive")]
	ZeroTicksPerSecond,
}

/// Settings of one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
	/// Label used in log fields.
	pub name: String,
	/// Tick rate of time stamps created by the database.
	pub ticks_per_second: u32,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			name: "untitled".to_owned(),
			ticks_per_second: DEFAULT_TICKS_PER_SECOND,
		}
	}
}

impl DatabaseConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.ticks_per_second == 0 {
			return Err(ConfigError::ZeroTicksPerSecond);
		}
		Ok(())
	}
}
