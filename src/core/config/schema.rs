//! core::config::schema
//!
//! Configuration schema types.
//!
//! Both scopes share one file format; a project file overrides the global
//! file section by section, field by field.
//!
//! # Validation
//!
//! Values are validated after parsing: a round cap must be positive and
//! costs must be finite and non-negative.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One configuration file (global or project scope).
///
/// # Example
///
/// ```toml
/// [fixpoint]
/// max_rounds = 64
/// log_rounds = false
///
/// [distance]
/// fail_cost = 1.0
/// subst_cost = 0.5
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Fixpoint iteration settings
    pub fixpoint: Option<FixpointSection>,

    /// Distance operator defaults
    pub distance: Option<DistanceSection>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fixpoint) = &self.fixpoint {
            fixpoint.validate()?;
        }
        if let Some(distance) = &self.distance {
            distance.validate()?;
        }
        Ok(())
    }
}

/// `[fixpoint]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FixpointSection {
    /// Round cap for interior/closure (default: `n² + 2`)
    pub max_rounds: Option<usize>,

    /// Log every round at debug level instead of trace
    pub log_rounds: Option<bool>,
}

impl FixpointSection {
    /// Validate the section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == Some(0) {
            return Err(ConfigError::InvalidValue(
                "fixpoint.max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[distance]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DistanceSection {
    /// Cost of leaving a tie unmatched (default: 1.0)
    pub fail_cost: Option<f64>,

    /// Cost of substituting a tie whose comparator check failed
    pub subst_cost: Option<f64>,
}

impl DistanceSection {
    /// Validate the section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("fail_cost", self.fail_cost), ("subst_cost", self.subst_cost)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ConfigError::InvalidValue(format!(
                        "distance.{} must be a finite non-negative number, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            [fixpoint]
            max_rounds = 10
            log_rounds = true

            [distance]
            fail_cost = 2.0
            "#,
        )
        .unwrap();

        let fixpoint = file.fixpoint.as_ref().unwrap();
        assert_eq!(fixpoint.max_rounds, Some(10));
        assert_eq!(fixpoint.log_rounds, Some(true));
        assert_eq!(file.distance.as_ref().unwrap().fail_cost, Some(2.0));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn empty_file_is_default() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(toml::from_str::<ConfigFile>("[solver]\nthreads = 2").is_err());
        assert!(toml::from_str::<ConfigFile>("[fixpoint]\nrounds = 2").is_err());
    }

    #[test]
    fn zero_rounds_invalid() {
        let file = ConfigFile {
            fixpoint: Some(FixpointSection {
                max_rounds: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(file.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn negative_or_infinite_cost_invalid() {
        for bad in [-1.0, f64::INFINITY, f64::NAN] {
            let section = DistanceSection {
                subst_cost: Some(bad),
                ..Default::default()
            };
            assert!(section.validate().is_err(), "{bad} accepted");
        }
        let zero = DistanceSection {
            fail_cost: Some(0.0),
            subst_cost: None,
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn roundtrip_through_toml() {
        let file = ConfigFile {
            fixpoint: Some(FixpointSection {
                max_rounds: Some(5),
                log_rounds: None,
            }),
            distance: None,
        };
        let text = toml::to_string_pretty(&file).unwrap();
        assert_eq!(toml::from_str::<ConfigFile>(&text).unwrap(), file);
    }
}
