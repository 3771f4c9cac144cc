//! Serializable region configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::region::Region;

/// A region described by its three identifiers.
///
/// Missing fields default to `gregorian`, `UTC` and `en_US`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    #[serde(default = "default_calendar")]
    pub calendar: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_calendar() -> String {
    "gregorian".to_string()
}
fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_locale() -> String {
    "en_US".to_string()
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            calendar: default_calendar(),
            timezone: default_timezone(),
            locale: default_locale(),
        }
    }
}

impl RegionConfig {
    /// Resolve the identifiers into a [`Region`].
    pub fn to_region(&self) -> Result<Region> {
        Region::new(&self.calendar, &self.timezone, &self.locale)
    }
}

impl TryFrom<RegionConfig> for Region {
    type Error = EngineError;

    fn try_from(config: RegionConfig) -> Result<Self> {
        config.to_region()
    }
}

impl From<Region> for RegionConfig {
    fn from(region: Region) -> Self {
        Self {
            calendar: region.calendar_id().identifier().to_string(),
            timezone: region.time_zone().name().to_string(),
            locale: region.locale().identifier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: RegionConfig = serde_json::from_str(r#"{"timezone": "Europe/Berlin"}"#).unwrap();
        assert_eq!(config.calendar, "gregorian");
        assert_eq!(config.locale, "en_US");
        let region = config.to_region().unwrap();
        assert_eq!(region.time_zone(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = serde_json::from_str::<RegionConfig>(r#"{"tz": "UTC"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_identifier_surfaces_on_conversion() {
        let config = RegionConfig {
            timezone: "Nowhere/Special".to_string(),
            ..RegionConfig::default()
        };
        let err = Region::try_from(config).unwrap_err();
        assert!(err.to_string().contains("Nowhere/Special"), "got: {err}");
    }

    #[test]
    fn test_region_into_config() {
        let config = RegionConfig::from(Region::utc());
        assert_eq!(config, RegionConfig::default());
    }
}
