//! Region resolution
//!
//! Picks the single region a command targets: an explicit `--region` flag
//! wins, then the configured default, otherwise the command fails.

use std::fmt;

use crate::config::{ConfigSource, keys};
use crate::error::{BindingError, Result};

/// A validated, non-empty region name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion(String);

impl ResolvedRegion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedRegion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve the target region
///
/// Errors reading the configuration are returned as-is; a missing region
/// is `BindingError::RegionUnresolved`.
pub fn resolve_region(explicit: Option<&str>, config: &impl ConfigSource) -> Result<ResolvedRegion> {
    if let Some(region) = explicit.map(str::trim).filter(|r| !r.is_empty()) {
        tracing::debug!(region, "using region from flag");
        return Ok(ResolvedRegion(region.to_string()));
    }

    match config.get_string(keys::REGION)? {
        Some(region) if !region.trim().is_empty() => {
            let region = region.trim().to_string();
            tracing::debug!(region = %region, "using configured default region");
            Ok(ResolvedRegion(region))
        }
        _ => Err(BindingError::RegionUnresolved.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MockConfigSource};
    use crate::error::Error;

    #[test]
    fn test_explicit_flag_wins_without_reading_config() {
        let mut config = MockConfigSource::new();
        config.expect_get_string().never();

        let region = resolve_region(Some("us"), &config).unwrap();
        assert_eq!(region.as_str(), "us");
    }

    #[test]
    fn test_explicit_flag_wins_over_default() {
        let mut config = Config::default();
        config.set(keys::REGION, "eu-de").unwrap();

        let region = resolve_region(Some("us"), &config).unwrap();
        assert_eq!(region.to_string(), "us");
    }

    #[test]
    fn test_falls_back_to_configured_default() {
        let mut config = MockConfigSource::new();
        config
            .expect_get_string()
            .withf(|key| key.to_string() == "region")
            .times(1)
            .returning(|_| Ok(Some("eu-gb".to_string())));

        let region = resolve_region(None, &config).unwrap();
        assert_eq!(region.as_str(), "eu-gb");
    }

    #[test]
    fn test_blank_flag_falls_back() {
        let mut config = Config::default();
        config.set(keys::REGION, "jp-tok").unwrap();

        let region = resolve_region(Some("  "), &config).unwrap();
        assert_eq!(region.as_str(), "jp-tok");
    }

    #[test]
    fn test_unresolved_without_flag_or_default() {
        let err = resolve_region(None, &Config::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(BindingError::RegionUnresolved)
        ));
        assert!(err.is_usage());
    }

    #[test]
    fn test_config_error_propagates() {
        let mut config = MockConfigSource::new();
        config
            .expect_get_string()
            .returning(|_| Err(Error::Config("broken".into())));

        let err = resolve_region(None, &config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
