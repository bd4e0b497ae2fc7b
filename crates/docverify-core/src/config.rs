//! Runtime configuration shared by the review client and its hosts.

use crate::error::ConfigError;
use crate::geometry::{DEFAULT_RENDER_SCALE, RenderScale};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_VERIFIER: &str = "Demo User";

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewConfig {
    /// Base URL of the review service, without a trailing slash.
    pub api_url: String,
    /// Attribution recorded on every verification made from this host.
    pub verified_by: String,
    pub render_scale: RenderScale,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            verified_by: DEFAULT_VERIFIER.to_string(),
            render_scale: RenderScale::default(),
        }
    }
}

impl ReviewConfig {
    /// Build a validated config. The api url is trimmed of trailing slashes.
    pub fn new(api_url: &str, verified_by: &str, render_scale: f64) -> Result<Self, ConfigError> {
        let api_url = api_url.trim().trim_end_matches('/');
        if api_url.is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::ApiUrlScheme(api_url.to_string()));
        }
        let verified_by = verified_by.trim();
        if verified_by.is_empty() {
            return Err(ConfigError::EmptyVerifier);
        }
        Ok(Self {
            api_url: api_url.to_string(),
            verified_by: verified_by.to_string(),
            render_scale: RenderScale::new(render_scale)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ReviewConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.verified_by, "Demo User");
        assert_eq!(config.render_scale.get(), DEFAULT_RENDER_SCALE);
    }

    #[test]
    fn trims_trailing_slash() {
        let config = ReviewConfig::new("https://review.example.com/", "ops@example.com", 2.0).unwrap();
        assert_eq!(config.api_url, "https://review.example.com");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ReviewConfig::new("", "x", 1.0),
            Err(ConfigError::EmptyApiUrl)
        ));
        assert!(matches!(
            ReviewConfig::new("localhost:8000", "x", 1.0),
            Err(ConfigError::ApiUrlScheme(_))
        ));
        assert!(matches!(
            ReviewConfig::new("http://localhost", " ", 1.0),
            Err(ConfigError::EmptyVerifier)
        ));
        assert!(matches!(
            ReviewConfig::new("http://localhost", "x", 0.0),
            Err(ConfigError::Scale(_))
        ));
    }
}
