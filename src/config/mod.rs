#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::registry::DEFAULT_ARCHIVE_URL;
use crate::core::report::DEFAULT_SIZE_THRESHOLD;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_optional_minimum, validate_path, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROBE_ENDPOINT: &str = "http://www2.fdic.gov/efr/instdetail.asp";
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 2;
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Fully resolved settings for one probe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub probe_endpoint: String,
    pub archive_url: String,
    pub data_dir: String,
    pub concurrent_requests: usize,
    pub limit: Option<usize>,
    pub include_inactive: bool,
    pub size_threshold: u64,
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            probe_endpoint: DEFAULT_PROBE_ENDPOINT.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            limit: None,
            include_inactive: false,
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            show_progress: true,
        }
    }
}

impl Settings {
    /// Layer a settings file over the defaults.
    pub fn with_file(mut self, file: &toml_config::SettingsFile) -> Self {
        let probe = &file.probe;
        let registry = &file.registry;

        if let Some(endpoint) = &probe.endpoint {
            self.probe_endpoint = endpoint.clone();
        }
        if let Some(concurrency) = probe.concurrent_requests {
            self.concurrent_requests = concurrency;
        }
        if probe.limit.is_some() {
            self.limit = probe.limit;
        }
        if let Some(threshold) = probe.size_threshold {
            self.size_threshold = threshold;
        }
        if let Some(show_progress) = probe.show_progress {
            self.show_progress = show_progress;
        }
        if let Some(data_dir) = &registry.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(archive_url) = &registry.archive_url {
            self.archive_url = archive_url.clone();
        }
        if let Some(include_inactive) = registry.include_inactive {
            self.include_inactive = include_inactive;
        }
        self
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("probe_endpoint", &self.probe_endpoint)?;
        validate_url("archive_url", &self.archive_url)?;
        validate_path("data_dir", &self.data_dir)?;
        validate_range(
            "concurrent_requests",
            self.concurrent_requests,
            1,
            MAX_CONCURRENT_REQUESTS,
        )?;
        validate_optional_minimum("limit", self.limit, 1)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn probe_endpoint(&self) -> &str {
        &self.probe_endpoint
    }

    fn archive_url(&self) -> &str {
        &self.archive_url
    }

    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn include_inactive(&self) -> bool {
        self.include_inactive
    }

    fn size_threshold(&self) -> u64 {
        self.size_threshold
    }

    fn show_progress(&self) -> bool {
        self.show_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::SettingsFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.size_threshold, 10051);
        assert_eq!(settings.limit, None);
        assert!(!settings.include_inactive);
        assert_eq!(settings.concurrent_requests, 2);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_limit = Settings {
            limit: Some(0),
            ..Settings::default()
        };
        assert!(zero_limit.validate().is_err());

        let no_concurrency = Settings {
            concurrent_requests: 0,
            ..Settings::default()
        };
        assert!(no_concurrency.validate().is_err());

        let bad_endpoint = Settings {
            probe_endpoint: "ftp://www2.fdic.gov".to_string(),
            ..Settings::default()
        };
        assert!(bad_endpoint.validate().is_err());
    }

    #[test]
    fn test_file_overrides_only_what_it_sets() {
        let file = SettingsFile::from_str(
            r#"
[probe]
size_threshold = 20000
concurrent_requests = 4

[registry]
data_dir = "/var/lib/fdic"
"#,
        )
        .unwrap();

        let settings = Settings::default().with_file(&file);

        assert_eq!(settings.size_threshold, 20000);
        assert_eq!(settings.concurrent_requests, 4);
        assert_eq!(settings.data_dir, "/var/lib/fdic");
        assert_eq!(settings.probe_endpoint, DEFAULT_PROBE_ENDPOINT);
        assert_eq!(settings.limit, None);
    }
}
