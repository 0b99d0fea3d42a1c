use crate::utils::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional on-disk settings. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub probe: ProbeSection,
    #[serde(default)]
    pub registry: RegistrySection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    pub endpoint: Option<String>,
    pub concurrent_requests: Option<usize>,
    pub limit: Option<usize>,
    pub size_threshold: Option<u64>,
    pub show_progress: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    pub data_dir: Option<String>,
    pub archive_url: Option<String>,
    pub include_inactive: Option<bool>,
}

impl SettingsFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ProbeError::ConfigError {
            message: format!("Failed to read settings file {}: {}", path.display(), e),
        })?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(content)?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_settings_file() {
        let toml_content = r#"
[probe]
endpoint = "http://localhost:8080/efr/instdetail.asp"
concurrent_requests = 2
limit = 50
size_threshold = 12000
show_progress = false

[registry]
data_dir = "./data"
archive_url = "http://localhost:8080/Institutions2.zip"
include_inactive = true
"#;

        let file = SettingsFile::from_str(toml_content).unwrap();

        assert_eq!(file.probe.limit, Some(50));
        assert_eq!(file.probe.show_progress, Some(false));
        assert_eq!(file.registry.include_inactive, Some(true));
        assert_eq!(file.registry.data_dir.as_deref(), Some("./data"));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        assert_eq!(SettingsFile::from_str("").unwrap(), SettingsFile::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = SettingsFile::from_str("[probe]\nretries = 3\n");
        assert!(matches!(result, Err(ProbeError::SettingsFileError(_))));
    }
}
