use crate::config::toml_config::SettingsFile;
use crate::config::Settings;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "fdic-probe")]
#[command(about = "Probe FDIC.gov for BO filers.")]
pub struct CliArgs {
    #[arg(
        long,
        help = "Limit the number of total requests to FDIC.gov (default: None)"
    )]
    pub limit: Option<usize>,

    #[arg(
        short = 'a',
        long = "all",
        help = "Include inactive FDIC institutions in probe"
    )]
    pub all: bool,

    #[arg(long, help = "Directory holding the registry archive, cache and results")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Institution detail lookup URL")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Registry archive URL")]
    pub archive_url: Option<String>,

    #[arg(long, help = "Minimum content length (exclusive) for a page to count as a filer")]
    pub threshold: Option<u64>,

    #[arg(long, help = "Number of probe requests kept in flight")]
    pub concurrency: Option<usize>,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<String>,

    #[arg(long, help = "Disable the progress line")]
    pub no_progress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// Defaults, then the settings file, then command line flags.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        if let Some(path) = &self.config {
            tracing::debug!("Loading settings from {}", path);
            settings = settings.with_file(&SettingsFile::from_file(path)?);
        }
        Ok(self.apply(settings))
    }

    fn apply(&self, mut settings: Settings) -> Settings {
        if self.limit.is_some() {
            settings.limit = self.limit;
        }
        if self.all {
            settings.include_inactive = true;
        }
        if let Some(data_dir) = &self.data_dir {
            settings.data_dir = data_dir.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            settings.probe_endpoint = endpoint.clone();
        }
        if let Some(archive_url) = &self.archive_url {
            settings.archive_url = archive_url.clone();
        }
        if let Some(threshold) = self.threshold {
            settings.size_threshold = threshold;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrent_requests = concurrency;
        }
        if self.no_progress {
            settings.show_progress = false;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from(["fdic-probe", "--limit", "25", "-a"]);
        assert_eq!(args.limit, Some(25));
        assert!(args.all);

        let settings = args.resolve().unwrap();
        assert_eq!(settings.limit, Some(25));
        assert!(settings.include_inactive);
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = CliArgs::parse_from(["fdic-probe"]);
        let settings = args.resolve().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_flags_win_over_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[probe]\nsize_threshold = 500\nlimit = 7").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args = CliArgs::parse_from(["fdic-probe", "--config", &path, "--threshold", "900"]);
        let settings = args.resolve().unwrap();

        assert_eq!(settings.size_threshold, 900);
        assert_eq!(settings.limit, Some(7));
    }
}
