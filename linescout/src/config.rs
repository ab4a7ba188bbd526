use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration for a scan.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.linescout.yaml` in the current directory
/// 3. Global `$HOME/.config/linescout/config.yaml`
///
/// # Configuration Format
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Substring to search for (literal, case-sensitive)
/// needle: "TODO"
///
/// # Root directory to scan
/// root_path: "."
///
/// # Worker thread count (default: logical CPU count)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// When using the CLI, command-line arguments take precedence over config
/// file values; the merging behavior is defined in `merge_with_cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// The substring to search for (literal, case-sensitive)
    #[serde(default)]
    pub needle: String,

    /// Root directory to start the scan from
    pub root_path: PathBuf,

    /// Number of worker threads to use
    /// Defaults to the number of logical CPUs if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ScanConfig {
    /// Creates a configuration with default thread count and log level.
    pub fn new(root_path: impl Into<PathBuf>, needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            root_path: root_path.into(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("linescout/config.yaml")),
            // Local config
            Some(PathBuf::from(".linescout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.needle.is_empty() {
            self.needle = cli_config.needle;
        }
        if cli_config.root_path != PathBuf::from(".") {
            self.root_path = cli_config.root_path;
        }
        // A CLI thread count left at its default does not override the file
        if cli_config.thread_count != default_thread_count() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
