//! Configuration handling for the scanning engine.
//!
//! Supports loading configuration from YAML files and merging multiple
//! configuration sources, following common Rust configuration patterns
//! (similar to how .NET Core handles appsettings.json with environment
//! overrides).
//!
//! # Configuration Sources
//!
//! Sources are merged in order, later entries winning:
//!
//! 1. Global config: `$HOME/.config/sigscout/config.yaml`
//! 2. Local config: `.sigscout.yaml` in the working directory
//! 3. A custom file passed explicitly (`--config` on the CLI)
//! 4. CLI argument overrides via [`ScanConfig::merge_with_cli`]
//!
//! Missing files are skipped silently; with no sources at all the
//! defaults apply.
//!
//! # Configuration Format
//!
//! ```yaml
//! # Logical chunk size in bytes for chunked file scans (default: 16 MiB)
//! chunk_size: 16777216
//!
//! # Number of scan worker threads (default: CPU count)
//! thread_count: 4
//!
//! # Log level: trace, debug, info, warn, error (default: warn)
//! log_level: "warn"
//! ```

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::{Path, PathBuf};

/// Default logical chunk size for file scans: 16 MiB.
const DEFAULT_CHUNK_SIZE: u64 = 16 * 1024 * 1024;

/// Engine configuration.
///
/// Both sizing fields use `NonZero` types, so a zero chunk size or a zero
/// thread count is unrepresentable and rejected at deserialization time
/// instead of surfacing as a divide-by-zero or an idle engine later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Logical chunk size in bytes for chunked file scanning.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: NonZeroU64,

    /// Number of scan worker threads; capped by the signature count at
    /// engine construction.
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_chunk_size() -> NonZeroU64 {
    NonZeroU64::new(DEFAULT_CHUNK_SIZE).unwrap()
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Global config file
        if let Some(home_dir) = dirs::home_dir() {
            let global_config = home_dir.join(".config").join("sigscout").join("config.yaml");
            if global_config.exists() {
                builder = builder.add_source(File::from(global_config));
            }
        }

        // Local config file
        let local_config = PathBuf::from(".sigscout.yaml");
        if local_config.exists() {
            builder = builder.add_source(File::from(local_config));
        }

        // Custom config file
        if let Some(path) = config_path {
            if path.exists() {
                builder = builder.add_source(File::from(path.to_path_buf()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments into this configuration.
    ///
    /// CLI values win over file values wherever they differ from the
    /// defaults.
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        if cli_config.chunk_size != default_chunk_size() {
            self.chunk_size = cli_config.chunk_size;
        }
        if cli_config.thread_count != default_thread_count() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
