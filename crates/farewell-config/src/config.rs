//! Effective configuration injected into the synchronization layer.
//!
//! Every value has a default, so a missing config file is not an error.
//! Secrets can also come from the environment (`FAREWELL_API_KEY`,
//! `FAREWELL_BIN_ID`), which wins over the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use farewell_core::ShapeRules;
use farewell_core::countdown;
use farewell_core::seed;
use farewell_core::validate::DEFAULT_TRUSTED_IMAGE_HOST;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::paths;

pub const ENV_API_KEY: &str = "FAREWELL_API_KEY";
pub const ENV_BIN_ID: &str = "FAREWELL_BIN_ID";

const DEFAULT_BASE_URL: &str = "https://api.jsonbin.io/v3";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FarewellConfig {
    pub remote: RemoteConfig,
    pub retry: RetryConfig,
    pub images: ImagesConfig,
    pub cache: CacheConfig,
    pub page: PageConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Disable to run purely against the local cache.
    pub enabled: bool,
    /// JSON document store API root.
    pub base_url: String,
    /// Identifier of the shared document holding both collections.
    pub bin_id: String,
    /// Access key sent as `X-Master-Key`.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            bin_id: String::new(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Enabled and has both a document id and an access key.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.bin_id.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn redacted_api_key(&self) -> String {
        mask_api_key(&self.api_key)
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("bin_id", &self.bin_id)
            .field("api_key", &self.redacted_api_key())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Display for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enabled={}, base_url=\"{}\", bin_id=\"{}\", api_key=\"{}\"",
            self.enabled,
            self.base_url,
            self.bin_id,
            self.redacted_api_key()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Fetch attempts before falling back to the cache (at least 1).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay_ms: u64,
    /// Upper bound of random extra delay; 0 disables jitter.
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
            jitter_ms: 0,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn jitter(&self) -> Option<Duration> {
        (self.jitter_ms > 0).then(|| Duration::from_millis(self.jitter_ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Host that serves uploaded photos; other URLs are discarded.
    pub trusted_host: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            trusted_host: DEFAULT_TRUSTED_IMAGE_HOST.to_string(),
        }
    }
}

impl ImagesConfig {
    pub fn shape_rules(&self) -> ShapeRules {
        ShapeRules::new(self.trusted_host.trim())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Override for the cache directory. Defaults to `{state_dir}/cache`.
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(paths::default_cache_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub recipient: String,
    /// RFC 3339, or zone-less local time `YYYY-MM-DDTHH:MM:SS`.
    pub homecoming: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            recipient: seed::RECIPIENT_NAME.to_string(),
            homecoming: seed::HOMECOMING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write sync logs to `{state_dir}/logs/`.
    pub file: bool,
}

impl FarewellConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicitly given path must exist; the default one may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => match Self::config_path() {
                Ok(path) if path.exists() => Self::load_file(&path)?,
                _ => {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply secret overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.remote.api_key = key;
        }
        if let Some(bin_id) = lookup(ENV_BIN_ID).filter(|v| !v.trim().is_empty()) {
            self.remote.bin_id = bin_id;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        if url::Url::parse(&self.remote.base_url).is_err() {
            bail!("remote.base_url is not a valid URL: {}", self.remote.base_url);
        }
        if self.remote.timeout_secs == 0 {
            bail!("remote.timeout_secs must be at least 1");
        }
        if self.images.trusted_host.trim().is_empty() {
            bail!("images.trusted_host must not be empty");
        }
        if countdown::parse_target(&self.page.homecoming).is_none() {
            bail!(
                "page.homecoming is not a valid date-time: {}",
                self.page.homecoming
            );
        }
        Ok(())
    }

    /// Copy safe to print: the access key is masked.
    pub fn redacted_for_display(&self) -> Self {
        let mut redacted = self.clone();
        redacted.remote.api_key = self.remote.redacted_api_key();
        redacted
    }

    /// Path to the config file: `~/.config/farewell/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        let dir = paths::config_dir().context("Failed to determine config directory")?;
        Ok(dir.join("config.toml"))
    }

    /// Generate default config TOML with comments as a template.
    pub fn default_template() -> String {
        r#"# Farewell wall configuration
# Location: ~/.config/farewell/config.toml

[remote]
enabled = true
base_url = "https://api.jsonbin.io/v3"
# Shared document id (or set FAREWELL_BIN_ID). Create one with `farewell bin create`.
bin_id = ""
# Access key (or set FAREWELL_API_KEY).
api_key = ""
timeout_secs = 10

[retry]
max_attempts = 3  # fetch attempts before falling back to the local cache
delay_ms = 1000
jitter_ms = 0

[images]
trusted_host = "res.cloudinary.com"

[cache]
# dir = "/path/to/cache"

[page]
recipient = "Poorva Bhide"
homecoming = "2026-08-14T00:00:00"

[logging]
file = false
"#
        .to_string()
    }

    /// Write the template, refusing to overwrite unless `force` is set.
    pub fn save_default_template(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, Self::default_template())
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Document-store master keys open with a fixed `$2a$10$` hash header, so only
/// the tail tells two keys apart. Keys too short to spare four characters are
/// hidden entirely.
fn mask_api_key(api_key: &str) -> String {
    const VISIBLE: usize = 4;
    const MIN_LEN_FOR_TAIL: usize = 12;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return String::new();
    }
    let char_count = api_key.chars().count();
    if char_count < MIN_LEN_FOR_TAIL {
        return "****".to_string();
    }
    let tail: String = api_key.chars().skip(char_count - VISIBLE).collect();
    format!("****{tail}")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
