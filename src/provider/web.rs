use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use log::{info, warn};
use parking_lot::Mutex;

#[cfg(feature = "async")]
use async_trait::async_trait;

#[cfg(feature = "async")]
use super::AsyncRuleProvider;
use super::RuleProvider;
use crate::error::{ProviderErrorKind, PslError, Result};
use crate::parser::parse_rules;
use crate::types::Rule;

/// Official public suffix list location
pub const DEFAULT_RULE_LIST_URL: &str = "https://publicsuffix.org/list/public_suffix_list.dat";

/// Default update interval: 7 days
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default cache file name inside a data directory
pub const DEFAULT_CACHE_FILENAME: &str = "public_suffix_list.dat";

/// Rule list downloaded over HTTP, optionally cached on disk.
///
/// With a cache path, a cached file younger than the update interval is used
/// as is. A failed download falls back to an existing cached file.
#[derive(Debug, Clone)]
pub struct WebRuleProvider {
    /// Download URL
    pub url: String,
    /// Cache file path
    pub cache_path: Option<PathBuf>,
    /// Maximum cache file age before a new download
    pub update_interval: Duration,
    download_lock: Arc<Mutex<()>>,
}

impl WebRuleProvider {
    /// Create a new provider for the official list, without caching
    pub fn new() -> Self {
        Self {
            url: DEFAULT_RULE_LIST_URL.to_string(),
            cache_path: None,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            download_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Set custom download URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set cache file path
    pub fn with_cache_path(mut self, path: impl AsRef<Path>) -> Self {
        self.cache_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Cache in `dir` under the default file name
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_path = Some(dir.as_ref().join(DEFAULT_CACHE_FILENAME));
        self
    }

    /// Set update interval for checking cache freshness
    /// Default is 7 days (DEFAULT_UPDATE_INTERVAL)
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Check if the cache file needs a download
    fn should_download(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(meta) => {
                if meta.len() == 0 {
                    return true;
                }
                match meta.modified() {
                    Ok(mtime) => SystemTime::now()
                        .duration_since(mtime)
                        .map(|d| d >= self.update_interval)
                        .unwrap_or(true),
                    Err(_) => true,
                }
            }
            Err(_) => true,
        }
    }

    fn download_failed(&self, e: impl std::fmt::Display) -> PslError {
        PslError::provider(
            ProviderErrorKind::DownloadFailed,
            format!("Download of {} failed: {}", self.url, e),
        )
    }

    /// Fetch the rule list without touching the cache
    fn fetch(&self) -> Result<String> {
        let response = ureq::get(&self.url)
            .call()
            .map_err(|e| self.download_failed(e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| self.download_failed(e))
    }

    /// Download into `path` through a temporary file
    fn download(&self, path: &Path) -> Result<()> {
        let _lock = self.download_lock.lock();

        // Double-check after acquiring lock
        if !self.should_download(path) {
            return Ok(());
        }

        info!("Downloading {} from {}", path.display(), self.url);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");

        let response = ureq::get(&self.url)
            .call()
            .map_err(|e| self.download_failed(e))?;

        let (_, body) = response.into_parts();
        let mut reader = body.into_reader();
        write_rule_file(&mut reader, &tmp_path)?;

        fs::rename(&tmp_path, path)?;

        info!("Downloaded {} successfully", path.display());
        Ok(())
    }

    fn load_text(&self) -> Result<String> {
        let Some(path) = &self.cache_path else {
            return self.fetch();
        };

        if self.should_download(path) {
            if let Err(e) = self.download(path) {
                if !path.exists() {
                    return Err(e);
                }
                warn!("Download failed, using cached rule list: {}", e);
            }
        }

        Ok(fs::read_to_string(path)?)
    }
}

impl Default for WebRuleProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `reader` to `path` and verify the result; `path` is removed on failure
fn write_rule_file(reader: &mut impl Read, path: &Path) -> Result<()> {
    let written = fs::File::create(path).and_then(|mut file| {
        std::io::copy(reader, &mut file)?;
        file.flush()
    });

    let result = written.map_err(PslError::from).and_then(|()| verify_rule_file(path));
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

/// Check that a downloaded file holds at least one rule
fn verify_rule_file(path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)?;
    if parse_rules(&text).is_empty() {
        return Err(PslError::provider(
            ProviderErrorKind::InvalidData,
            format!("{} contains no public suffix rules", path.display()),
        ));
    }
    Ok(())
}

impl RuleProvider for WebRuleProvider {
    fn load_rules(&self) -> Result<Vec<Rule>> {
        let rules = parse_rules(&self.load_text()?);
        if rules.is_empty() {
            return Err(PslError::provider(
                ProviderErrorKind::InvalidData,
                format!("{} returned no public suffix rules", self.url),
            ));
        }
        Ok(rules)
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl AsyncRuleProvider for WebRuleProvider {
    async fn load_rules_async(&self) -> Result<Vec<Rule>> {
        let provider = self.clone();
        tokio::task::spawn_blocking(move || provider.load_rules())
            .await
            .map_err(|e| self.download_failed(e))?
    }
}
