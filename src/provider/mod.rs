//! Rule list providers.
//!
//! A provider supplies parsed rules from somewhere: memory, a local file, or
//! the public suffix list download.

mod web;

use std::path::{Path, PathBuf};

#[cfg(feature = "async")]
use async_trait::async_trait;

use crate::error::{ProviderErrorKind, PslError, Result};
use crate::parser::{parse_rules, parse_rules_from_file};
use crate::types::Rule;

pub use web::{
    WebRuleProvider, DEFAULT_CACHE_FILENAME, DEFAULT_RULE_LIST_URL, DEFAULT_UPDATE_INTERVAL,
};

/// Trait for loading public suffix rules
pub trait RuleProvider: Send + Sync {
    /// Load and parse the rule list
    fn load_rules(&self) -> Result<Vec<Rule>>;
}

/// Async rule provider interface.
#[cfg(feature = "async")]
#[async_trait]
pub trait AsyncRuleProvider: Send + Sync {
    /// Load and parse the rule list asynchronously
    async fn load_rules_async(&self) -> Result<Vec<Rule>>;
}

/// In-memory rule list
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleProvider {
    text: String,
}

impl MemoryRuleProvider {
    /// Create a provider from rule list text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl RuleProvider for MemoryRuleProvider {
    fn load_rules(&self) -> Result<Vec<Rule>> {
        Ok(parse_rules(&self.text))
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl AsyncRuleProvider for MemoryRuleProvider {
    async fn load_rules_async(&self) -> Result<Vec<Rule>> {
        self.load_rules()
    }
}

/// Rule list read from a local file
#[derive(Debug, Clone)]
pub struct FileRuleProvider {
    path: PathBuf,
}

impl FileRuleProvider {
    /// Create a provider for the given file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Rule list path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleProvider for FileRuleProvider {
    fn load_rules(&self) -> Result<Vec<Rule>> {
        parse_rules_from_file(&self.path)
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl AsyncRuleProvider for FileRuleProvider {
    async fn load_rules_async(&self) -> Result<Vec<Rule>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PslError::provider(
                    ProviderErrorKind::NotFound,
                    format!("Rule file '{}' does not exist", self.path.display()),
                )
            } else {
                PslError::IoError(e)
            }
        })?;
        Ok(parse_rules(&text))
    }
}
