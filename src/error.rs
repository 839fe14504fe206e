use thiserror::Error;

use crate::types::Rule;

/// Classifies rule provider errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Rule list file does not exist
    NotFound,
    /// Download failed and no cached copy was available
    DownloadFailed,
    /// Rule list content is unusable (empty, no rules)
    InvalidData,
}

/// Coarse error classification, for callers that branch on kind rather than variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty label sequence or an empty label
    InvalidInput,
    /// Input is exactly a public suffix and the policy does not allow that
    UnknownDomain,
    /// Lookup attempted without a compiled rule structure
    RuleStructureUnavailable,
    /// Rule list could not be provided
    Provider,
    /// I/O failure
    Io,
}

/// PSL Engine error types
#[derive(Error, Debug)]
pub enum PslError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown domain: {domain}")]
    UnknownDomain {
        domain: String,
        /// The rule that matched the whole input, if any
        rule: Option<Rule>,
    },

    #[error("Rule structure unavailable: the suffix trie was never built")]
    RuleStructureUnavailable,

    #[error("Provider error: {message}")]
    ProviderError {
        kind: ProviderErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PslError {
    /// Get the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PslError::InvalidInput(_) => ErrorKind::InvalidInput,
            PslError::UnknownDomain { .. } => ErrorKind::UnknownDomain,
            PslError::RuleStructureUnavailable => ErrorKind::RuleStructureUnavailable,
            PslError::ProviderError { .. } => ErrorKind::Provider,
            PslError::IoError(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        PslError::ProviderError {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PslError>;
