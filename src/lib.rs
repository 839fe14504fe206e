//! PSL Engine - A Public Suffix List engine for Rust
//!
//! This library finds the public suffix (e.g. `co.uk`) and the registrable
//! domain (e.g. `example.co.uk`) of a host name:
//! - Rule list parsing (normal, wildcard and exception rules)
//! - Compiled suffix trie keyed by reversed labels
//! - Exception-first, longest-match rule precedence
//! - IDNA host normalization
//! - File and HTTP rule providers with on-disk caching
//! - Runtime rule refresh without blocking lookups
//!
//! # Example
//!
//! ```rust
//! use psl_engine_r::{DomainResolver, ResolverOptions};
//!
//! let rules_text = "
//! // ===BEGIN ICANN DOMAINS===
//! uk
//! co.uk
//! *.ck
//! !www.ck
//! // ===END ICANN DOMAINS===
//! ";
//!
//! let resolver = DomainResolver::from_text(rules_text, ResolverOptions::default());
//!
//! let info = resolver.parse("www.example.co.uk").unwrap();
//! assert_eq!(info.tld, "co.uk");
//! assert_eq!(info.registrable_domain.as_deref(), Some("example.co.uk"));
//! assert_eq!(info.sub_domain.as_deref(), Some("www"));
//!
//! // Exceptions override wildcards
//! let info = resolver.parse("www.ck").unwrap();
//! assert_eq!(info.rule.name, "!www.ck");
//! assert_eq!(info.registrable_domain.as_deref(), Some("www.ck"));
//!
//! assert!(resolver.is_valid_domain("example.co.uk"));
//! assert!(!resolver.is_valid_domain("co.uk"));
//! ```
//!
//! # Rule Syntax
//!
//! One rule per line, in the public suffix list format:
//!
//! | Rule | Example | Description |
//! |------|---------|-------------|
//! | Normal | `co.uk` | The labels form a public suffix |
//! | Wildcard | `*.ck` | Any label before `ck` forms a public suffix |
//! | Exception | `!www.ck` | `www.ck` is registrable despite `*.ck` |
//! | Comment | `// text` | Ignored |
//!
//! Hosts with no matching rule fall back to the implicit `*` rule: the
//! rightmost label is the public suffix.

pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod parser;
pub mod provider;
pub mod resolver;
pub mod shared;
pub mod types;

// Re-export commonly used items
pub use error::{ErrorKind, ProviderErrorKind, PslError, Result};
pub use matcher::{find_matches, find_winning_rule, precedence, rank, SuffixTrie};
pub use normalizer::{AsciiNormalizer, DomainNormalizer, NormalizedDomain, UrlNormalizer};
pub use parser::{parse_rules, parse_rules_from_file};
pub use types::{DomainInfo, Rule, RuleDivision, RuleType, WILDCARD_LABEL};

// Re-export provider types
#[cfg(feature = "async")]
pub use provider::AsyncRuleProvider;
pub use provider::{
    FileRuleProvider, MemoryRuleProvider, RuleProvider, WebRuleProvider, DEFAULT_CACHE_FILENAME,
    DEFAULT_RULE_LIST_URL, DEFAULT_UPDATE_INTERVAL,
};

// Re-export resolver types
pub use resolver::{BareSuffixPolicy, DomainResolver, ResolverOptions};
pub use shared::SharedResolver;
