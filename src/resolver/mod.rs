//! Domain resolver module.
//!
//! Turns a host name into its public suffix and registrable domain using a
//! compiled [`SuffixTrie`].

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::info;
use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use url::Url;

use crate::error::{PslError, Result};
use crate::matcher::{find_winning_rule, SuffixTrie};
use crate::normalizer::{DomainNormalizer, NormalizedDomain, UrlNormalizer};
use crate::parser::parse_rules;
use crate::provider::RuleProvider;
use crate::types::{DomainInfo, Rule, RuleType};

/// Hosts accepted by `is_valid_domain` after normalization
static DNS_SAFE_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_-]+(\.[a-z0-9_-]+)*$")
        .expect("DNS_SAFE_HOST: hardcoded regex is invalid")
});

/// What to do when the whole input is itself a public suffix (e.g. "co.uk").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BareSuffixPolicy {
    /// Succeed with a suffix-only `DomainInfo` (no registrable domain).
    /// A wildcard rule whose suffix does not match still fails with `UnknownDomain`.
    #[default]
    SuffixOnly,
    /// Always fail with `UnknownDomain`.
    Reject,
}

/// Resolver options.
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Handling of inputs that are exactly a public suffix
    pub bare_suffix_policy: BareSuffixPolicy,
    /// LRU cache size for lookup results, 0 disables caching
    pub cache_size: usize,
}

impl ResolverOptions {
    /// Create new resolver options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bare suffix policy.
    pub fn with_bare_suffix_policy(mut self, policy: BareSuffixPolicy) -> Self {
        self.bare_suffix_policy = policy;
        self
    }

    /// Set cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }
}

/// Public suffix resolver.
///
/// Holds a shared, immutable trie; lookups only read it and may run
/// concurrently. Several resolvers with different rule snapshots can coexist.
pub struct DomainResolver {
    trie: Option<Arc<SuffixTrie>>,
    normalizer: Arc<dyn DomainNormalizer>,
    options: ResolverOptions,
    cache: Option<Mutex<LruCache<String, DomainInfo>>>,
}

impl DomainResolver {
    /// Create a resolver over an already built trie.
    pub fn new(trie: Arc<SuffixTrie>, options: ResolverOptions) -> Self {
        Self::with_trie(Some(trie), options)
    }

    /// Create a resolver with no rule structure; every lookup fails with
    /// `RuleStructureUnavailable`.
    pub fn unbuilt(options: ResolverOptions) -> Self {
        Self::with_trie(None, options)
    }

    fn with_trie(trie: Option<Arc<SuffixTrie>>, options: ResolverOptions) -> Self {
        let cache = NonZeroUsize::new(options.cache_size).map(|n| Mutex::new(LruCache::new(n)));
        Self {
            trie,
            normalizer: Arc::new(UrlNormalizer),
            options,
            cache,
        }
    }

    /// Create a resolver from parsed rules.
    pub fn from_rules<I>(rules: I, options: ResolverOptions) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        Self::new(Arc::new(SuffixTrie::build(rules)), options)
    }

    /// Create a resolver from rule list text.
    pub fn from_text(text: &str, options: ResolverOptions) -> Self {
        Self::from_rules(parse_rules(text), options)
    }

    /// Create a resolver from a rule provider.
    pub fn from_provider(provider: &dyn RuleProvider, options: ResolverOptions) -> Result<Self> {
        let rules = provider.load_rules()?;
        info!("Loaded {} public suffix rules", rules.len());
        Ok(Self::from_rules(rules, options))
    }

    /// Replace the host normalizer (default: `UrlNormalizer`).
    pub fn with_normalizer(mut self, normalizer: impl DomainNormalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// Build a resolver over new rules that keeps this resolver's normalizer
    /// and options. The lookup cache starts empty.
    pub fn with_rules<I>(&self, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut resolver = Self::from_rules(rules, self.options.clone());
        resolver.normalizer = Arc::clone(&self.normalizer);
        resolver
    }

    /// The compiled trie, if any
    pub fn trie(&self) -> Option<&Arc<SuffixTrie>> {
        self.trie.as_ref()
    }

    /// Resolver options
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve already normalized labels (leftmost label first).
    ///
    /// `host` is the normalized host the labels came from; it is reported
    /// back as `DomainInfo::hostname`.
    pub fn resolve<S: AsRef<str>>(&self, labels: &[S], host: &str) -> Result<DomainInfo> {
        if labels.is_empty() {
            return Err(PslError::InvalidInput("empty label sequence".to_string()));
        }
        if labels.iter().any(|l| l.as_ref().is_empty()) {
            return Err(PslError::InvalidInput(format!(
                "{host}: empty label detected"
            )));
        }

        let trie = self
            .trie
            .as_deref()
            .ok_or(PslError::RuleStructureUnavailable)?;

        let reversed: Vec<&str> = labels.iter().rev().map(|l| l.as_ref()).collect();
        let rule = find_winning_rule(trie, &reversed);
        let suffix_len = rule.suffix_label_count();

        if labels.len() == suffix_len {
            return self.resolve_bare_suffix(labels, host, rule);
        }

        Ok(DomainInfo::from_labels(host, labels, suffix_len, rule.clone()))
    }

    /// The input is exactly as long as the winning rule's suffix.
    fn resolve_bare_suffix<S: AsRef<str>>(
        &self,
        labels: &[S],
        host: &str,
        rule: &Rule,
    ) -> Result<DomainInfo> {
        let tld = labels
            .iter()
            .map(|l| l.as_ref())
            .collect::<Vec<&str>>()
            .join(".");

        let confirmed = rule.is_root()
            || match rule.rule_type {
                // "*.ck" confirms any "<label>.ck"
                RuleType::Wildcard => rule
                    .name
                    .strip_prefix('*')
                    .is_some_and(|suffix| tld.ends_with(suffix)),
                _ => tld == rule.match_name(),
            };

        match self.options.bare_suffix_policy {
            BareSuffixPolicy::SuffixOnly if confirmed => Ok(DomainInfo::from_labels(
                host,
                labels,
                labels.len(),
                rule.clone(),
            )),
            _ => Err(PslError::UnknownDomain {
                domain: host.to_string(),
                rule: confirmed.then(|| rule.clone()),
            }),
        }
    }

    fn lookup(&self, normalized: &NormalizedDomain) -> Result<DomainInfo> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lock().get(&normalized.host) {
                return Ok(hit.clone());
            }
        }

        let info = self.resolve(&normalized.labels, &normalized.host)?;

        if let Some(cache) = &self.cache {
            cache.lock().put(normalized.host.clone(), info.clone());
        }
        Ok(info)
    }

    /// Parse a host name.
    pub fn parse(&self, domain: &str) -> Result<DomainInfo> {
        let normalized = self.normalizer.normalize(domain)?;
        self.lookup(&normalized)
    }

    /// Check if `domain` is a registrable host name under a known suffix.
    ///
    /// False for empty input, input starting with `*` or surrounded by
    /// whitespace, absolute URIs, hosts with
    /// characters outside `[a-z0-9_-]` after normalization, public suffixes
    /// themselves, unknown top-level domains and anything `parse` rejects.
    pub fn is_valid_domain(&self, domain: &str) -> bool {
        if domain.is_empty() || domain.starts_with('*') || domain.trim() != domain {
            return false;
        }
        if Url::parse(domain).is_ok() {
            return false;
        }

        let Ok(normalized) = self.normalizer.normalize(domain) else {
            return false;
        };
        if !DNS_SAFE_HOST.is_match(&normalized.host) {
            return false;
        }

        match self.lookup(&normalized) {
            Ok(info) => !info.is_suffix_only() && !info.rule.is_root(),
            Err(_) => false,
        }
    }

    /// Clear the lookup cache
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }
}
