//! Shared resolver with runtime refresh.
//!
//! A refresh builds a complete new resolver first and then swaps the
//! reference in one step. Lookups that already hold the previous snapshot keep
//! using it; the old trie is never modified.

use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

use crate::error::Result;
use crate::provider::RuleProvider;
use crate::resolver::{DomainResolver, ResolverOptions};
use crate::types::DomainInfo;

/// Swappable handle to the current `DomainResolver`.
pub struct SharedResolver {
    current: RwLock<Arc<DomainResolver>>,
}

impl SharedResolver {
    /// Wrap an initial resolver
    pub fn new(resolver: DomainResolver) -> Self {
        Self {
            current: RwLock::new(Arc::new(resolver)),
        }
    }

    /// Build the initial resolver from a provider
    pub fn from_provider(provider: &dyn RuleProvider, options: ResolverOptions) -> Result<Self> {
        Ok(Self::new(DomainResolver::from_provider(provider, options)?))
    }

    /// Snapshot of the current resolver
    pub fn current(&self) -> Arc<DomainResolver> {
        self.current.read().clone()
    }

    /// Replace the current resolver, returning the previous one
    pub fn replace(&self, resolver: DomainResolver) -> Arc<DomainResolver> {
        std::mem::replace(&mut *self.current.write(), Arc::new(resolver))
    }

    /// Reload rules from `provider` and swap them in.
    ///
    /// Keeps the current resolver's normalizer and options. On error the
    /// current resolver stays in place.
    pub fn refresh(&self, provider: &dyn RuleProvider) -> Result<()> {
        let rules = provider.load_rules()?;
        let resolver = self.current().with_rules(rules);
        let rule_count = resolver.trie().map_or(0, |t| t.rule_count());
        self.replace(resolver);
        info!("Swapped in refreshed public suffix rules ({} rules)", rule_count);
        Ok(())
    }

    /// Parse a host name against the current rules
    pub fn parse(&self, domain: &str) -> Result<DomainInfo> {
        self.current().parse(domain)
    }

    /// Check a host name against the current rules
    pub fn is_valid_domain(&self, domain: &str) -> bool {
        self.current().is_valid_domain(domain)
    }
}
