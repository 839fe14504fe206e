//! Compiled rule structure.
//!
//! Rules are stored as reversed label paths in an arena of nodes: `co.uk`
//! becomes `uk -> co`, `*.ck` becomes `ck -> *`, and `!www.ck` becomes
//! `ck -> www`. Nodes refer to their children by index, so the built trie is
//! plain owned data and can be shared across threads behind an `Arc`.

use std::collections::HashMap;

use log::debug;

use crate::types::Rule;

/// Index of a node in the trie arena
pub type NodeId = usize;

/// Root node index
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<String, NodeId>,
    rule: Option<Rule>,
}

/// Immutable suffix trie keyed by reversed domain labels.
///
/// The root owns the implicit `*` rule, so every lookup has at least one match.
#[derive(Debug, Clone)]
pub struct SuffixTrie {
    nodes: Vec<TrieNode>,
    rule_count: usize,
}

impl SuffixTrie {
    /// Build a trie from parsed rules.
    ///
    /// When two rules share a label path (e.g. `www.ck` and `!www.ck`), the
    /// first one wins.
    pub fn build<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut trie = Self {
            nodes: vec![TrieNode {
                children: HashMap::new(),
                rule: Some(Rule::root()),
            }],
            rule_count: 0,
        };

        for rule in rules {
            trie.insert(rule);
        }

        debug!(
            "Built suffix trie: {} rules, {} nodes",
            trie.rule_count,
            trie.nodes.len()
        );
        trie
    }

    fn insert(&mut self, rule: Rule) {
        let mut node = ROOT;
        for label in rule.labels().rev() {
            node = match self.nodes[node].children.get(label) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(label.to_string(), child);
                    child
                }
            };
        }

        if let Some(existing) = &self.nodes[node].rule {
            debug!(
                "Rule '{}' shares its label path with '{}', keeping '{}'",
                rule.name, existing.name, existing.name
            );
            return;
        }
        self.nodes[node].rule = Some(rule);
        self.rule_count += 1;
    }

    /// Child of `node` keyed by `label`, compared literally.
    pub fn child(&self, node: NodeId, label: &str) -> Option<NodeId> {
        self.nodes.get(node)?.children.get(label).copied()
    }

    /// Rule terminating at `node`, if any
    pub fn rule(&self, node: NodeId) -> Option<&Rule> {
        self.nodes.get(node)?.rule.as_ref()
    }

    /// Number of explicit rules (excluding the implicit root rule)
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the trie holds no explicit rules
    pub fn is_empty(&self) -> bool {
        self.rule_count == 0
    }
}

impl Default for SuffixTrie {
    fn default() -> Self {
        Self::build(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_rules;
    use crate::types::RuleType;

    #[test]
    fn test_empty_trie_has_root_rule() {
        let trie = SuffixTrie::default();
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert!(trie.rule(ROOT).unwrap().is_root());
    }

    #[test]
    fn test_reversed_paths() {
        let trie = SuffixTrie::build(parse_rules("uk\nco.uk\n"));
        assert_eq!(trie.rule_count(), 2);
        assert_eq!(trie.node_count(), 3);

        let uk = trie.child(ROOT, "uk").unwrap();
        assert_eq!(trie.rule(uk).unwrap().name, "uk");

        let co = trie.child(uk, "co").unwrap();
        assert_eq!(trie.rule(co).unwrap().name, "co.uk");

        assert!(trie.child(ROOT, "co").is_none());
    }

    #[test]
    fn test_intermediate_nodes_have_no_rule() {
        let trie = SuffixTrie::build(parse_rules("city.kawasaki.jp\n"));
        let jp = trie.child(ROOT, "jp").unwrap();
        let kawasaki = trie.child(jp, "kawasaki").unwrap();
        let city = trie.child(kawasaki, "city").unwrap();

        assert!(trie.rule(jp).is_none());
        assert!(trie.rule(kawasaki).is_none());
        assert_eq!(trie.rule(city).unwrap().label_count, 3);
    }

    #[test]
    fn test_wildcard_is_literal_key() {
        let trie = SuffixTrie::build(parse_rules("*.ck\n!www.ck\n"));
        let ck = trie.child(ROOT, "ck").unwrap();
        assert!(trie.rule(ck).is_none());

        let star = trie.child(ck, "*").unwrap();
        assert_eq!(trie.rule(star).unwrap().rule_type, RuleType::Wildcard);

        // The exception is stored without its marker
        let www = trie.child(ck, "www").unwrap();
        assert_eq!(trie.rule(www).unwrap().name, "!www.ck");

        // "*" is not a pattern during lookup
        assert!(trie.child(ck, "foo").is_none());
    }

    #[test]
    fn test_shared_path_keeps_first() {
        let trie = SuffixTrie::build(parse_rules("!www.ck\nwww.ck\n"));
        assert_eq!(trie.rule_count(), 1);
        let ck = trie.child(ROOT, "ck").unwrap();
        let www = trie.child(ck, "www").unwrap();
        assert!(trie.rule(www).unwrap().is_exception());
    }

    #[test]
    fn test_unknown_node_id() {
        let trie = SuffixTrie::default();
        assert!(trie.child(42, "com").is_none());
        assert!(trie.rule(42).is_none());
    }
}
