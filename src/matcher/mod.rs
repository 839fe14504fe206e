//! Rule matching.
//!
//! Matching walks the trie along the reversed host labels and follows two
//! branches at every node: the child keyed by the exact label and the child
//! keyed by `*`. Every rule met on either branch is a candidate. The winner is
//! then chosen by precedence:
//!
//! 1. wildcard exceptions before everything else
//! 2. more labels before fewer
//! 3. lexicographically greater rule name (tie-break only)

pub mod trie;

use std::cmp::Ordering;

use log::trace;

pub use trie::{NodeId, SuffixTrie, ROOT};

use crate::types::{Rule, WILDCARD_LABEL};

/// Collect every rule whose label path is a prefix of `reversed_labels`.
///
/// `reversed_labels` is the host split on `.` with the top-level label first.
/// The root rule is always included.
pub fn find_matches<'a, S: AsRef<str>>(
    trie: &'a SuffixTrie,
    reversed_labels: &[S],
) -> Vec<&'a Rule> {
    let mut matches = Vec::new();
    // Work-list of (node, index of the next label to consume)
    let mut pending: Vec<(NodeId, usize)> = vec![(ROOT, 0)];

    while let Some((node, depth)) = pending.pop() {
        if let Some(rule) = trie.rule(node) {
            matches.push(rule);
        }

        let Some(label) = reversed_labels.get(depth) else {
            continue;
        };
        let label: &str = label.as_ref();

        if let Some(child) = trie.child(node, label) {
            pending.push((child, depth + 1));
        }
        // A literal "*" label already took the wildcard child above
        if label != WILDCARD_LABEL {
            if let Some(child) = trie.child(node, WILDCARD_LABEL) {
                pending.push((child, depth + 1));
            }
        }
    }

    matches
}

/// Compare two rules by match precedence; `Ordering::Greater` means `a` wins.
pub fn precedence(a: &Rule, b: &Rule) -> Ordering {
    a.is_exception()
        .cmp(&b.is_exception())
        .then(a.label_count.cmp(&b.label_count))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort candidate rules so the winner comes first.
pub fn rank(matches: &mut [&Rule]) {
    matches.sort_by(|a, b| precedence(b, a));
}

/// Find the rule that determines the suffix boundary for `reversed_labels`.
///
/// Never fails: with no explicit match the implicit `*` rule wins.
pub fn find_winning_rule<'a, S: AsRef<str>>(
    trie: &'a SuffixTrie,
    reversed_labels: &[S],
) -> &'a Rule {
    let mut matches = find_matches(trie, reversed_labels);
    rank(&mut matches);
    trace!(
        "Matched {} rules for {:?}",
        matches.len(),
        reversed_labels.iter().map(|l| l.as_ref()).collect::<Vec<&str>>()
    );
    // The root rule is always a candidate
    matches[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_rules;
    use crate::types::RuleType;

    fn trie(text: &str) -> SuffixTrie {
        SuffixTrie::build(parse_rules(text))
    }

    fn reversed(host: &str) -> Vec<&str> {
        host.split('.').rev().collect()
    }

    fn names(matches: &[&Rule]) -> Vec<String> {
        let mut names: Vec<String> = matches.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_find_matches_collects_all_levels() {
        let trie = trie("uk\nco.uk\n");
        let matches = find_matches(&trie, &reversed("example.co.uk"));
        assert_eq!(names(&matches), vec!["*", "co.uk", "uk"]);
    }

    #[test]
    fn test_find_matches_explores_both_branches() {
        let trie = trie("*.ck\n!www.ck\n");
        let matches = find_matches(&trie, &reversed("www.ck"));
        assert_eq!(names(&matches), vec!["!www.ck", "*", "*.ck"]);

        let matches = find_matches(&trie, &reversed("foo.ck"));
        assert_eq!(names(&matches), vec!["*", "*.ck"]);
    }

    #[test]
    fn test_find_matches_literal_star_label() {
        let trie = trie("*.ck\n");
        let matches = find_matches(&trie, &reversed("*.ck"));
        assert_eq!(names(&matches), vec!["*", "*.ck"]);
    }

    #[test]
    fn test_find_matches_wildcard_then_exact() {
        // *.kawasaki.jp style wildcard in the middle of a deeper rule
        let trie = trie("jp\n*.kawasaki.jp\n!city.kawasaki.jp\n");
        let matches = find_matches(&trie, &reversed("a.b.kawasaki.jp"));
        assert_eq!(names(&matches), vec!["*", "*.kawasaki.jp", "jp"]);
    }

    #[test]
    fn test_unknown_tld_matches_root_only() {
        let trie = trie("com\n");
        let matches = find_matches(&trie, &reversed("something.xyz"));
        assert_eq!(matches.len(), 1);
        assert!(matches[0].is_root());
    }

    #[test]
    fn test_exception_beats_wildcard() {
        let trie = trie("*.ck\n!www.ck\n");
        let winner = find_winning_rule(&trie, &reversed("www.ck"));
        assert_eq!(winner.name, "!www.ck");
        assert_eq!(winner.rule_type, RuleType::WildcardException);
    }

    #[test]
    fn test_exception_beats_longer_rule() {
        let trie = trie("*.kawasaki.jp\n!city.kawasaki.jp\nsub.city.kawasaki.jp\n");
        let winner = find_winning_rule(&trie, &reversed("sub.city.kawasaki.jp"));
        assert_eq!(winner.name, "!city.kawasaki.jp");
    }

    #[test]
    fn test_longer_rule_wins() {
        let trie = trie("uk\nco.uk\n");
        let winner = find_winning_rule(&trie, &reversed("example.co.uk"));
        assert_eq!(winner.name, "co.uk");
    }

    #[test]
    fn test_wildcard_beats_shorter_normal() {
        let trie = trie("ck\n*.ck\n");
        let winner = find_winning_rule(&trie, &reversed("foo.ck"));
        assert_eq!(winner.name, "*.ck");
    }

    #[test]
    fn test_fallback_rule_wins_when_nothing_matches() {
        let trie = trie("com\n");
        let winner = find_winning_rule(&trie, &reversed("something.xyz"));
        assert!(winner.is_root());
    }

    #[test]
    fn test_empty_label_sequence_returns_root() {
        let trie = trie("com\n");
        let labels: Vec<&str> = Vec::new();
        assert!(find_winning_rule(&trie, &labels).is_root());
    }

    #[test]
    fn test_name_tie_break() {
        // Same type and label count: greater name wins
        let trie = trie("*.ck\nfoo.ck\n");
        let winner = find_winning_rule(&trie, &reversed("foo.ck"));
        assert_eq!(winner.name, "foo.ck");
    }

    #[test]
    fn test_rank_order() {
        let a = Rule::new("!www.ck").unwrap();
        let b = Rule::new("a.b.ck").unwrap();
        let c = Rule::new("*.ck").unwrap();
        let d = Rule::new("ck").unwrap();
        let mut rules = vec![&d, &c, &b, &a];
        rank(&mut rules);
        let order: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["!www.ck", "a.b.ck", "*.ck", "ck"]);
    }

    #[test]
    fn test_precedence_is_antisymmetric() {
        let a = Rule::new("co.uk").unwrap();
        let b = Rule::new("uk").unwrap();
        assert_eq!(precedence(&a, &b), Ordering::Greater);
        assert_eq!(precedence(&b, &a), Ordering::Less);
        assert_eq!(precedence(&a, &a), Ordering::Equal);
    }
}
