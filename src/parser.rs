use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ProviderErrorKind, PslError, Result};
use crate::types::{Rule, RuleDivision};

/// Comment marker of the rule list format
const COMMENT_MARKER: &str = "//";

/// Section markers, e.g. "// ===BEGIN ICANN DOMAINS==="
static DIVISION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^//\s*===(BEGIN|END) (ICANN|PRIVATE) DOMAINS===")
        .expect("DIVISION_PATTERN: hardcoded regex is invalid")
});

/// Parse public suffix rules from rule list text.
///
/// Blank lines and `//` comments are skipped, as are lines that do not form a
/// rule. Only the first whitespace-delimited token of a line is read. Each rule
/// name is kept once.
pub fn parse_rules(text: &str) -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut seen = HashSet::new();
    let mut division = RuleDivision::Unknown;
    let mut skipped = 0usize;

    for line in text.lines() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with(COMMENT_MARKER) {
            if let Some(marker) = DIVISION_PATTERN.captures(line) {
                division = match (&marker[1], &marker[2]) {
                    ("BEGIN", "ICANN") => RuleDivision::Icann,
                    ("BEGIN", _) => RuleDivision::Private,
                    _ => RuleDivision::Unknown,
                };
            }
            continue;
        }

        let token = line.split_whitespace().next().unwrap_or(line);
        let Some(rule) = Rule::new(token) else {
            skipped += 1;
            continue;
        };

        if seen.insert(rule.name.clone()) {
            rules.push(rule.with_division(division));
        }
    }

    debug!(
        "Parsed {} public suffix rules ({} malformed lines skipped)",
        rules.len(),
        skipped
    );
    rules
}

/// Parse public suffix rules from a file.
pub fn parse_rules_from_file(path: impl AsRef<Path>) -> Result<Vec<Rule>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PslError::provider(
            ProviderErrorKind::NotFound,
            format!("Rule file '{}' does not exist", path.display()),
        ));
    }
    let text = fs::read_to_string(path)?;
    Ok(parse_rules(&text))
}
