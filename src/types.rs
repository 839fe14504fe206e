use serde::Serialize;
use url::Host;

/// Label that stands for "any single label" in a rule.
pub const WILDCARD_LABEL: &str = "*";

/// Public suffix rule type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleType {
    /// Plain rule: "co.uk"
    Normal,
    /// Wildcard rule: "*.ck"
    Wildcard,
    /// Exception to a wildcard rule: "!www.ck"
    WildcardException,
}

/// Section of the rule list a rule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RuleDivision {
    /// Outside any marked section (or the implicit fallback rule)
    #[default]
    Unknown,
    /// Between the ICANN DOMAINS markers
    Icann,
    /// Between the PRIVATE DOMAINS markers
    Private,
}

/// A single public suffix rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    /// Rule text as written in the list, e.g. "*.ck", "!www.ck", "co.uk".
    /// Exceptions keep their `!` marker.
    pub name: String,
    /// Rule type
    pub rule_type: RuleType,
    /// Number of dot-separated labels, not counting the `!` marker
    pub label_count: usize,
    /// Rule list section
    pub division: RuleDivision,
}

impl Rule {
    /// Classify a single rule text.
    ///
    /// Returns `None` for text that cannot be a rule (empty, an empty label, or
    /// a label IDNA rejects). Unicode labels are stored as punycode.
    pub fn new(text: &str) -> Option<Self> {
        let name = text.trim().to_lowercase();
        let name = if name.is_ascii() {
            name
        } else {
            to_ascii_labels(&name)?
        };

        let (rule_type, match_name) = if let Some(stripped) = name.strip_prefix('!') {
            (RuleType::WildcardException, stripped)
        } else if name.starts_with("*.") {
            (RuleType::Wildcard, name.as_str())
        } else {
            (RuleType::Normal, name.as_str())
        };

        if match_name.is_empty() || match_name.split('.').any(str::is_empty) {
            return None;
        }
        let label_count = match_name.split('.').count();

        Some(Self {
            name,
            rule_type,
            label_count,
            division: RuleDivision::Unknown,
        })
    }

    /// The implicit `*` rule every unlisted top-level label falls back to.
    pub fn root() -> Self {
        Self {
            name: WILDCARD_LABEL.to_string(),
            rule_type: RuleType::Wildcard,
            label_count: 1,
            division: RuleDivision::Unknown,
        }
    }

    /// Set the rule list section
    pub fn with_division(mut self, division: RuleDivision) -> Self {
        self.division = division;
        self
    }

    /// Check if this is the implicit fallback rule
    pub fn is_root(&self) -> bool {
        self.rule_type == RuleType::Wildcard && self.name == WILDCARD_LABEL
    }

    /// Check if this is a wildcard exception
    pub fn is_exception(&self) -> bool {
        self.rule_type == RuleType::WildcardException
    }

    /// Rule name without the exception marker; this is the text matched against hosts.
    pub fn match_name(&self) -> &str {
        self.name.strip_prefix('!').unwrap_or(&self.name)
    }

    /// Labels of the rule in host order (leftmost first)
    pub fn labels(&self) -> std::str::Split<'_, char> {
        self.match_name().split('.')
    }

    /// Number of trailing host labels that form the public suffix when this rule wins.
    ///
    /// An exception rule's leftmost label belongs to the registrable domain, so
    /// `!www.ck` yields a one-label suffix.
    pub fn suffix_label_count(&self) -> usize {
        match self.rule_type {
            RuleType::WildcardException => self.label_count - 1,
            _ => self.label_count,
        }
    }
}

/// Convert each non-ASCII label to punycode, leaving `*` and `!` intact.
fn to_ascii_labels(name: &str) -> Option<String> {
    let labels = name
        .split('.')
        .map(|label| {
            if label.is_ascii() {
                return Some(label.to_string());
            }
            let (marker, label) = match label.strip_prefix('!') {
                Some(stripped) => ("!", stripped),
                None => ("", label),
            };
            match Host::parse(label).ok()? {
                Host::Domain(ascii) => Some(format!("{marker}{ascii}")),
                _ => None,
            }
        })
        .collect::<Option<Vec<String>>>()?;
    Some(labels.join("."))
}

/// Result of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainInfo {
    /// Full normalized host
    pub hostname: String,
    /// Public suffix, e.g. "co.uk"
    pub tld: String,
    /// Label immediately left of the public suffix, e.g. "example"
    pub domain: Option<String>,
    /// Labels left of the registrable domain, e.g. "www"
    pub sub_domain: Option<String>,
    /// Public suffix plus one label, e.g. "example.co.uk".
    /// `None` when the host is itself a public suffix.
    pub registrable_domain: Option<String>,
    /// The winning rule
    pub rule: Rule,
}

impl DomainInfo {
    /// Split host labels (leftmost first) at a suffix of `suffix_len` labels.
    pub(crate) fn from_labels<S: AsRef<str>>(
        hostname: &str,
        labels: &[S],
        suffix_len: usize,
        rule: Rule,
    ) -> Self {
        let join = |parts: &[S]| {
            parts
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<&str>>()
                .join(".")
        };

        let split = labels.len().saturating_sub(suffix_len);
        let tld = join(&labels[split..]);

        let (domain, sub_domain, registrable_domain) = if split == 0 {
            (None, None, None)
        } else {
            let domain = labels[split - 1].as_ref().to_string();
            let sub_domain = (split > 1).then(|| join(&labels[..split - 1]));
            let registrable = join(&labels[split - 1..]);
            (Some(domain), sub_domain, Some(registrable))
        };

        Self {
            hostname: hostname.to_string(),
            tld,
            domain,
            sub_domain,
            registrable_domain,
            rule,
        }
    }

    /// Check if the host is exactly a public suffix
    pub fn is_suffix_only(&self) -> bool {
        self.registrable_domain.is_none()
    }
}
