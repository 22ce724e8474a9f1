//! Link and artifact filtering
//!
//! Decides which predicates are navigational and which are structural or
//! administrative noise. The rule lists are plain data: callers extend them
//! with [`LinkFilter::with_link_rule`] / [`LinkFilter::with_artifact_rule`] or
//! through configuration, never by changing call sites.

use crate::error::Result;
use crate::vocab;
use regex::Regex;

/// Exact URIs hidden from navigation.
const DEFAULT_LINK_EXACT: &[&str] = &[
    vocab::RDF_TYPE,
    vocab::OSLC_INSTANCE_SHAPE,
    vocab::OSLC_SERVICE_PROVIDER,
    vocab::OSLC_CONFIG_COMPONENT,
];

/// Unanchored patterns hidden from navigation.
const DEFAULT_LINK_PATTERNS: &[&str] = &[
    r".*/rm/types/.*", // attribute data types of requirement artifacts
    r".*project",
    r".*risk",
    r".*contributor",
    r".*accessContext",
    r".*priority",
    r".*type",
    r".*resolvedBy",
    r".*modifiedBy",
    r".*creator",
    r".*severity",
    r".*accessControl",
    r".*hasPriority",
    r".*template",
    r".*category",
    r".*category_.*",
    r".*hasWorkflowState",
    r".*relation",
    r".*executionInstructions",
];

/// A single exclusion rule.
#[derive(Clone, Debug)]
pub enum Rule {
    Exact(String),
    Pattern(Regex),
}

impl Rule {
    pub fn exact(uri: impl Into<String>) -> Self {
        Self::Exact(uri.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(uri) => uri == candidate,
            Self::Pattern(re) => re.is_match(candidate),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LinkFilter {
    artifacts: Vec<Rule>,
    links: Vec<Rule>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        let mut links: Vec<Rule> = DEFAULT_LINK_EXACT.iter().map(|u| Rule::exact(*u)).collect();
        links.extend(
            DEFAULT_LINK_PATTERNS
                .iter()
                .map(|p| Rule::Pattern(Regex::new(p).expect("default link pattern is valid"))),
        );
        Self {
            artifacts: Vec::new(),
            links,
        }
    }
}

impl LinkFilter {
    /// A filter that lets everything through.
    pub fn permissive() -> Self {
        Self {
            artifacts: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn with_link_rule(mut self, rule: Rule) -> Self {
        self.links.push(rule);
        self
    }

    pub fn with_artifact_rule(mut self, rule: Rule) -> Self {
        self.artifacts.push(rule);
        self
    }

    /// True when resources of this type should be hidden.
    pub fn filter_artifact(&self, type_uri: &str) -> bool {
        self.artifacts.iter().any(|r| r.matches(type_uri))
    }

    /// True when this predicate should not be followed.
    pub fn filter_link(&self, predicate: &str) -> bool {
        self.links.iter().any(|r| r.matches(predicate))
    }

    pub fn link_rules(&self) -> &[Rule] {
        &self.links
    }

    pub fn artifact_rules(&self) -> &[Rule] {
        &self.artifacts
    }
}
