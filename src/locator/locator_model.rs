use std::fmt;

use serde::Serialize;

// ============================================================================
// Locator expressions
// ============================================================================

/// A condition inside a step's `[...]` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `@name='value'`
    AttrEquals { name: String, value: String },
    /// `contains(@name,'value')`
    AttrContains { name: String, value: String },
    /// `text()='value'`
    TextEquals(String),
}

impl Predicate {
    pub fn attr_equals(name: &str, value: &str) -> Self {
        Predicate::AttrEquals {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn attr_contains(name: &str, value: &str) -> Self {
        Predicate::AttrContains {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn text_equals(text: &str) -> Self {
        Predicate::TextEquals(text.to_string())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::AttrEquals { name, value } => {
                write!(f, "@{}={}", name, xpath_literal(value))
            }
            Predicate::AttrContains { name, value } => {
                write!(f, "contains(@{},{})", name, xpath_literal(value))
            }
            Predicate::TextEquals(text) => write!(f, "text()={}", xpath_literal(text)),
        }
    }
}

/// One `tag[conditions][n]` segment of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub tag: String,
    pub predicates: Vec<Predicate>,
    /// 1-based position among same-tag siblings.
    pub position: Option<usize>,
}

impl Step {
    pub fn new(tag: &str) -> Self {
        Step {
            tag: tag.to_string(),
            predicates: Vec::new(),
            position: None,
        }
    }

    pub fn with_predicates(tag: &str, predicates: Vec<Predicate>) -> Self {
        Step {
            tag: tag.to_string(),
            predicates,
            position: None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        if !self.predicates.is_empty() {
            let joined = self
                .predicates
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" and ");
            write!(f, "[{}]", joined)?;
        }
        if let Some(position) = self.position {
            write!(f, "[{}]", position)?;
        }
        Ok(())
    }
}

/// A locator the engine can both print as XPath and evaluate itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// `//step/step/...`: first step anywhere in the document, the rest as children.
    ///
    /// Structural paths stop below `body`, so their first step is anchored
    /// with `//` rather than `/`; a `/`-rooted partial path selects nothing.
    Path(Vec<Step>),
    /// `(base)[n]`: the n-th match of `base` in document order.
    Nth { base: Box<Locator>, position: usize },
}

impl Locator {
    /// `//tag[p1 and p2 ...]`
    pub fn element(tag: &str, predicates: Vec<Predicate>) -> Self {
        Locator::Path(vec![Step::with_predicates(tag, predicates)])
    }

    pub fn nth(self, position: usize) -> Self {
        Locator::Nth {
            base: Box::new(self),
            position,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Path(steps) if steps.is_empty() => f.write_str("//*"),
            Locator::Path(steps) => {
                f.write_str("/")?;
                for step in steps {
                    write!(f, "/{}", step)?;
                }
                Ok(())
            }
            Locator::Nth { base, position } => write!(f, "({})[{}]", base, position),
        }
    }
}

/// Quote `value` as an XPath 1.0 string literal.
///
/// Single quotes are preferred; values containing both quote kinds are
/// split into a `concat(...)` call since XPath 1.0 has no escape sequence.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts = value
        .split('\'')
        .map(|p| format!("'{}'", p))
        .collect::<Vec<_>>();
    format!("concat({})", parts.join(", \"'\", "))
}

// ============================================================================
// Tagged result handed to presentation
// ============================================================================

/// What the caller displays or copies: a bare identifier or a locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocatorResult {
    Identifier(String),
    Locator(String),
}

impl LocatorResult {
    pub fn as_str(&self) -> &str {
        match self {
            LocatorResult::Identifier(s) | LocatorResult::Locator(s) => s,
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, LocatorResult::Identifier(_))
    }
}

impl fmt::Display for LocatorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
