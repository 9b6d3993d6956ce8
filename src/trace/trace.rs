use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::locator::synthesizer::Tier;

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// First line written for each command run.
#[derive(Debug, Serialize)]
pub struct RunHeader {
    pub run: String,
    pub timestamp_ms: u128,
    pub snapshot: String,
    pub document: String,
    pub elements: usize,
}

impl RunHeader {
    pub fn new(run: &str, snapshot: &str, document: &str, elements: usize) -> Self {
        Self {
            run: run.to_string(),
            timestamp_ms: now_ms(),
            snapshot: snapshot.to_string(),
            document: document.to_string(),
            elements,
        }
    }
}

/// One line of the synthesis trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,

    /// SHA-1 of the document the locator was computed against.
    pub document: String,
    pub tag: String,

    pub decision: Option<String>,
    pub tier: Option<String>,
    pub locator: Option<String>,
    pub matches: Option<usize>,

    pub error: Option<String>,
}

impl TraceEvent {
    pub fn now(document: &str, tag: &str) -> Self {
        Self {
            timestamp_ms: now_ms(),
            document: document.to_string(),
            tag: tag.to_string(),
            decision: None,
            tier: None,
            locator: None,
            matches: None,
            error: None,
        }
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(format!("{:?}", tier));
        self
    }

    pub fn with_locator(mut self, locator: impl ToString) -> Self {
        self.locator = Some(locator.to_string());
        self
    }

    pub fn with_matches(mut self, matches: Option<usize>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
