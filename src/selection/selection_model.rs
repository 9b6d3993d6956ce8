use serde::Serialize;

use crate::locator::locator_model::LocatorResult;
use crate::locator::synthesizer::{SynthesisOptions, Tier};

pub const DEFAULT_HIGHLIGHT_DURATION_MS: u64 = 2000;
/// Characters of text shown in the element summary.
pub const SUMMARY_TEXT_LENGTH: usize = 50;

/// Toggles owned by the host and passed in with every selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionMode {
    pub active: bool,
    pub ai_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct SelectionOptions {
    pub synthesis: SynthesisOptions,
    /// Report an element's identifier as `LocatorResult::Identifier`.
    pub prefer_identifier: bool,
    pub highlight_duration_ms: u64,
    /// Id of the tool's own result panel.
    pub overlay_id: String,
    /// Class carried by every element the tool injects into the page.
    pub overlay_class: String,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            synthesis: SynthesisOptions::default(),
            prefer_identifier: false,
            highlight_duration_ms: DEFAULT_HIGHLIGHT_DURATION_MS,
            overlay_id: "xpath-result-panel".to_string(),
            overlay_class: "xpath-extension-element".to_string(),
        }
    }
}

/// What the presentation side shows next to the locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSummary {
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    /// Trimmed text content, cut to `SUMMARY_TEXT_LENGTH` characters.
    pub text: String,
    pub attributes: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocatorSource {
    Synthesized,
    Augmented,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedElement {
    pub summary: ElementSummary,
    pub result: LocatorResult,
    pub source: LocatorSource,
    /// Set when the synthesizer produced the result.
    pub tier: Option<Tier>,
    /// Message from a failed augmentation attempt that was replaced by synthesis.
    pub augmentation_error: Option<String>,
    pub highlight_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Selection mode is off.
    Inactive,
    /// The click landed on the tool's own overlay.
    OverlayClick,
    Located(LocatedElement),
}
