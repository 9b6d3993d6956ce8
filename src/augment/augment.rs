use serde::Serialize;

use crate::augment::ai_model::{MockTextInference, TextInference};
use crate::augment::error::AugmentError;
use crate::context::compute::compute_context;
use crate::context::context_model::ElementContext;
use crate::dom::dom_model::{DocumentTree, ElementRef};
use crate::locator::locator_model::LocatorResult;

/// Characters whose presence marks a response as a locator rather than an id.
const LOCATOR_MARKERS: [&str; 4] = ["//", "[", "]", "@"];

/// Payload describing one element to the text model.
#[derive(Debug, Clone, Serialize)]
pub struct AugmentRequest {
    pub outer_html: String,
    pub context: ElementContext,
}

impl AugmentRequest {
    pub fn for_element(element: ElementRef, document: &DocumentTree) -> Self {
        Self {
            outer_html: document.outer_html(element),
            context: compute_context(element, document),
        }
    }
}

/// Build the single-element prompt, embedding the structural hints so the
/// model can prefer short locators that stay unambiguous.
pub fn build_prompt(request: &AugmentRequest) -> Result<String, AugmentError> {
    let context_json =
        serde_json::to_string_pretty(&request.context).map_err(|e| AugmentError::Serialize {
            context: "element context".into(),
            source: e,
        })?;

    let indexing_hint = if request.context.position.needs_indexing {
        format!(
            "The element is {} of {} similar elements; include a position if nothing else tells them apart.",
            request.context.position.index, request.context.position.total
        )
    } else {
        "The element has no similar elements on the page; no position index is needed.".to_string()
    };

    Ok(format!(
        r#"You're an expert in XPath generation for UI test automation.

For the following single HTML element, return either its stable id (if it has one)
or the shortest XPath expression that selects exactly this element.

Output format:
[Element Description]
<id or XPath>

Example:
Login Button
//button[text()='Login']

{hint}

STRUCTURAL CONTEXT:
{context}

Here is the HTML element:

{html}"#,
        hint = indexing_hint,
        context = context_json,
        html = request.outer_html,
    ))
}

/// Classify a single response token. Best-effort, not a grammar: anything
/// without `//`, `[`, `]` or `@` is taken as a bare identifier.
pub fn classify_token(token: &str) -> LocatorResult {
    if LOCATOR_MARKERS.iter().any(|m| token.contains(m)) {
        LocatorResult::Locator(token.to_string())
    } else {
        LocatorResult::Identifier(token.to_string())
    }
}

/// Pull the answer out of free text: the first line that starts like an
/// XPath expression, otherwise the last remaining line, classified with
/// `classify_token`. Description lines written as `[...]` are skipped.
pub fn interpret_response(text: &str) -> Option<LocatorResult> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with("```"))
        .map(|l| l.trim_matches('`').trim())
        .filter(|l| !l.is_empty() && !is_bracketed_description(l))
        .collect();

    lines
        .iter()
        .find(|l| starts_like_xpath(l))
        .or_else(|| lines.last())
        .map(|l| classify_token(l))
}

/// `[Login Button]`: the description line of the requested output format.
fn is_bracketed_description(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}

fn starts_like_xpath(line: &str) -> bool {
    line.starts_with('/') || line.starts_with('(') || line.starts_with("./")
}

// ============================================================================
// SemanticAugmenter: asks a TextInference backend for an id or locator
// ============================================================================

pub struct SemanticAugmenter {
    backend: Box<dyn TextInference>,
}

impl SemanticAugmenter {
    pub fn new(backend: Box<dyn TextInference>) -> Self {
        Self { backend }
    }

    /// Augmenter backed by a `MockTextInference` with a canned response.
    pub fn with_mock_response(response: &str) -> Self {
        Self {
            backend: Box::new(MockTextInference {
                response: response.to_string(),
            }),
        }
    }

    pub fn suggest(
        &self,
        element: ElementRef,
        document: &DocumentTree,
    ) -> Result<LocatorResult, AugmentError> {
        let request = AugmentRequest::for_element(element, document);
        let prompt = build_prompt(&request)?;
        let response = self.backend.infer_text(&prompt)?;
        interpret_response(&response).ok_or(AugmentError::EmptyResponse)
    }
}
