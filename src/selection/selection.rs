use crate::augment::augment::SemanticAugmenter;
use crate::dom::dom_model::{DocumentTree, ElementRef};
use crate::locator::locator_model::LocatorResult;
use crate::locator::synthesizer::{Tier, synthesize_locator};
use crate::selection::selection_model::{
    ElementSummary, LocatedElement, LocatorSource, SUMMARY_TEXT_LENGTH, SelectionMode,
    SelectionOptions, SelectionOutcome,
};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Turns a user's click into a locator.
///
/// Holds configuration only. Toggle state arrives with each call as a
/// `SelectionMode`, and every call re-reads the document.
pub struct SelectionHandler {
    pub options: SelectionOptions,
    augmenter: Option<SemanticAugmenter>,
}

impl SelectionHandler {
    pub fn new(options: SelectionOptions) -> Self {
        Self {
            options,
            augmenter: None,
        }
    }

    pub fn with_augmenter(mut self, augmenter: SemanticAugmenter) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    pub fn handle(
        &self,
        mode: SelectionMode,
        element: ElementRef,
        document: &DocumentTree,
        tracer: &TraceLogger,
    ) -> SelectionOutcome {
        let fingerprint = if tracer.is_enabled() {
            document.fingerprint()
        } else {
            String::new()
        };
        let trace = TraceEvent::now(&fingerprint, document.tag(element).unwrap_or(""));

        if !mode.active {
            tracer.log(&trace.with_decision("inactive"));
            return SelectionOutcome::Inactive;
        }
        if self.is_overlay(element, document) {
            tracer.log(&trace.with_decision("overlay_click"));
            return SelectionOutcome::OverlayClick;
        }

        let summary = summarize(element, document);
        let mut augmentation_error = None;

        if mode.ai_enabled {
            if let Some(augmenter) = &self.augmenter {
                match augmenter.suggest(element, document) {
                    Ok(result) => {
                        tracer.log(
                            &trace
                                .with_decision("augmented")
                                .with_locator(&result),
                        );
                        return SelectionOutcome::Located(LocatedElement {
                            summary,
                            result,
                            source: LocatorSource::Augmented,
                            tier: None,
                            augmentation_error: None,
                            highlight_duration_ms: self.options.highlight_duration_ms,
                        });
                    }
                    Err(e) => augmentation_error = Some(e.to_string()),
                }
            }
        }

        let synthesized = synthesize_locator(element, document, &self.options.synthesis);
        let result = match document.non_blank_attr(element, "id") {
            Some(id) if self.options.prefer_identifier && synthesized.tier == Tier::Identity => {
                LocatorResult::Identifier(id.to_string())
            }
            _ => LocatorResult::Locator(synthesized.locator.to_string()),
        };

        let mut event = trace
            .with_decision("synthesized")
            .with_tier(synthesized.tier)
            .with_locator(&result)
            .with_matches(synthesized.matches);
        if let Some(e) = &augmentation_error {
            event = event.with_error(e);
        }
        tracer.log(&event);

        SelectionOutcome::Located(LocatedElement {
            summary,
            result,
            source: LocatorSource::Synthesized,
            tier: Some(synthesized.tier),
            augmentation_error,
            highlight_duration_ms: self.options.highlight_duration_ms,
        })
    }

    /// True if the element or an ancestor below `body` belongs to the tool's overlay.
    pub fn is_overlay(&self, element: ElementRef, document: &DocumentTree) -> bool {
        let mut current = Some(element);
        while let Some(node) = current {
            if document.tag(node) == Some("body") {
                return false;
            }
            let is_panel = document.attr(node, "id") == Some(self.options.overlay_id.as_str());
            let is_injected = document
                .class_tokens(node)
                .contains(&self.options.overlay_class.as_str());
            if is_panel || is_injected {
                return true;
            }
            current = document.parent_element(node);
        }
        false
    }
}

pub fn summarize(element: ElementRef, document: &DocumentTree) -> ElementSummary {
    let text = document.text_content(element);
    ElementSummary {
        tag: document.tag(element).unwrap_or("").to_string(),
        id: document.non_blank_attr(element, "id").map(str::to_string),
        class: document.non_blank_attr(element, "class").map(str::to_string),
        text: text.trim().chars().take(SUMMARY_TEXT_LENGTH).collect(),
        attributes: document
            .attributes(element)
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default(),
    }
}
