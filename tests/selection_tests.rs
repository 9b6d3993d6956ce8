mod common;

use common::utils::{by_attr, el, nth_tag, page_with_body, text};
use element_locator::augment::ai_model::{GeminiBackend, TextInference};
use element_locator::augment::augment::SemanticAugmenter;
use element_locator::augment::error::AugmentError;
use element_locator::locator::locator_model::LocatorResult;
use element_locator::locator::synthesizer::Tier;
use element_locator::selection::selection::{SelectionHandler, summarize};
use element_locator::selection::selection_model::{
    LocatedElement, LocatorSource, SUMMARY_TEXT_LENGTH, SelectionMode, SelectionOptions,
    SelectionOutcome,
};
use element_locator::trace::logger::TraceLogger;

const ACTIVE: SelectionMode = SelectionMode {
    active: true,
    ai_enabled: false,
};
const ACTIVE_AI: SelectionMode = SelectionMode {
    active: true,
    ai_enabled: true,
};

struct FailingBackend;

impl TextInference for FailingBackend {
    fn infer_text(&self, _prompt: &str) -> Result<String, AugmentError> {
        Err(AugmentError::Status {
            status: 500,
            body: "boom".into(),
        })
    }
}

fn located(outcome: SelectionOutcome) -> LocatedElement {
    match outcome {
        SelectionOutcome::Located(l) => l,
        other => panic!("Expected Located, got {:?}", other),
    }
}

// =========================================================================
// Mode and overlay
// =========================================================================

#[test]
fn inactive_mode_ignores_clicks() {
    let page = page_with_body(vec![el("button", &[("id", "go")], vec![])]);
    let doc = &page.document;
    let handler = SelectionHandler::new(SelectionOptions::default());
    let outcome = handler.handle(
        SelectionMode::default(),
        nth_tag(doc, "button", 0),
        doc,
        &TraceLogger::disabled(),
    );
    assert_eq!(outcome, SelectionOutcome::Inactive);
}

#[test]
fn clicks_on_overlay_are_ignored() {
    let page = page_with_body(vec![
        el(
            "div",
            &[("id", "xpath-result-panel")],
            vec![el("button", &[("id", "copy")], vec![text("Copy")])],
        ),
        el("span", &[("class", "badge xpath-extension-element")], vec![]),
        el("p", &[("id", "content")], vec![]),
    ]);
    let doc = &page.document;
    let handler = SelectionHandler::new(SelectionOptions::default());
    let tracer = TraceLogger::disabled();

    for target in [by_attr(doc, "id", "copy"), nth_tag(doc, "span", 0)] {
        assert_eq!(
            handler.handle(ACTIVE, target, doc, &tracer),
            SelectionOutcome::OverlayClick
        );
    }
    assert!(!handler.is_overlay(by_attr(doc, "id", "content"), doc));
}

// =========================================================================
// Synthesis path
// =========================================================================

#[test]
fn synthesized_locator_with_summary() {
    let long_text = "x".repeat(80);
    let page = page_with_body(vec![el(
        "p",
        &[("class", "intro"), ("data-role", "lead")],
        vec![text(&format!("  {}  ", long_text))],
    )]);
    let doc = &page.document;
    let handler = SelectionHandler::new(SelectionOptions::default());

    let l = located(handler.handle(ACTIVE, nth_tag(doc, "p", 0), doc, &TraceLogger::disabled()));
    assert_eq!(l.source, LocatorSource::Synthesized);
    assert!(l.tier.is_some());
    assert!(l.augmentation_error.is_none());
    assert_eq!(l.highlight_duration_ms, 2000);
    assert_eq!(l.summary.text.chars().count(), SUMMARY_TEXT_LENGTH);
    assert_eq!(l.summary.class.as_deref(), Some("intro"));
    assert_eq!(
        l.summary.attributes,
        vec![
            ("class".to_string(), "intro".to_string()),
            ("data-role".to_string(), "lead".to_string())
        ]
    );
}

#[test]
fn identifier_reported_only_when_preferred() {
    let page = page_with_body(vec![el("input", &[("id", "email")], vec![])]);
    let doc = &page.document;
    let input = nth_tag(doc, "input", 0);
    let tracer = TraceLogger::disabled();

    let plain = located(SelectionHandler::new(SelectionOptions::default()).handle(ACTIVE, input, doc, &tracer));
    assert_eq!(plain.result, LocatorResult::Locator("//input[@id='email']".into()));
    assert_eq!(plain.tier, Some(Tier::Identity));

    let options = SelectionOptions {
        prefer_identifier: true,
        ..SelectionOptions::default()
    };
    let preferred = located(SelectionHandler::new(options).handle(ACTIVE, input, doc, &tracer));
    assert_eq!(preferred.result, LocatorResult::Identifier("email".into()));
}

// =========================================================================
// Augmentation path
// =========================================================================

#[test]
fn augmenter_result_used_when_ai_enabled() {
    let page = page_with_body(vec![el("button", &[], vec![text("Login")])]);
    let doc = &page.document;
    let handler = SelectionHandler::new(SelectionOptions::default())
        .with_augmenter(SemanticAugmenter::with_mock_response("//button[.='Login']"));

    let l = located(handler.handle(ACTIVE_AI, nth_tag(doc, "button", 0), doc, &TraceLogger::disabled()));
    assert_eq!(l.source, LocatorSource::Augmented);
    assert_eq!(l.result, LocatorResult::Locator("//button[.='Login']".into()));
    assert!(l.tier.is_none());
}

#[test]
fn augmenter_skipped_when_ai_disabled() {
    let page = page_with_body(vec![el("button", &[], vec![text("Login")])]);
    let doc = &page.document;
    let handler = SelectionHandler::new(SelectionOptions::default())
        .with_augmenter(SemanticAugmenter::with_mock_response("//button[.='Login']"));

    let l = located(handler.handle(ACTIVE, nth_tag(doc, "button", 0), doc, &TraceLogger::disabled()));
    assert_eq!(l.source, LocatorSource::Synthesized);
    assert_eq!(l.result, LocatorResult::Locator("//button[text()='Login']".into()));
}

#[test]
fn failed_augmentation_falls_back_to_synthesis() {
    let page = page_with_body(vec![el("a", &[("id", "home")], vec![text("Home")])]);
    let doc = &page.document;
    let link = nth_tag(doc, "a", 0);
    let tracer = TraceLogger::disabled();

    let failing = SelectionHandler::new(SelectionOptions::default())
        .with_augmenter(SemanticAugmenter::new(Box::new(FailingBackend)));
    let l = located(failing.handle(ACTIVE_AI, link, doc, &tracer));
    assert_eq!(l.source, LocatorSource::Synthesized);
    assert_eq!(l.result, LocatorResult::Locator("//a[@id='home']".into()));
    assert!(l.augmentation_error.as_deref().unwrap().contains("500"));

    let unconfigured = SelectionHandler::new(SelectionOptions::default())
        .with_augmenter(SemanticAugmenter::new(Box::new(GeminiBackend::default())));
    let l = located(unconfigured.handle(ACTIVE_AI, link, doc, &tracer));
    assert_eq!(l.source, LocatorSource::Synthesized);
    assert!(l.augmentation_error.as_deref().unwrap().contains("not configured"));
}

// =========================================================================
// Trace
// =========================================================================

#[test]
fn each_selection_writes_one_trace_line() {
    let path = std::env::temp_dir().join("element_locator_selection_trace.jsonl");
    let _ = std::fs::remove_file(&path);

    let page = page_with_body(vec![el("button", &[("id", "go")], vec![])]);
    let doc = &page.document;
    let button = nth_tag(doc, "button", 0);
    let handler = SelectionHandler::new(SelectionOptions::default());

    {
        let tracer = TraceLogger::new(path.to_str().unwrap());
        assert!(tracer.is_enabled());
        handler.handle(SelectionMode::default(), button, doc, &tracer);
        handler.handle(ACTIVE, button, doc, &tracer);
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let events: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["decision"], "inactive");
    assert_eq!(events[1]["decision"], "synthesized");
    assert_eq!(events[1]["tier"], "Identity");
    assert_eq!(events[1]["locator"], "//button[@id='go']");
    assert_eq!(events[1]["document"], doc.fingerprint());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn summarize_handles_bare_elements() {
    let page = page_with_body(vec![el("hr", &[], vec![])]);
    let doc = &page.document;
    let summary = summarize(nth_tag(doc, "hr", 0), doc);
    assert_eq!(summary.tag, "hr");
    assert!(summary.id.is_none() && summary.class.is_none());
    assert!(summary.text.is_empty() && summary.attributes.is_empty());
}
