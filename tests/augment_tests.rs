mod common;

use common::utils::{el, nth_tag, page_with_body, text};
use element_locator::augment::ai_model::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiBackend, TextInference, extract_generated_text,
    generate_request_body, is_api_key_configured,
};
use element_locator::augment::augment::{
    AugmentRequest, SemanticAugmenter, build_prompt, classify_token, interpret_response,
};
use element_locator::augment::error::AugmentError;
use element_locator::locator::locator_model::LocatorResult;

// =========================================================================
// Response interpretation
// =========================================================================

#[test]
fn classify_token_uses_locator_markers() {
    assert_eq!(
        classify_token("//button[text()='Login']"),
        LocatorResult::Locator("//button[text()='Login']".into())
    );
    assert_eq!(classify_token("input[@x]"), LocatorResult::Locator("input[@x]".into()));
    assert_eq!(classify_token("login-btn"), LocatorResult::Identifier("login-btn".into()));
}

#[test]
fn interpret_response_prefers_first_locator_line() {
    let text = "Login Button\n//button[text()='Login']\n//button[2]";
    assert_eq!(
        interpret_response(text),
        Some(LocatorResult::Locator("//button[text()='Login']".into()))
    );
}

#[test]
fn interpret_response_takes_last_line_as_identifier() {
    assert_eq!(
        interpret_response("Submit Button\n\n  submit-btn  \n"),
        Some(LocatorResult::Identifier("submit-btn".into()))
    );
}

#[test]
fn bracketed_description_line_is_not_the_answer() {
    assert_eq!(
        interpret_response("[Login Button]\nlogin-btn"),
        Some(LocatorResult::Identifier("login-btn".into()))
    );
    assert_eq!(
        interpret_response("[Login Button]\n//button[@id='login-btn']"),
        Some(LocatorResult::Locator("//button[@id='login-btn']".into()))
    );
    assert_eq!(
        interpret_response("Result list [2 items]\n(//li[@class='row'])[2]"),
        Some(LocatorResult::Locator("(//li[@class='row'])[2]".into()))
    );
    assert_eq!(interpret_response("[Login Button]"), None);
}

#[test]
fn interpret_response_strips_code_fences() {
    let text = "```xpath\n`//input[@name='q']`\n```";
    assert_eq!(
        interpret_response(text),
        Some(LocatorResult::Locator("//input[@name='q']".into()))
    );
    assert_eq!(interpret_response("  \n```\n```"), None);
}

// =========================================================================
// Gemini wire format
// =========================================================================

#[test]
fn request_body_wraps_prompt() {
    let body = generate_request_body("hello");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
}

#[test]
fn extract_generated_text_reads_first_part() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"//a"},{"text":"ignored"}]}}]}"#;
    assert_eq!(extract_generated_text(body).unwrap(), "//a");
}

#[test]
fn extract_generated_text_reports_failures() {
    assert!(matches!(
        extract_generated_text("<html>oops</html>"),
        Err(AugmentError::MalformedBody { .. })
    ));
    assert!(matches!(
        extract_generated_text(r#"{"candidates":[]}"#),
        Err(AugmentError::EmptyResponse)
    ));
    assert!(matches!(
        extract_generated_text(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
        Err(AugmentError::EmptyResponse)
    ));
}

#[test]
fn api_key_placeholder_is_not_configured() {
    assert!(!is_api_key_configured(""));
    assert!(!is_api_key_configured("   "));
    assert!(!is_api_key_configured("GEMINI_API_KEY"));
    assert!(is_api_key_configured("abc123"));
}

#[test]
fn unconfigured_backend_fails_without_network() {
    let backend = GeminiBackend::default();
    assert!(!backend.is_configured());
    let err = backend.infer_text("prompt").unwrap_err();
    assert!(matches!(err, AugmentError::NotConfigured));
    assert!(err.to_string().contains("not configured"));
}

#[test]
fn endpoint_joins_base_and_model() {
    let backend = GeminiBackend::new(&format!("{}/", DEFAULT_BASE_URL), DEFAULT_MODEL, "k");
    assert_eq!(
        backend.endpoint(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
    );
}

#[test]
fn status_error_shows_code_and_body() {
    let err = AugmentError::Status {
        status: 403,
        body: "forbidden".into(),
    };
    assert_eq!(err.to_string(), "Text model API error (403):\nforbidden");
}

// =========================================================================
// Prompt and suggestion
// =========================================================================

#[test]
fn prompt_embeds_html_and_context() {
    let page = page_with_body(vec![
        el("li", &[("class", "row")], vec![]),
        el("li", &[("class", "row")], vec![]),
    ]);
    let doc = &page.document;
    let request = AugmentRequest::for_element(nth_tag(doc, "li", 1), doc);
    let prompt = build_prompt(&request).unwrap();

    assert!(prompt.contains("<li class=\"row\"></li>"));
    assert!(prompt.contains("STRUCTURAL CONTEXT"));
    assert!(prompt.contains("\"needs_indexing\": true"));
    assert!(prompt.contains("2 of 2 similar elements"));
}

#[test]
fn prompt_says_when_no_index_is_needed() {
    let page = page_with_body(vec![el("h1", &[], vec![text("Title")])]);
    let doc = &page.document;
    let request = AugmentRequest::for_element(nth_tag(doc, "h1", 0), doc);
    let prompt = build_prompt(&request).unwrap();
    assert!(prompt.contains("no position index is needed"));
}

#[test]
fn mock_augmenter_suggests_from_response() {
    let page = page_with_body(vec![el("button", &[], vec![text("Login")])]);
    let doc = &page.document;
    let button = nth_tag(doc, "button", 0);

    let augmenter = SemanticAugmenter::with_mock_response("Login Button\n//button[text()='Login']");
    assert_eq!(
        augmenter.suggest(button, doc).unwrap(),
        LocatorResult::Locator("//button[text()='Login']".into())
    );

    let augmenter =
        SemanticAugmenter::with_mock_response("[Login Button]\n//button[@id='login-btn']");
    assert_eq!(
        augmenter.suggest(button, doc).unwrap(),
        LocatorResult::Locator("//button[@id='login-btn']".into())
    );

    let augmenter = SemanticAugmenter::with_mock_response("login");
    assert_eq!(
        augmenter.suggest(button, doc).unwrap(),
        LocatorResult::Identifier("login".into())
    );
}

#[test]
fn blank_model_output_is_empty_response() {
    let page = page_with_body(vec![el("p", &[], vec![])]);
    let doc = &page.document;
    let augmenter = SemanticAugmenter::with_mock_response("\n  \n");
    assert!(matches!(
        augmenter.suggest(nth_tag(doc, "p", 0), doc),
        Err(AugmentError::EmptyResponse)
    ));
}
