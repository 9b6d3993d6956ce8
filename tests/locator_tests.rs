mod common;

use common::utils::{el, nth_tag, page_with_body, text};
use element_locator::locator::evaluate::{evaluate, resolves_uniquely};
use element_locator::locator::locator_model::{
    Locator, LocatorResult, Predicate, Step, xpath_literal,
};

// =========================================================================
// Rendering
// =========================================================================

#[test]
fn xpath_literal_picks_a_quote_style() {
    assert_eq!(xpath_literal("plain"), "'plain'");
    assert_eq!(xpath_literal("it's"), "\"it's\"");
    assert_eq!(xpath_literal("say \"hi\""), "'say \"hi\"'");
    assert_eq!(xpath_literal("a'b\"c"), "concat('a', \"'\", 'b\"c')");
    assert_eq!(xpath_literal(""), "''");
}

#[test]
fn locators_render_as_xpath() {
    let element = Locator::element(
        "li",
        vec![
            Predicate::attr_equals("name", "x"),
            Predicate::attr_contains("class", "item"),
        ],
    );
    assert_eq!(element.to_string(), "//li[@name='x' and contains(@class,'item')]");
    assert_eq!(
        element.clone().nth(2).to_string(),
        "(//li[@name='x' and contains(@class,'item')])[2]"
    );

    let mut indexed = Step::new("li");
    indexed.position = Some(3);
    let path = Locator::Path(vec![
        Step::with_predicates("div", vec![Predicate::attr_equals("id", "main")]),
        Step::new("ul"),
        indexed,
    ]);
    assert_eq!(path.to_string(), "//div[@id='main']/ul/li[3]");

    assert_eq!(Locator::Path(vec![]).to_string(), "//*");
    assert_eq!(
        Locator::element("p", vec![Predicate::text_equals("Hi")]).to_string(),
        "//p[text()='Hi']"
    );
}

#[test]
fn locator_result_tags_its_kind() {
    let id = LocatorResult::Identifier("login".into());
    let xpath = LocatorResult::Locator("//a".into());
    assert!(id.is_identifier());
    assert!(!xpath.is_identifier());
    assert_eq!(xpath.as_str(), "//a");
    assert_eq!(
        serde_json::to_value(&id).unwrap(),
        serde_json::json!({ "kind": "identifier", "value": "login" })
    );
}

// =========================================================================
// Evaluation
// =========================================================================

#[test]
fn evaluate_returns_matches_in_document_order() {
    let page = page_with_body(vec![
        el("li", &[("class", "item first")], vec![]),
        el("div", &[], vec![el("li", &[("class", "item")], vec![])]),
        el("li", &[("class", "other")], vec![]),
    ]);
    let doc = &page.document;
    let items = Locator::element("li", vec![Predicate::attr_contains("class", "item")]);

    assert_eq!(
        evaluate(&items, doc),
        vec![nth_tag(doc, "li", 0), nth_tag(doc, "li", 1)]
    );
    assert_eq!(evaluate(&items.clone().nth(2), doc), vec![nth_tag(doc, "li", 1)]);
    assert!(evaluate(&items.clone().nth(3), doc).is_empty());
    assert!(evaluate(&items.nth(0), doc).is_empty());
}

#[test]
fn missing_attribute_counts_as_empty_string() {
    let page = page_with_body(vec![
        el("img", &[("src", "/a/")], vec![]),
        el("img", &[], vec![]),
    ]);
    let doc = &page.document;

    let empty_contains = Locator::element("img", vec![Predicate::attr_contains("src", "")]);
    assert_eq!(evaluate(&empty_contains, doc).len(), 2);

    let empty_equals = Locator::element("img", vec![Predicate::attr_equals("alt", "")]);
    assert!(evaluate(&empty_equals, doc).is_empty());
}

#[test]
fn text_predicate_checks_each_text_node() {
    let page = page_with_body(vec![
        el("p", &[], vec![text("A"), el("b", &[], vec![]), text("B")]),
        el("p", &[], vec![text("AB")]),
    ]);
    let doc = &page.document;

    let ab = Locator::element("p", vec![Predicate::text_equals("AB")]);
    assert_eq!(evaluate(&ab, doc), vec![nth_tag(doc, "p", 1)]);
    let b = Locator::element("p", vec![Predicate::text_equals("B")]);
    assert_eq!(evaluate(&b, doc), vec![nth_tag(doc, "p", 0)]);
}

#[test]
fn positional_step_selects_same_tag_sibling() {
    let page = page_with_body(vec![el(
        "ul",
        &[],
        vec![
            el("li", &[], vec![]),
            el("span", &[], vec![]),
            el("li", &[], vec![]),
        ],
    )]);
    let doc = &page.document;

    let mut second = Step::new("li");
    second.position = Some(2);
    let path = Locator::Path(vec![Step::new("ul"), second]);
    assert!(resolves_uniquely(&path, doc, nth_tag(doc, "li", 1)));

    let wildcard = Locator::Path(vec![Step::new("ul"), Step::new("*")]);
    assert_eq!(evaluate(&wildcard, doc).len(), 3);
}
