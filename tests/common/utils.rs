use element_locator::dom::dom_model::{DocumentTree, NodeId};
use element_locator::dom::snapshot::{LoadedPage, PageSnapshot};
use serde_json::{Value, json};

/// Element node in snapshot JSON.
pub fn el(tag: &str, attrs: &[(&str, &str)], children: Vec<Value>) -> Value {
    let attributes: Vec<Value> = attrs.iter().map(|(n, v)| json!([n, v])).collect();
    json!({ "tag": tag, "attributes": attributes, "children": children })
}

/// Text node in snapshot JSON.
pub fn text(s: &str) -> Value {
    json!({ "text": s })
}

/// `<html><body>...children...</body></html>`
pub fn page_with_body(children: Vec<Value>) -> LoadedPage {
    load(el("html", &[], vec![el("body", &[], children)]))
}

pub fn load(root: Value) -> LoadedPage {
    let snapshot = PageSnapshot {
        url: Some("https://example.com".into()),
        title: "Test".into(),
        root: serde_json::from_value(root).expect("valid snapshot node"),
    };
    snapshot.into_page().expect("element root")
}

/// First element whose `name` attribute equals `value`.
pub fn by_attr(doc: &DocumentTree, name: &str, value: &str) -> NodeId {
    doc.elements()
        .into_iter()
        .find(|id| doc.attr(*id, name) == Some(value))
        .unwrap_or_else(|| panic!("no element with {}='{}'", name, value))
}

/// The n-th (0-based) element with `tag`, in document order.
pub fn nth_tag(doc: &DocumentTree, tag: &str, n: usize) -> NodeId {
    doc.elements_by_tag(tag)[n]
}
