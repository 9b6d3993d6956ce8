use std::collections::HashSet;

use crate::context::context_model::{
    ElementContext, ParentInfo, Position, SiblingInfo, UNIQUE_CLASS_MARKER,
};
use crate::dom::dom_model::{DocumentTree, ElementRef, NodeId};

/// Attributes reported in `unique_attributes` when present and non-blank.
pub const CONTEXT_ATTRIBUTES: [&str; 10] = [
    "id",
    "data-testid",
    "data-test",
    "aria-label",
    "name",
    "title",
    "alt",
    "href",
    "src",
    "placeholder",
];

/// Longest class token considered as a unique-class candidate.
pub const MAX_UNIQUE_CLASS_LENGTH: usize = 15;

// Generated by component frameworks or CSS-in-JS.
const NOISE_CLASS_PREFIXES: [&str; 6] = ["ng-", "css-", "jsx-", "sc-", "svelte-", "_"];
// Utility-framework variants (`md:flex`), arbitrary values (`w-[3px]`), fractions, BEM internals.
const NOISE_CLASS_MARKERS: [&str; 5] = [":", "[", "]", "/", "__"];

/// Compute structural hints for `element` by scanning the whole document.
///
/// Nothing is cached; two calls on an unchanged document give equal results.
/// An element that is not reachable from the root gets `index == 0` in its
/// position, since it is not part of any document-wide set.
pub fn compute_context(element: ElementRef, document: &DocumentTree) -> ElementContext {
    ElementContext {
        position: position_among_similar(element, document),
        parent_info: parent_info(element, document),
        sibling_info: sibling_info(element, document),
        unique_attributes: Vec::new(),
        unique_class: None,
    }
    .with_unique_attributes(element, document)
}

impl ElementContext {
    fn with_unique_attributes(mut self, element: ElementRef, document: &DocumentTree) -> Self {
        self.unique_attributes = CONTEXT_ATTRIBUTES
            .iter()
            .filter(|name| document.non_blank_attr(element, name).is_some())
            .map(|name| name.to_string())
            .collect();

        self.unique_class = unique_class(element, document);
        if self.unique_class.is_some() {
            self.unique_attributes.push(UNIQUE_CLASS_MARKER.to_string());
        }
        self
    }
}

// ---- Similar elements ----

fn position_among_similar(element: ElementRef, document: &DocumentTree) -> Position {
    let Some(tag) = document.tag(element) else {
        return Position {
            index: 0,
            total: 0,
            needs_indexing: false,
        };
    };

    let text = document.text_content(element);
    let text = text.trim();

    let (index, total) = if !text.is_empty() {
        similar_by_text(element, document, tag, text)
    } else if let Some(class) = document.non_blank_attr(element, "class") {
        similar_by_class(element, document, tag, class)
    } else {
        let same_tag = document.elements_by_tag(tag);
        (ordinal_of(element, &same_tag), same_tag.len())
    };

    Position {
        index,
        total,
        needs_indexing: total > 1,
    }
}

/// Same tag and same trimmed text, with indistinguishable repeats collapsed.
fn similar_by_text(
    element: ElementRef,
    document: &DocumentTree,
    tag: &str,
    text: &str,
) -> (usize, usize) {
    let key_of = |id: NodeId| -> (String, String, String) {
        (
            document.attr(id, "class").unwrap_or("").to_string(),
            document.attr(id, "id").unwrap_or("").to_string(),
            document.text_content(id).trim().to_string(),
        )
    };

    let mut seen = HashSet::new();
    let keys: Vec<(String, String, String)> = document
        .elements_by_tag(tag)
        .into_iter()
        .filter(|id| document.text_content(*id).trim() == text)
        .map(key_of)
        .filter(|key| seen.insert(key.clone()))
        .collect();

    let index = if document.is_connected(element) {
        let target_key = key_of(element);
        keys.iter()
            .position(|k| *k == target_key)
            .map(|i| i + 1)
            .unwrap_or(0)
    } else {
        0
    };
    (index, keys.len())
}

/// Same tag and every class of the element. Falls back to tag only when a
/// class token could not be written as a plain CSS class selector.
fn similar_by_class(
    element: ElementRef,
    document: &DocumentTree,
    tag: &str,
    class: &str,
) -> (usize, usize) {
    let tokens: Vec<&str> = class.split_whitespace().collect();
    let same_tag = document.elements_by_tag(tag);

    let similar: Vec<NodeId> = if tokens.iter().all(|t| is_plain_class_name(t)) {
        same_tag
            .into_iter()
            .filter(|id| {
                let own = document.class_tokens(*id);
                tokens.iter().all(|t| own.contains(t))
            })
            .collect()
    } else {
        same_tag
    };

    (ordinal_of(element, &similar), similar.len())
}

fn ordinal_of(element: ElementRef, set: &[NodeId]) -> usize {
    set.iter()
        .position(|id| *id == element)
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Class token usable in a selector without escaping.
fn is_plain_class_name(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if first.is_ascii_digit() {
        return false;
    }
    if first == '-' && token[1..].starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ---- Parent and siblings ----

fn parent_info(element: ElementRef, document: &DocumentTree) -> Option<ParentInfo> {
    let parent = document.parent_element(element)?;
    let id = document.non_blank_attr(parent, "id").map(str::to_string);
    let class = document.non_blank_attr(parent, "class").map(str::to_string);
    Some(ParentInfo {
        tag: document.tag(parent)?.to_string(),
        has_id: id.is_some(),
        has_class: class.is_some(),
        id,
        class,
    })
}

fn sibling_info(element: ElementRef, document: &DocumentTree) -> SiblingInfo {
    let total = match document.parent_element(element) {
        Some(parent) => {
            let tag = document.tag(element);
            document
                .element_children(parent)
                .filter(|c| document.tag(*c) == tag)
                .count()
        }
        None => 1,
    };
    SiblingInfo {
        index: document.same_tag_ordinal(element),
        total,
        needs_sibling_indexing: total > 1,
    }
}

// ---- Unique class ----

/// Shortest, rarest non-noise class that matches exactly one element.
fn unique_class(element: ElementRef, document: &DocumentTree) -> Option<String> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<(&str, usize)> = document
        .class_tokens(element)
        .into_iter()
        .filter(|t| t.chars().count() <= MAX_UNIQUE_CLASS_LENGTH && !is_noise_class(t))
        .filter(|t| seen.insert(*t))
        .map(|t| (t, class_frequency(document, t)))
        .collect();

    candidates.sort_by_key(|(t, freq)| (t.chars().count(), *freq));
    candidates
        .into_iter()
        .find(|(_, freq)| *freq == 1)
        .map(|(t, _)| t.to_string())
}

fn is_noise_class(token: &str) -> bool {
    NOISE_CLASS_PREFIXES.iter().any(|p| token.starts_with(p))
        || NOISE_CLASS_MARKERS.iter().any(|m| token.contains(m))
}

fn class_frequency(document: &DocumentTree, token: &str) -> usize {
    document
        .elements()
        .into_iter()
        .filter(|id| document.class_tokens(*id).contains(&token))
        .count()
}
