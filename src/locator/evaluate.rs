use std::collections::HashSet;

use crate::dom::dom_model::{DocumentTree, NodeId};
use crate::locator::locator_model::{Locator, Predicate, Step};

/// Every element `locator` selects, in document order.
///
/// Covers only the expressions the synthesizer produces. Detached nodes are
/// never returned.
pub fn evaluate(locator: &Locator, document: &DocumentTree) -> Vec<NodeId> {
    match locator {
        Locator::Path(steps) => evaluate_path(steps, document),
        Locator::Nth { base, position } => {
            let matches = evaluate(base, document);
            position
                .checked_sub(1)
                .and_then(|i| matches.get(i).copied())
                .into_iter()
                .collect()
        }
    }
}

/// True if `locator` selects `target` and nothing else.
pub fn resolves_uniquely(locator: &Locator, document: &DocumentTree, target: NodeId) -> bool {
    evaluate(locator, document) == [target]
}

fn evaluate_path(steps: &[Step], document: &DocumentTree) -> Vec<NodeId> {
    let Some((first, rest)) = steps.split_first() else {
        return Vec::new();
    };

    let order = document.elements();
    let mut current: Vec<NodeId> = order
        .iter()
        .copied()
        .filter(|id| step_matches(first, *id, document))
        .collect();

    for step in rest {
        let next: HashSet<NodeId> = current
            .iter()
            .flat_map(|id| document.element_children(*id))
            .filter(|child| step_matches(step, *child, document))
            .collect();
        current = order.iter().copied().filter(|id| next.contains(id)).collect();
        if current.is_empty() {
            break;
        }
    }

    current
}

fn step_matches(step: &Step, id: NodeId, document: &DocumentTree) -> bool {
    let tag_ok = step.tag == "*" || document.tag(id) == Some(step.tag.as_str());
    tag_ok
        && step
            .predicates
            .iter()
            .all(|p| predicate_matches(p, id, document))
        && step
            .position
            .is_none_or(|n| document.same_tag_ordinal(id) == n)
}

fn predicate_matches(predicate: &Predicate, id: NodeId, document: &DocumentTree) -> bool {
    match predicate {
        Predicate::AttrEquals { name, value } => document.attr(id, name) == Some(value.as_str()),
        // A missing attribute compares as the empty string.
        Predicate::AttrContains { name, value } => document
            .attr(id, name)
            .unwrap_or("")
            .contains(value.as_str()),
        Predicate::TextEquals(text) => document.direct_text_nodes(id).any(|t| t == text),
    }
}
