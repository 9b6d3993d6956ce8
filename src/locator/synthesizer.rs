use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{DocumentTree, ElementRef};
use crate::locator::evaluate::evaluate;
use crate::locator::locator_model::{Locator, LocatorResult, Predicate, Step};

pub const DEFAULT_MAX_TEXT_LENGTH: usize = 100;
pub const DEFAULT_MAX_LOCATOR_LENGTH: usize = 500;
pub const MAX_ANCESTOR_DEPTH: usize = 5;

/// Attributes tried by the attribute-combination tier, in priority order.
pub const DISTINGUISHING_ATTRIBUTES: [&str; 8] = [
    "name",
    "data-testid",
    "data-cy",
    "aria-label",
    "title",
    "placeholder",
    "value",
    "alt",
];

/// Elements covered by `locate_interactive`.
pub const INTERACTIVE_TAGS: [&str; 5] = ["input", "button", "a", "select", "textarea"];

// ============================================================================
// Options
// ============================================================================

/// Which identifier values the engine is willing to treat as stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdPolicy {
    #[default]
    TrustAll,
    /// Skip identifiers ending in a digit (`item-4821`), which are often generated.
    RejectTrailingDigits,
}

impl IdPolicy {
    pub fn accepts(&self, id: &str) -> bool {
        match self {
            IdPolicy::TrustAll => true,
            IdPolicy::RejectTrailingDigits => !id.ends_with(|c: char| c.is_ascii_digit()),
        }
    }
}

/// Per-call settings. Passed explicitly; the engine keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Direct text must be shorter than this many characters.
    pub max_text_length: usize,
    /// Verified candidates rendering longer than this are skipped.
    pub max_locator_length: usize,
    pub id_policy: IdPolicy,
    /// Class tokens never used by the attribute-combination tier.
    pub generic_classes: Vec<String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            max_locator_length: DEFAULT_MAX_LOCATOR_LENGTH,
            id_policy: IdPolicy::TrustAll,
            generic_classes: vec!["mat-mdc-card-title".to_string()],
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Stage of the priority chain that produced a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Identity,
    MediaSource,
    PlaceholderClass,
    DirectText,
    AttributeCombination,
    Structural,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub locator: Locator,
    pub tier: Tier,
    /// Matches of the unwrapped candidate; `None` for unverified tiers.
    pub matches: Option<usize>,
}

// ============================================================================
// Synthesis
// ============================================================================

/// Locator string for `element`. Never fails; see `synthesize_locator`.
pub fn synthesize(
    element: ElementRef,
    document: &DocumentTree,
    options: &SynthesisOptions,
) -> String {
    synthesize_locator(element, document, options)
        .locator
        .to_string()
}

/// Run the priority chain and return the first tier that applies.
///
/// Tiers 2 to 5 are checked against the document and wrapped with the
/// element's position when their candidate matches more than one element.
/// The structural fallback always produces a path but is not verified.
pub fn synthesize_locator(
    element: ElementRef,
    document: &DocumentTree,
    options: &SynthesisOptions,
) -> Synthesized {
    let Some(tag) = document.tag(element) else {
        return Synthesized {
            locator: Locator::Path(Vec::new()),
            tier: Tier::Structural,
            matches: None,
        };
    };

    if let Some(id) = identity_value(element, document, options) {
        return Synthesized {
            locator: Locator::element(tag, vec![Predicate::attr_equals("id", id)]),
            tier: Tier::Identity,
            matches: None,
        };
    }

    let verified: [(Tier, CandidateBuilder); 4] = [
        (Tier::MediaSource, media_source_candidate),
        (Tier::PlaceholderClass, placeholder_class_candidate),
        (Tier::DirectText, direct_text_candidate),
        (Tier::AttributeCombination, attribute_candidate),
    ];

    for (tier, build) in verified {
        let Some(candidate) = build(element, document, tag, options) else {
            continue;
        };
        if let Some((locator, matches)) = verify_and_wrap(candidate, element, document, options) {
            return Synthesized {
                locator,
                tier,
                matches: Some(matches),
            };
        }
    }

    Synthesized {
        locator: structural_path(element, document, options),
        tier: Tier::Structural,
        matches: None,
    }
}

/// Like `synthesize`, but reports a usable identifier as `Identifier`.
pub fn synthesize_tagged(
    element: ElementRef,
    document: &DocumentTree,
    options: &SynthesisOptions,
) -> LocatorResult {
    match identity_value(element, document, options) {
        Some(id) => LocatorResult::Identifier(id.to_string()),
        None => LocatorResult::Locator(synthesize(element, document, options)),
    }
}

/// Locator for every input, button, link, select and textarea, in document order.
pub fn locate_interactive(
    document: &DocumentTree,
    options: &SynthesisOptions,
) -> Vec<(ElementRef, String)> {
    document
        .elements()
        .into_iter()
        .filter(|id| {
            document
                .tag(*id)
                .is_some_and(|t| INTERACTIVE_TAGS.contains(&t))
        })
        .map(|id| (id, synthesize(id, document, options)))
        .collect()
}

/// Pick one class token to stand for the whole class list: the first token
/// with a hyphen or longer than five characters, else the first token.
pub fn representative_class<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    tokens
        .iter()
        .copied()
        .find(|t| t.contains('-') || t.chars().count() > 5)
        .or_else(|| tokens.first().copied())
}

type CandidateBuilder = fn(ElementRef, &DocumentTree, &str, &SynthesisOptions) -> Option<Locator>;

fn identity_value<'d>(
    element: ElementRef,
    document: &'d DocumentTree,
    options: &SynthesisOptions,
) -> Option<&'d str> {
    document
        .non_blank_attr(element, "id")
        .filter(|id| options.id_policy.accepts(id))
}

// ---- Tier 2: image source ----

fn media_source_candidate(
    element: ElementRef,
    document: &DocumentTree,
    tag: &str,
    _options: &SynthesisOptions,
) -> Option<Locator> {
    if tag != "img" {
        return None;
    }
    let src = document.non_blank_attr(element, "src")?;
    // Only the last path segment, so hosts and cache directories can change.
    let segment = src.rsplit('/').next().unwrap_or(src);
    Some(Locator::element(
        tag,
        vec![Predicate::attr_contains("src", segment)],
    ))
}

// ---- Tier 3: placeholder + class ----

fn placeholder_class_candidate(
    element: ElementRef,
    document: &DocumentTree,
    tag: &str,
    _options: &SynthesisOptions,
) -> Option<Locator> {
    if !matches!(tag, "input" | "textarea") {
        return None;
    }
    let placeholder = document.non_blank_attr(element, "placeholder")?;
    document.non_blank_attr(element, "class")?;
    let class = representative_class(&document.class_tokens(element))?;
    Some(Locator::element(
        tag,
        vec![
            Predicate::attr_contains("class", class),
            Predicate::attr_equals("placeholder", placeholder),
        ],
    ))
}

// ---- Tier 4: direct text ----

fn direct_text_candidate(
    element: ElementRef,
    document: &DocumentTree,
    tag: &str,
    options: &SynthesisOptions,
) -> Option<Locator> {
    let text = document.direct_text(element);
    if text.is_empty() || text.chars().count() >= options.max_text_length {
        return None;
    }
    Some(Locator::element(tag, vec![Predicate::text_equals(&text)]))
}

// ---- Tier 5: attribute combination ----

fn attribute_candidate(
    element: ElementRef,
    document: &DocumentTree,
    tag: &str,
    options: &SynthesisOptions,
) -> Option<Locator> {
    let mut predicates: Vec<Predicate> = DISTINGUISHING_ATTRIBUTES
        .iter()
        .filter_map(|name| {
            document
                .non_blank_attr(element, name)
                .map(|value| Predicate::attr_equals(name, value.trim()))
        })
        .collect();

    let tokens: Vec<&str> = document
        .class_tokens(element)
        .into_iter()
        .filter(|t| !options.generic_classes.iter().any(|g| g == t))
        .collect();
    if let Some(class) = representative_class(&tokens) {
        predicates.push(Predicate::attr_contains("class", class));
    }

    if predicates.is_empty() {
        return None;
    }
    Some(Locator::element(tag, predicates))
}

// ---- Verification ----

/// Evaluate `candidate`; keep it if it selects only `element`, otherwise wrap
/// it with the element's 1-based position among the matches. Declines when the
/// element is not among the matches or the result is too long.
fn verify_and_wrap(
    candidate: Locator,
    element: ElementRef,
    document: &DocumentTree,
    options: &SynthesisOptions,
) -> Option<(Locator, usize)> {
    let matches = evaluate(&candidate, document);
    let position = matches.iter().position(|m| *m == element)? + 1;

    let locator = if matches.len() == 1 {
        candidate
    } else {
        candidate.nth(position)
    };

    if locator.to_string().chars().count() > options.max_locator_length {
        return None;
    }
    Some((locator, matches.len()))
}

// ---- Tier 6: structural path ----

fn structural_path(
    element: ElementRef,
    document: &DocumentTree,
    options: &SynthesisOptions,
) -> Locator {
    let mut steps = Vec::new();
    let mut current = Some(element);

    while let Some(node) = current {
        if steps.len() >= MAX_ANCESTOR_DEPTH || Some(node) == document.root() {
            break;
        }
        let Some(tag) = document.tag(node) else {
            break;
        };
        if tag == "body" {
            break;
        }

        let mut step = Step::new(tag);
        let id = document
            .attr(node, "id")
            .filter(|id| !id.is_empty() && options.id_policy.accepts(id));
        if let Some(id) = id {
            step.predicates.push(Predicate::attr_equals("id", id));
        } else if let Some(class) = representative_class(&document.class_tokens(node)) {
            step.predicates.push(Predicate::attr_contains("class", class));
        } else {
            let ordinal = document.same_tag_ordinal(node);
            if ordinal > 1 {
                step.position = Some(ordinal);
            }
        }

        steps.push(step);
        current = document.parent_element(node);
    }

    if steps.is_empty() {
        // The element is the body or the document element itself.
        if let Some(tag) = document.tag(element) {
            steps.push(Step::new(tag));
        }
    }

    steps.reverse();
    Locator::Path(steps)
}
