//! Locator synthesis for UI test automation.
//!
//! Given one element of a DOM snapshot, `synthesize` returns an XPath that
//! re-finds it: an id when present, then verified shortcuts (image source,
//! placeholder + class, own text, distinguishing attributes) wrapped with a
//! position when ambiguous, and finally a short ancestor path.

pub mod augment;
pub mod cli;
pub mod context;
pub mod dom;
pub mod locator;
pub mod selection;
pub mod trace;

pub use context::compute::compute_context;
pub use context::context_model::ElementContext;
pub use dom::dom_model::{DocumentTree, ElementRef, NodeId};
pub use locator::locator_model::{Locator, LocatorResult};
pub use locator::synthesizer::{
    SynthesisOptions, Tier, locate_interactive, synthesize, synthesize_locator, synthesize_tagged,
};
