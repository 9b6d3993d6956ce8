use serde::{Deserialize, Serialize};

/// Marker appended to `unique_attributes` when one short class alone
/// identifies the element.
pub const UNIQUE_CLASS_MARKER: &str = "unique-class";

/// Where the element sits among elements that look like it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 1-based, document order.
    pub index: usize,
    pub total: usize,
    pub needs_indexing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentInfo {
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    pub has_id: bool,
    pub has_class: bool,
}

/// Position among the parent's children that share the element's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingInfo {
    /// 1-based.
    pub index: usize,
    pub total: usize,
    pub needs_sibling_indexing: bool,
}

/// Structural uniqueness hints for one element, computed on demand.
///
/// Plain data, serializable into a request for the text model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementContext {
    pub position: Position,
    pub parent_info: Option<ParentInfo>,
    pub sibling_info: SiblingInfo,
    /// Allow-listed attribute names present on the element, plus
    /// `UNIQUE_CLASS_MARKER` when a unique class was found.
    pub unique_attributes: Vec<String>,
    /// The class token behind `UNIQUE_CLASS_MARKER`.
    pub unique_class: Option<String>,
}

impl ElementContext {
    pub fn has_unique_class(&self) -> bool {
        self.unique_attributes
            .iter()
            .any(|a| a == UNIQUE_CLASS_MARKER)
    }
}
