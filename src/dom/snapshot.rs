use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{AttributeSet, DocumentTree, NodeData, NodeId};
use crate::dom::error::SnapshotError;

/// One node as emitted by the page-side extraction script.
///
/// Element nodes carry their attributes as ordered `[name, value]` pairs so
/// the document's attribute order survives the trip through JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotNode {
    Element {
        tag: String,
        #[serde(default)]
        attributes: Vec<(String, String)>,
        #[serde(default)]
        children: Vec<SnapshotNode>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        selected: bool,
    },
    Text {
        text: String,
    },
}

/// Full page snapshot: `{ "url": ..., "title": ..., "root": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    pub root: SnapshotNode,
}

/// A snapshot turned into a queryable tree.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub url: Option<String>,
    pub title: String,
    pub document: DocumentTree,
    /// Element the extraction script marked with `"selected": true`.
    pub selected: Option<NodeId>,
}

impl PageSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::JsonParse {
            context: "page snapshot".into(),
            source: e,
        })
    }

    pub fn load(path: &str) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn into_page(self) -> Result<LoadedPage, SnapshotError> {
        if matches!(self.root, SnapshotNode::Text { .. }) {
            return Err(SnapshotError::RootNotElement);
        }

        let mut document = DocumentTree::new();
        let mut selected = None;
        build_node(&mut document, None, self.root, &mut selected);

        Ok(LoadedPage {
            url: self.url,
            title: self.title,
            document,
            selected,
        })
    }
}

impl LoadedPage {
    /// Resolve the element to locate: an explicit document-order element index
    /// wins over the snapshot's `selected` marker.
    pub fn target(&self, index: Option<usize>) -> Result<NodeId, SnapshotError> {
        match index {
            Some(i) => self.document.elements().get(i).copied().ok_or_else(|| {
                SnapshotError::TargetNotFound(format!(
                    "element index {} out of range ({} elements)",
                    i,
                    self.document.elements().len()
                ))
            }),
            None => self.selected.ok_or_else(|| {
                SnapshotError::TargetNotFound("no element marked \"selected\"".into())
            }),
        }
    }
}

fn build_node(
    document: &mut DocumentTree,
    parent: Option<NodeId>,
    node: SnapshotNode,
    selected: &mut Option<NodeId>,
) {
    match node {
        SnapshotNode::Element {
            tag,
            attributes,
            children,
            selected: is_selected,
        } => {
            let attributes: AttributeSet = attributes.into_iter().collect();
            let id = document.append_data(
                parent,
                NodeData::Element {
                    tag: tag.to_ascii_lowercase(),
                    attributes,
                },
            );
            if is_selected && selected.is_none() {
                *selected = Some(id);
            }
            for child in children {
                build_node(document, Some(id), child, selected);
            }
        }
        SnapshotNode::Text { text } => {
            if let Some(parent) = parent {
                document.append_data(Some(parent), NodeData::Text(text));
            }
        }
    }
}
