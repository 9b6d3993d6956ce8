use serde::{Deserialize, Serialize};

// ============================================================================
// Node handles and attributes
// ============================================================================

/// Index of a node inside a `DocumentTree` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Handle to the element a user selected. Only valid for the tree it came from.
pub type ElementRef = NodeId;

/// Ordered (name, value) pairs read from an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet(Vec<(String, String)>);

impl AttributeSet {
    pub fn new() -> Self {
        AttributeSet(Vec::new())
    }

    /// Value of `name`, exactly as written in the document.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `name` if it contains something other than whitespace.
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }

    /// Set `name`, replacing an earlier value in place so order is kept.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value.to_string(),
            None => self.0.push((name, value.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (name, value) in iter {
            set.set(name.as_ref(), value.as_ref());
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element { tag: String, attributes: AttributeSet },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

// ============================================================================
// DocumentTree
// ============================================================================

/// Arena-backed snapshot of a page's DOM.
///
/// Tag and attribute names are stored lowercase, matching what a browser
/// reports for HTML documents. Nodes removed with `detach` stay in the arena
/// but are no longer reachable from the root, so every document-wide query
/// ignores them.
#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl DocumentTree {
    pub fn new() -> Self {
        DocumentTree {
            nodes: Vec::new(),
            root: None,
        }
    }

    // ---- Construction ----

    /// Create the document element. Replaces any previous root.
    pub fn create_root(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.push(None, element_data(tag, attributes));
        self.root = Some(id);
        id
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        self.push(Some(parent), element_data(tag, attributes))
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(Some(parent), NodeData::Text(text.to_string()))
    }

    pub(crate) fn append_data(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = self.push(parent, data);
        if parent.is_none() {
            self.root = Some(id);
        }
        id
    }

    fn push(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            p.children.push(id);
        }
        id
    }

    /// Unlink a node from its parent. The handle stays valid but disconnected.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id.0).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.nodes.get_mut(id.0) {
            n.parent = None;
        }
    }

    // ---- Node access ----

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).map(|n| &n.data)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Element { .. }))
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> Option<&AttributeSet> {
        match self.data(id)? {
            NodeData::Element { attributes, .. } => Some(attributes),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)?.get(name)
    }

    pub fn non_blank_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)?.non_blank(name)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
    }

    /// Nearest parent that is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(id.0)?.parent?;
        self.is_element(parent).then_some(parent)
    }

    /// Element siblings before `id`, nearest first.
    pub fn preceding_element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.nodes.get(id.0).and_then(|n| n.parent) else {
            return Vec::new();
        };
        let mut preceding: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .take_while(|c| *c != id)
            .filter(|c| self.is_element(*c))
            .collect();
        preceding.reverse();
        preceding
    }

    /// 1-based position of `id` among its parent's children with the same tag.
    pub fn same_tag_ordinal(&self, id: NodeId) -> usize {
        let tag = self.tag(id);
        1 + self
            .preceding_element_siblings(id)
            .into_iter()
            .filter(|s| self.tag(*s) == tag)
            .count()
    }

    /// True if the node can be reached from the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if Some(node) == self.root {
                return true;
            }
            current = self.nodes.get(node.0).and_then(|n| n.parent);
        }
        false
    }

    // ---- Document-wide traversal ----

    /// Every connected element, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if !self.is_element(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|id| self.tag(*id) == Some(tag))
            .collect()
    }

    // ---- Text ----

    /// Concatenation of the element's own text-node children, whitespace kept.
    pub fn direct_text(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|c| match self.data(*c) {
                Some(NodeData::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text of every descendant text node, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(t)) => out.push_str(t),
            Some(NodeData::Element { .. }) => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    pub fn direct_text_nodes(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.children(id).iter().filter_map(|c| match self.data(*c) {
            Some(NodeData::Text(t)) => Some(t.as_str()),
            _ => None,
        })
    }

    /// Whitespace-separated tokens of the class attribute.
    pub fn class_tokens(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    // ---- Serialization ----

    /// HTML markup of the element and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(t)) => out.push_str(&escape_text(t)),
            Some(NodeData::Element { tag, attributes }) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes.iter() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            None => {}
        }
    }

    /// SHA-1 of the serialized document, used to tie trace events to a page state.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let markup = self.root.map(|r| self.outer_html(r)).unwrap_or_default();
        let mut hasher = Sha1::new();
        hasher.update(markup.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn element_data(tag: &str, attributes: &[(&str, &str)]) -> NodeData {
    NodeData::Element {
        tag: tag.to_ascii_lowercase(),
        attributes: attributes.iter().copied().collect(),
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
