#![forbid(unsafe_code)]

//! Retained drawing surface owned by each widget.
//!
//! The engine never interprets node contents; a host renderer walks
//! [`Surface::nodes`] whenever [`Surface::revision`] moves.

use std::collections::BTreeMap;

/// What a surface node represents to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Image,
    Link,
    Fill,
}

/// One keyed element inside a [`Surface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    key: String,
    kind: NodeKind,
    text: String,
    attrs: BTreeMap<String, String>,
}

impl Node {
    fn new(key: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            key: key.into(),
            kind,
            text: String::new(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Ordered, keyed presentation tree (one level deep) plus container style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    nodes: Vec<Node>,
    style: BTreeMap<String, String>,
    revision: u64,
}

impl Surface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, replacing any existing node with the same key in place.
    pub fn append(&mut self, key: impl Into<String>, kind: NodeKind) -> &mut Node {
        let node = Node::new(key, kind);
        self.revision += 1;
        match self.nodes.iter().position(|n| n.key == node.key) {
            Some(idx) => {
                self.nodes[idx] = node;
                &mut self.nodes[idx]
            }
            None => {
                self.nodes.push(node);
                let last = self.nodes.len() - 1;
                &mut self.nodes[last]
            }
        }
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Replace a node's text. Returns `false` when no node has `key`.
    pub fn set_text(&mut self, key: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        let Some(node) = self.nodes.iter_mut().find(|n| n.key == key) else {
            return false;
        };
        if node.text != text {
            node.text = text;
            self.revision += 1;
        }
        true
    }

    /// Set an attribute on a node. Returns `false` when no node has `key`.
    pub fn set_attr(&mut self, key: &str, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(node) = self.nodes.iter_mut().find(|n| n.key == key) else {
            return false;
        };
        if node.attrs.get(name) != Some(&value) {
            node.attrs.insert(name.to_owned(), value);
            self.revision += 1;
        }
        true
    }

    /// Style applied to the widget's container rather than a child node.
    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if self.style.get(name) != Some(&value) {
            self.style.insert(name.to_owned(), value);
            self.revision += 1;
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    /// Drop every node and style entry.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.nodes.clear();
            self.style.clear();
            self.revision += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.style.is_empty()
    }

    /// Monotonic change counter. Unchanged writes do not bump it.
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_replaces_same_key_in_place() {
        let mut s = Surface::new();
        s.append("a", NodeKind::Text);
        s.append("b", NodeKind::Text);
        s.append("a", NodeKind::Image);
        let keys: Vec<_> = s.nodes().iter().map(Node::key).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(s.node("a").map(Node::kind), Some(NodeKind::Image));
    }

    #[test]
    fn identical_writes_keep_revision() {
        let mut s = Surface::new();
        s.append("t", NodeKind::Text);
        assert!(s.set_text("t", "12:00"));
        let rev = s.revision();
        assert!(s.set_text("t", "12:00"));
        s.set_style("color", "red");
        s.set_style("color", "red");
        assert_eq!(s.revision(), rev + 1);
    }

    #[test]
    fn writes_to_missing_nodes_report_false() {
        let mut s = Surface::new();
        assert!(!s.set_text("nope", "x"));
        assert!(!s.set_attr("nope", "src", "x"));
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn clear_empties_nodes_and_style() {
        let mut s = Surface::new();
        s.append("t", NodeKind::Text);
        s.set_style("background-color", "#000");
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.style("background-color"), None);
    }
}
