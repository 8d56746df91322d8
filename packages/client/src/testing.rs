//! An in-memory DOM for exercising the reconciler without a browser.

use crate::backend::{DomBackend, NodeId, ScriptCleanup};
use lattice_core::{AttributeValue, EventTarget};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Default, Clone)]
pub struct TestNode {
    /// `None` for text nodes.
    pub tag: Option<String>,
    pub text: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub listeners: BTreeMap<String, EventTarget>,
    pub children: Vec<usize>,
    parent: Option<usize>,
}

/// A minimal document: a node arena plus a root child list.
#[derive(Default)]
pub struct TestDom {
    nodes: FxHashMap<usize, TestNode>,
    root_children: Vec<usize>,
    /// Every script text handed to `eval_script`, in order.
    pub evaluated: Vec<String>,
    /// Optional hook producing cleanups for evaluated scripts.
    pub eval_hook: Option<Box<dyn FnMut(&str) -> Option<ScriptCleanup>>>,
}

impl TestDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &TestNode {
        &self.nodes[&id.0]
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id.0)
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        for root in &self.root_children {
            self.collect_by_tag(*root, tag, &mut found);
        }
        found
    }

    fn collect_by_tag(&self, id: usize, tag: &str, out: &mut Vec<NodeId>) {
        let node = &self.nodes[&id];
        if node.tag.as_deref() == Some(tag) {
            out.push(NodeId(id));
        }
        for child in &node.children {
            self.collect_by_tag(*child, tag, out);
        }
    }

    /// Flatten the document to a compact HTML-ish string for assertions.
    pub fn render_to_string(&self) -> String {
        let mut out = String::new();
        for root in &self.root_children {
            self.write_node(*root, &mut out);
        }
        out
    }

    fn write_node(&self, id: usize, out: &mut String) {
        let node = &self.nodes[&id];
        match &node.tag {
            None => out.push_str(&node.text),
            Some(tag) => {
                let _ = write!(out, "<{tag}");
                for (name, value) in &node.attributes {
                    match value {
                        AttributeValue::Text(text) => {
                            let _ = write!(out, " {name}=\"{text}\"");
                        }
                        other => {
                            let _ = write!(out, " {name}={other:?}");
                        }
                    }
                }
                out.push('>');
                for child in &node.children {
                    self.write_node(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn detach(&mut self, child: usize) {
        let parent = self.nodes.get(&child).and_then(|node| node.parent);
        let siblings = match parent {
            Some(parent) => &mut self.nodes.get_mut(&parent).expect("parent exists").children,
            None => &mut self.root_children,
        };
        siblings.retain(|id| *id != child);
    }

    fn children_of(&mut self, parent: Option<NodeId>) -> &mut Vec<usize> {
        match parent {
            Some(parent) => {
                &mut self
                    .nodes
                    .get_mut(&parent.0)
                    .expect("parent node exists")
                    .children
            }
            None => &mut self.root_children,
        }
    }

    fn remove_subtree(&mut self, id: usize) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }
}

impl DomBackend for TestDom {
    fn create_element(&mut self, id: NodeId, tag: &str) {
        self.nodes.insert(
            id.0,
            TestNode {
                tag: Some(tag.to_string()),
                ..Default::default()
            },
        );
    }

    fn create_text(&mut self, id: NodeId, text: &str) {
        self.nodes.insert(
            id.0,
            TestNode {
                tag: None,
                text: text.to_string(),
                ..Default::default()
            },
        );
    }

    fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&id.0) {
            node.text = text.to_string();
        }
    }

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &AttributeValue) {
        if let Some(node) = self.nodes.get_mut(&id.0) {
            node.attributes.insert(name.to_string(), value.clone());
        }
    }

    fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(&id.0) {
            node.attributes.remove(name);
        }
    }

    fn add_event_listener(&mut self, id: NodeId, event: &str, descriptor: &EventTarget) {
        if let Some(node) = self.nodes.get_mut(&id.0) {
            node.listeners.insert(event.to_string(), descriptor.clone());
        }
    }

    fn remove_event_listener(&mut self, id: NodeId, event: &str) {
        if let Some(node) = self.nodes.get_mut(&id.0) {
            node.listeners.remove(event);
        }
    }

    fn append_child(&mut self, parent: Option<NodeId>, child: NodeId) {
        self.detach(child.0);
        self.children_of(parent).push(child.0);
        if let Some(node) = self.nodes.get_mut(&child.0) {
            node.parent = parent.map(|id| id.0);
        }
    }

    fn insert_before(&mut self, parent: Option<NodeId>, anchor: NodeId, child: NodeId) {
        self.detach(child.0);
        let siblings = self.children_of(parent);
        let position = siblings
            .iter()
            .position(|id| *id == anchor.0)
            .unwrap_or(siblings.len());
        siblings.insert(position, child.0);
        if let Some(node) = self.nodes.get_mut(&child.0) {
            node.parent = parent.map(|id| id.0);
        }
    }

    fn remove_node(&mut self, id: NodeId) {
        self.detach(id.0);
        self.remove_subtree(id.0);
    }

    fn eval_script(&mut self, code: &str) -> Option<ScriptCleanup> {
        self.evaluated.push(code.to_string());
        match &mut self.eval_hook {
            Some(hook) => hook(code),
            None => None,
        }
    }
}
