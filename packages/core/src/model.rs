//! The wire form of the virtual DOM.
//!
//! A [`Model`] is the JSON-shaped mirror of a rendered tree: callbacks have
//! been replaced by [`EventTarget`] descriptors and component boundaries are
//! invisible. Both ends of the protocol hold one - the layout keeps its own
//! mirror so a reconnecting client can be resynced from path `""`.

use crate::error::ProtocolError;
use crate::nodes::{AttributeValue, SourceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of the wire tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Model {
    /// Empty string means a transparent fragment.
    #[serde(default)]
    pub tag_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ModelChild>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub event_handlers: BTreeMap<String, EventTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_source: Option<ImportSourceModel>,

    /// Populated when the producing component failed to render. The message
    /// is only carried in debug mode; otherwise this is an empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A child slot: either literal text or a nested node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelChild {
    Text(String),
    Node(Model),
}

impl ModelChild {
    pub fn as_node(&self) -> Option<&Model> {
        match self {
            ModelChild::Node(model) => Some(model),
            ModelChild::Text(_) => None,
        }
    }
}

/// The wire descriptor of a registered event handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTarget {
    pub target: String,
    #[serde(default)]
    pub prevent_default: bool,
    #[serde(default)]
    pub stop_propagation: bool,
}

/// The wire form of an import source. The fallback is pre-serialized; it
/// may not carry event handlers of its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSourceModel {
    pub source: String,
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Box<ModelChild>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unmount_before_update: bool,
}

/// Parse a subtree path of the form `"/children/1/children/0"` into child
/// indices. The empty string addresses the root.
pub fn parse_path(path: &str) -> Result<Vec<usize>, ProtocolError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let invalid = || ProtocolError::InvalidPath(path.to_string());
    let mut indices = Vec::new();
    let mut segments = path.split('/');
    if !segments.next().map(str::is_empty).unwrap_or(false) {
        return Err(invalid());
    }
    loop {
        match segments.next() {
            None => return Ok(indices),
            Some("children") => {
                let index = segments.next().ok_or_else(invalid)?;
                indices.push(index.parse().map_err(|_| invalid())?);
            }
            Some(_) => return Err(invalid()),
        }
    }
}

/// Append one child index to a subtree path.
pub fn join_path(path: &str, index: usize) -> String {
    format!("{path}/children/{index}")
}

impl Model {
    /// Look up the node at `path`.
    pub fn node_at(&self, path: &str) -> Result<&Model, ProtocolError> {
        let mut node = self;
        for index in parse_path(path)? {
            node = node
                .children
                .get(index)
                .and_then(ModelChild::as_node)
                .ok_or_else(|| ProtocolError::Unresolvable {
                    path: path.to_string(),
                })?;
        }
        Ok(node)
    }

    /// Replace the subtree at `path` with `model`. This is the client-side
    /// meaning of a `layout-update` message.
    pub fn apply(&mut self, path: &str, model: Model) -> Result<(), ProtocolError> {
        let indices = parse_path(path)?;
        let mut node = self;
        for (depth, index) in indices.iter().enumerate() {
            if depth == indices.len() - 1 {
                let slot =
                    node.children
                        .get_mut(*index)
                        .ok_or_else(|| ProtocolError::Unresolvable {
                            path: path.to_string(),
                        })?;
                *slot = ModelChild::Node(model);
                return Ok(());
            }
            node = match node.children.get_mut(*index) {
                Some(ModelChild::Node(child)) => child,
                _ => {
                    return Err(ProtocolError::Unresolvable {
                        path: path.to_string(),
                    })
                }
            };
        }
        *node = model;
        Ok(())
    }
}

/// Debug-mode model checks: errors for invariant violations, warnings for
/// likely mistakes. Only called when debug mode is enabled.
pub fn validate_model(model: &Model) -> Result<(), String> {
    validate_node(model, "")
}

fn validate_node(model: &Model, path: &str) -> Result<(), String> {
    let mut seen_keys: Vec<&str> = Vec::new();
    let mut repeated_tags = false;
    let mut last_tag: Option<&str> = None;

    for (index, child) in model.children.iter().enumerate() {
        let ModelChild::Node(node) = child else {
            continue;
        };
        if let Some(key) = node.key.as_deref() {
            if seen_keys.contains(&key) {
                return Err(format!(
                    "duplicate sibling key `{key}` under `{path}` (child {index})"
                ));
            }
            seen_keys.push(key);
        }
        if last_tag == Some(node.tag_name.as_str()) && !node.tag_name.is_empty() {
            repeated_tags = true;
        }
        last_tag = Some(node.tag_name.as_str());
        validate_node(node, &join_path(path, index))?;
    }

    // Runs of same-tag siblings usually come from rendering a list; remind
    // the author to key them so reorders preserve state.
    if repeated_tags && seen_keys.is_empty() {
        tracing::warn!(
            path,
            tag = last_tag,
            "list-like siblings have no keys; reorders will not preserve state"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tag: &str) -> Model {
        Model {
            tag_name: tag.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn paths_parse_and_join() {
        assert_eq!(parse_path("").unwrap(), Vec::<usize>::new());
        assert_eq!(parse_path("/children/0").unwrap(), vec![0]);
        assert_eq!(parse_path("/children/4/children/1").unwrap(), vec![4, 1]);
        assert!(parse_path("children/0").is_err());
        assert!(parse_path("/attributes/0").is_err());
        assert_eq!(join_path("", 2), "/children/2");
    }

    #[test]
    fn apply_replaces_subtrees() {
        let mut root = node("div");
        root.children = vec![
            ModelChild::Text("hello".into()),
            ModelChild::Node(node("span")),
        ];

        root.apply("/children/1", node("p")).unwrap();
        assert_eq!(root.children[1].as_node().unwrap().tag_name, "p");

        root.apply("", node("main")).unwrap();
        assert_eq!(root.tag_name, "main");
        assert!(root.children.is_empty());
    }

    #[test]
    fn apply_rejects_missing_slots() {
        let mut root = node("div");
        assert!(root.apply("/children/3", node("p")).is_err());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut root = node("ul");
        let mut a = node("li");
        a.key = Some("x".into());
        let mut b = node("li");
        b.key = Some("x".into());
        root.children = vec![ModelChild::Node(a), ModelChild::Node(b)];
        assert!(validate_model(&root).is_err());
    }
}
