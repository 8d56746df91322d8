//! Builder-side virtual DOM nodes.
//!
//! Components return these trees from their render functions. They are pure
//! data plus event callbacks: identity, handler target IDs, and patch paths
//! are all assigned later by the [`Layout`](crate::Layout) when the tree is
//! reconciled and serialized into the wire model.

use crate::any_props::{AnyProps, VProps};
use crate::events::ListenerCallback;
use crate::scopes::ScopeId;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A possibly-none node returned by a render function.
///
/// `None` produces a zero-width node: it occupies its position for identity
/// purposes but emits no client element.
pub type Element = Option<VNode>;

/// A component is a plain function from props to an [`Element`].
pub type Component<P = ()> = fn(P) -> Element;

/// A single node in a component's output tree.
pub enum VNode {
    /// A concrete element. An empty tag name is a transparent fragment.
    Element(VElement),
    /// A text node.
    Text(String),
    /// A nested component, reconciled into its own scope by the layout.
    Component(VComponent),
}

impl VNode {
    /// A zero-width placeholder, used to stand in for `None` renders.
    pub fn placeholder() -> Self {
        VNode::Element(VElement::new(String::new()))
    }

    /// The sibling key of this node, if it carries one.
    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element(el) => el.key.as_deref(),
            VNode::Component(comp) => comp.key.as_deref(),
            VNode::Text(_) => None,
        }
    }
}

impl std::fmt::Debug for VNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VNode::Element(el) => f
                .debug_struct("Element")
                .field("tag", &el.tag)
                .field("key", &el.key)
                .field("children", &el.children)
                .finish(),
            VNode::Text(text) => f.debug_tuple("Text").field(text).finish(),
            VNode::Component(comp) => f
                .debug_struct("Component")
                .field("name", &comp.name)
                .field("key", &comp.key)
                .finish(),
        }
    }
}

/// An element description: tag, attributes, listeners, and ordered children.
pub struct VElement {
    pub tag: String,
    pub key: Option<String>,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub children: Vec<VNode>,
    pub listeners: Vec<Listener>,
    pub import_source: Option<ImportSource>,
}

impl VElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            listeners: Vec::new(),
            import_source: None,
        }
    }

    /// Fragments participate in identity but emit no DOM element.
    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }
}

/// An attribute value: a string, a scalar, or a nested mapping (`style`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Map(BTreeMap<String, AttributeValue>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

/// An event listener attached to an element.
///
/// The callback survives only while the owning element stays mounted; its
/// wire-visible target ID is assigned by the layout and kept stable across
/// re-renders of the same element.
pub struct Listener {
    pub name: String,
    pub callback: ListenerCallback,
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl Listener {
    pub fn new(name: impl Into<String>, callback: ListenerCallback) -> Self {
        Self {
            name: name.into(),
            callback,
            prevent_default: false,
            stop_propagation: false,
        }
    }
}

/// Where the client should fetch the module that renders a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// The client imports the literal URL.
    #[serde(rename = "URL")]
    Url,
    /// The client asks the host's module endpoint for a module by name.
    #[serde(rename = "NAME")]
    Name,
}

/// A reference to a browser-side module that renders this element's subtree.
pub struct ImportSource {
    pub source: String,
    pub source_type: SourceType,
    /// Shown while the module loads, or when loading fails.
    pub fallback: Option<Box<VNode>>,
    /// Tear the binding down before every update instead of re-rendering in place.
    pub unmount_before_update: bool,
}

impl ImportSource {
    pub fn url(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_type: SourceType::Url,
            fallback: None,
            unmount_before_update: false,
        }
    }

    pub fn name(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_type: SourceType::Name,
            fallback: None,
            unmount_before_update: false,
        }
    }

    pub fn with_fallback(mut self, fallback: VNode) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn with_unmount_before_update(mut self) -> Self {
        self.unmount_before_update = true;
        self
    }
}

/// A component bound to its props, waiting to be mounted into a scope.
pub struct VComponent {
    pub name: &'static str,
    pub key: Option<String>,
    pub(crate) props: Rc<dyn AnyProps>,
    pub(crate) scope: Cell<Option<ScopeId>>,
}

impl VComponent {
    pub fn new<P>(render: Component<P>, props: P) -> Self
    where
        P: Clone + PartialEq + 'static,
    {
        Self {
            name: std::any::type_name::<P>(),
            key: None,
            props: Rc::new(VProps::new(render, props)),
            scope: Cell::new(None),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The scope this component was last mounted into, if any.
    pub fn mounted_scope(&self) -> Option<ScopeId> {
        self.scope.get()
    }
}

/// Mount a component as a child node.
pub fn component<P>(render: Component<P>, props: P) -> VNode
where
    P: Clone + PartialEq + 'static,
{
    VNode::Component(VComponent::new(render, props))
}

/// Mount a component as a keyed child node.
pub fn keyed_component<P>(key: impl Into<String>, render: Component<P>, props: P) -> VNode
where
    P: Clone + PartialEq + 'static,
{
    VNode::Component(VComponent::new(render, props).with_key(key))
}
