//! Owned element builders.
//!
//! The generic entry point is [`element`]; every standard HTML tag also gets
//! a helper of the same name. Builders normalize attribute names on
//! insertion, flatten children one level, and elide `None` children.
//!
//! ```rust, ignore
//! div()
//!     .attr("class_name", "toolbar")
//!     .child(button().on("click", move |_| save()).child("Save"))
//!     .maybe_child(status.map(|s| span().child(s).build()))
//!     .build()
//! ```

use crate::attributes::{normalize_attribute_name, normalize_style_value};
use lattice_core::{
    AttributeValue, EventReturn, ImportSource, Listener, ListenerCallback, VElement, VNode,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Anything that can stand in a child position.
pub trait IntoVNode {
    fn into_vnode(self) -> VNode;
}

impl IntoVNode for VNode {
    fn into_vnode(self) -> VNode {
        self
    }
}

impl IntoVNode for ElementBuilder {
    fn into_vnode(self) -> VNode {
        self.build()
    }
}

impl IntoVNode for &str {
    fn into_vnode(self) -> VNode {
        VNode::Text(self.to_string())
    }
}

impl IntoVNode for String {
    fn into_vnode(self) -> VNode {
        VNode::Text(self)
    }
}

/// Build an element with an arbitrary tag. Prefer the tag helpers when the
/// tag is known statically.
pub fn element(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        el: VElement::new(tag.into()),
    }
}

/// A transparent fragment: participates in identity at its position but
/// emits no DOM element; its children splice into the parent's child list.
pub fn fragment(children: impl IntoIterator<Item = impl IntoVNode>) -> VNode {
    element("").children(children).build()
}

/// A bare text node.
pub fn text(value: impl Into<String>) -> VNode {
    VNode::Text(value.into())
}

pub struct ElementBuilder {
    el: VElement,
}

impl ElementBuilder {
    /// Set the sibling key used by reconciliation to preserve identity
    /// across reorderings. Keys must be unique among siblings.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.el.key = Some(key.into());
        self
    }

    /// Set one attribute. The name is normalized (`class_name` →
    /// `className`, `aria_label` → `aria-label`); a `style` mapping is
    /// camelCased recursively.
    pub fn attr(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        let name = normalize_attribute_name(name);
        let mut value = value.into();
        if name == "style" {
            value = normalize_style_value(value);
        }
        self.el.attributes.insert(name, value);
        self
    }

    /// Set the `style` attribute from property/value pairs.
    pub fn style<'a>(self, entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map: BTreeMap<String, AttributeValue> = entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), AttributeValue::from(value)))
            .collect();
        self.attr("style", AttributeValue::Map(map))
    }

    pub fn child(mut self, child: impl IntoVNode) -> Self {
        self.el.children.push(child.into_vnode());
        self
    }

    /// Append a child when present; `None` is elided.
    pub fn maybe_child(mut self, child: Option<impl IntoVNode>) -> Self {
        if let Some(child) = child {
            self.el.children.push(child.into_vnode());
        }
        self
    }

    /// Append every item of an iterator (one level of flattening).
    pub fn children(mut self, children: impl IntoIterator<Item = impl IntoVNode>) -> Self {
        self.el
            .children
            .extend(children.into_iter().map(IntoVNode::into_vnode));
        self
    }

    /// Attach an event listener. The callback receives the serialized event
    /// arguments; returning a future lets the handler continue after its
    /// synchronous prefix.
    pub fn on<F, R, Marker>(self, event: &str, callback: F) -> Self
    where
        F: FnMut(Vec<Value>) -> R + 'static,
        R: EventReturn<Marker>,
        Marker: 'static,
    {
        self.on_with_flags(event, false, false, callback)
    }

    /// Attach an event listener with explicit `preventDefault` /
    /// `stopPropagation` behavior on the client.
    pub fn on_with_flags<F, R, Marker>(
        mut self,
        event: &str,
        prevent_default: bool,
        stop_propagation: bool,
        callback: F,
    ) -> Self
    where
        F: FnMut(Vec<Value>) -> R + 'static,
        R: EventReturn<Marker>,
        Marker: 'static,
    {
        let mut listener = Listener::new(event, ListenerCallback::new(callback));
        listener.prevent_default = prevent_default;
        listener.stop_propagation = stop_propagation;
        self.el.listeners.push(listener);
        self
    }

    /// Delegate rendering of this subtree to a browser-side module.
    pub fn import_source(mut self, source: ImportSource) -> Self {
        self.el.import_source = Some(source);
        self
    }

    pub fn build(self) -> VNode {
        VNode::Element(self.el)
    }
}

impl From<ElementBuilder> for VNode {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

macro_rules! tags {
    ($($name:ident)*) => {
        $(
            pub fn $name() -> ElementBuilder {
                element(stringify!($name))
            }
        )*
    };
}

tags! {
    a abbr address area article aside audio b bdi bdo blockquote br button
    canvas caption cite code col colgroup data datalist dd del details dfn
    dialog div dl dt em embed fieldset figcaption figure footer form h1 h2 h3
    h4 h5 h6 header hgroup hr i iframe img input ins kbd label legend li
    main map mark menu meter nav noscript object ol optgroup option output p
    picture pre progress q rp rt ruby s samp script section select small
    source span strong sub summary sup table tbody td template textarea tfoot
    th thead time tr track u ul var video wbr
}
