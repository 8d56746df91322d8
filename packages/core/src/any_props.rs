//! Type-erased props so the layout can hold heterogeneous component
//! instances in one arena.

use crate::nodes::Element;
use std::any::{Any, TypeId};

/// The identity of a render function: its address plus the props type it
/// accepts. Two components are "the same" for reconciliation purposes iff
/// their identities match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderFnId(pub(crate) usize, pub(crate) TypeId);

pub(crate) trait AnyProps {
    fn render(&self) -> Element;

    /// Compare against another erased props value. Equal props let a
    /// retained child skip its re-render.
    fn memoize(&self, other: &dyn AnyProps) -> bool;

    fn fn_id(&self) -> RenderFnId;

    fn as_any(&self) -> &dyn Any;
}

pub(crate) struct VProps<P> {
    render_fn: fn(P) -> Element,
    props: P,
}

impl<P> VProps<P> {
    pub fn new(render_fn: fn(P) -> Element, props: P) -> Self {
        Self { render_fn, props }
    }
}

impl<P: Clone + PartialEq + 'static> AnyProps for VProps<P> {
    fn render(&self) -> Element {
        (self.render_fn)(self.props.clone())
    }

    fn memoize(&self, other: &dyn AnyProps) -> bool {
        match other.as_any().downcast_ref::<VProps<P>>() {
            Some(other) => other.render_fn == self.render_fn && other.props == self.props,
            None => false,
        }
    }

    fn fn_id(&self) -> RenderFnId {
        RenderFnId(self.render_fn as usize, TypeId::of::<P>())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
