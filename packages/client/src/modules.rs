//! The binding contract for import-source elements.
//!
//! An element carrying an `importSource` is rendered by a browser-side
//! module instead of the normal tag path. The reconciler loads the module
//! through a [`ModuleLoader`], binds it to the element's node, and hands the
//! binding the subtree model on every update.

use crate::backend::NodeId;
use crate::error::ClientError;
use lattice_core::{ImportSourceModel, Model, ModelChild};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Resolves an import source to a loaded module. A browser embedding
/// implements this with dynamic `import()`; `NAME` sources resolve through
/// the host's `/modules/{name}` endpoint.
pub trait ModuleLoader {
    fn load(&mut self, source: &ImportSourceModel) -> Result<Rc<dyn Module>, ClientError>;
}

/// A loaded module: a factory for per-element bindings.
pub trait Module {
    fn bind(&self, node: NodeId, channel: ModuleChannel) -> Box<dyn ModuleBinding>;
}

/// One bound instance rendering a subtree on behalf of the layout.
pub trait ModuleBinding {
    fn render(&mut self, model: &Model);
    fn unmount(&mut self);
}

/// The message channel handed to a binding: `send_message` reaches the
/// server out-of-band, `on_message` receives what the server pushes back.
#[derive(Clone)]
pub struct ModuleChannel {
    pub send_message: Rc<dyn Fn(Value)>,
    pub on_message: Rc<RefCell<Option<Box<dyn FnMut(Value)>>>>,
}

impl ModuleChannel {
    /// A channel whose outbound side goes nowhere. Used when the embedder
    /// provides no out-of-band transport.
    pub fn disconnected() -> Self {
        Self {
            send_message: Rc::new(|_| {}),
            on_message: Rc::new(RefCell::new(None)),
        }
    }
}

/// Enforce the subtree invariant for a module-rendered element: every
/// descendant carrying an import source must name the same module. A
/// violating subtree is logged, dropped, and replaced by its declared
/// fallback before the binding ever sees it.
pub fn sanitize_module_model(model: &Model, source: &ImportSourceModel) -> Model {
    let mut sanitized = model.clone();
    sanitized.children = model
        .children
        .iter()
        .map(|child| sanitize_child(child, source))
        .collect();
    sanitized
}

fn sanitize_child(child: &ModelChild, source: &ImportSourceModel) -> ModelChild {
    let ModelChild::Node(node) = child else {
        return child.clone();
    };

    if let Some(child_source) = &node.import_source {
        let matches = child_source.source == source.source
            && child_source.source_type == source.source_type;
        if !matches {
            tracing::error!(
                parent = %source.source,
                child = %child_source.source,
                "import source does not match its ancestor; dropping subtree"
            );
            return match &child_source.fallback {
                Some(fallback) => (**fallback).clone(),
                None => ModelChild::Node(Model::default()),
            };
        }
    }

    ModelChild::Node(Model {
        children: node
            .children
            .iter()
            .map(|nested| sanitize_child(nested, source))
            .collect(),
        ..node.clone()
    })
}
