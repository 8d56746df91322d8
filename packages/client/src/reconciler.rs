//! Applies the server's patch stream to a real DOM.
//!
//! The reconciler keeps two parallel structures: the [`Mirror`] of the
//! server's model and a tree of [`Mounted`] nodes tracking what actually
//! exists in the document. Each incoming update replaces one model subtree;
//! the old and new subtrees are then diffed locally so user-visible state
//! (focus, scroll, half-typed input) survives everything the server did not
//! actually change.

use crate::backend::{DomBackend, NodeId, ScriptCleanup};
use crate::error::ClientError;
use crate::mirror::Mirror;
use crate::modules::{sanitize_module_model, Module, ModuleBinding, ModuleChannel, ModuleLoader};
use lattice_core::{
    parse_path, AttributeValue, EventTarget, ImportSourceModel, LayoutUpdate, Model, ModelChild,
    ProtocolError,
};
use longest_increasing_subsequence::lis_with;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Client-side policy knobs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientOptions {
    /// Script elements without attributes evaluate their text in the page.
    /// That is a code-execution vector, so it is an explicit opt-in.
    pub allow_inline_scripts: bool,
}

/// One node the reconciler has constructed.
struct Mounted {
    /// `None` for fragments, zero-width nodes, and evaluated scripts.
    backend_node: Option<NodeId>,
    kind: MountedKind,
    children: Vec<Mounted>,
}

enum MountedKind {
    Text,
    Element,
    /// An attribute-less `<script>`: its text was evaluated, not mounted.
    Script { cleanup: Option<ScriptCleanup> },
    /// An import-source element delegated to a browser-side module.
    Module {
        binding: Box<dyn ModuleBinding>,
        module: Rc<dyn Module>,
        source: ImportSourceModel,
    },
    Fragment,
}

pub struct Reconciler<B: DomBackend> {
    backend: B,
    mirror: Mirror,
    mounted: Option<Mounted>,
    loader: Box<dyn ModuleLoader>,
    options: ClientOptions,
    channel_factory: Rc<dyn Fn() -> ModuleChannel>,
    /// The value the user most recently produced in each input-like
    /// element, keyed by backend node. See [`Reconciler::record_input`].
    input_values: FxHashMap<usize, String>,
    next_node: usize,
}

impl<B: DomBackend> Reconciler<B> {
    pub fn new(backend: B, loader: Box<dyn ModuleLoader>) -> Self {
        Self {
            backend,
            mirror: Mirror::new(),
            mounted: None,
            loader,
            options: ClientOptions::default(),
            channel_factory: Rc::new(ModuleChannel::disconnected),
            input_values: FxHashMap::default(),
            next_node: 0,
        }
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Supply the out-of-band channel handed to every module binding.
    pub fn with_module_channel(mut self, factory: impl Fn() -> ModuleChannel + 'static) -> Self {
        self.channel_factory = Rc::new(factory);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    /// The transport (re)opened. The mirror forgets its state; the server's
    /// next message must be a full resync at path `""`, which rebuilds the
    /// document.
    pub fn connection_open(&mut self) {
        self.mirror.reset();
    }

    /// The transport closed. The document is left standing so the user
    /// keeps seeing the last state while reconnection runs.
    pub fn connection_close(&mut self) {
        tracing::debug!("connection closed; awaiting resync");
    }

    /// Record what the user typed into an input-like element. The next
    /// server-sent `value` equal to this buffer is not re-applied, so the
    /// cursor never jumps; a diverging server value overwrites it.
    pub fn record_input(&mut self, node: NodeId, value: impl Into<String>) {
        self.input_values.insert(node.0, value.into());
    }

    /// Apply one `layout-update`.
    pub fn apply(&mut self, update: &LayoutUpdate) -> Result<(), ClientError> {
        if update.path.is_empty() {
            // A root update while synced is still a diff; only a resync
            // after (re)connection rebuilds the document from scratch.
            let old_root = self.mirror.is_synced().then(|| self.mirror.model().clone());
            self.mirror.apply(update)?;
            match (self.mounted.take(), old_root) {
                (Some(mut root), Some(old_model)) => {
                    self.sync_node(
                        &mut root,
                        &ModelChild::Node(old_model),
                        &ModelChild::Node(update.model.clone()),
                        None,
                        None,
                    );
                    self.mounted = Some(root);
                }
                (mounted, _) => {
                    if let Some(stale) = mounted {
                        self.unmount(stale, true);
                    }
                    let child = ModelChild::Node(update.model.clone());
                    let mounted = self.mount_child(&child, None, None);
                    self.mounted = Some(mounted);
                }
            }
            return Ok(());
        }

        let old_model = self.mirror.model().node_at(&update.path)?.clone();
        self.mirror.apply(update)?;
        let indices = parse_path(&update.path)?;

        let Some(mut root) = self.mounted.take() else {
            return Err(ClientError::Protocol(ProtocolError::Unresolvable {
                path: update.path.clone(),
            }));
        };
        let result = self.sync_update(&mut root, &indices, old_model, update.model.clone());
        self.mounted = Some(root);
        result
    }

    fn sync_update(
        &mut self,
        root: &mut Mounted,
        indices: &[usize],
        old_model: Model,
        new_model: Model,
    ) -> Result<(), ClientError> {
        // A patch landing inside a module-delegated subtree cannot be DOM
        // synced here; the owning binding re-renders from the updated mirror.
        if let Some(depth) = module_ancestor_depth(root, indices) {
            let prefix = path_of(&indices[..depth]);
            let model = self.mirror.model().node_at(&prefix)?.clone();
            let target = descend_mut(root, &indices[..depth]).ok_or_else(|| {
                ClientError::Protocol(ProtocolError::Unresolvable { path: prefix.clone() })
            })?;
            if let MountedKind::Module {
                binding, source, ..
            } = &mut target.kind
            {
                binding.render(&sanitize_module_model(&model, source));
            }
            return Ok(());
        }

        let anchor = find_anchor(root, indices);
        let real_parent = find_real_parent(root, indices);
        let target = descend_mut(root, indices).ok_or_else(|| {
            ClientError::Protocol(ProtocolError::Unresolvable {
                path: path_of(indices),
            })
        })?;

        self.sync_node(
            target,
            &ModelChild::Node(old_model),
            &ModelChild::Node(new_model),
            real_parent,
            anchor,
        );
        Ok(())
    }

    // -- mounting ----------------------------------------------------------

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn attach(&mut self, parent: Option<NodeId>, anchor: Option<NodeId>, node: NodeId) {
        match anchor {
            Some(anchor) => self.backend.insert_before(parent, anchor, node),
            None => self.backend.append_child(parent, node),
        }
    }

    fn mount_child(
        &mut self,
        child: &ModelChild,
        real_parent: Option<NodeId>,
        anchor: Option<NodeId>,
    ) -> Mounted {
        match child {
            ModelChild::Text(text) => {
                let id = self.alloc();
                self.backend.create_text(id, text);
                self.attach(real_parent, anchor, id);
                Mounted {
                    backend_node: Some(id),
                    kind: MountedKind::Text,
                    children: Vec::new(),
                }
            }
            ModelChild::Node(model) => self.mount_model(model, real_parent, anchor),
        }
    }

    fn mount_model(
        &mut self,
        model: &Model,
        real_parent: Option<NodeId>,
        anchor: Option<NodeId>,
    ) -> Mounted {
        if let Some(source) = &model.import_source {
            return self.mount_module(model, source.clone(), real_parent, anchor);
        }

        // Fragments and zero-width nodes emit no element of their own;
        // their children splice into the real parent at this position.
        if model.tag_name.is_empty() {
            let children = model
                .children
                .iter()
                .map(|child| self.mount_child(child, real_parent, anchor))
                .collect();
            return Mounted {
                backend_node: None,
                kind: MountedKind::Fragment,
                children,
            };
        }

        if is_inline_script(model) {
            let cleanup = self.eval_inline_script(&script_text(model));
            return Mounted {
                backend_node: None,
                kind: MountedKind::Script { cleanup },
                children: Vec::new(),
            };
        }

        let id = self.alloc();
        self.backend.create_element(id, &model.tag_name);
        for (name, value) in &model.attributes {
            self.backend.set_attribute(id, name, value);
        }
        for (event, descriptor) in &model.event_handlers {
            self.backend.add_event_listener(id, event, descriptor);
        }
        let children = model
            .children
            .iter()
            .map(|child| self.mount_child(child, Some(id), None))
            .collect();
        self.attach(real_parent, anchor, id);
        Mounted {
            backend_node: Some(id),
            kind: MountedKind::Element,
            children,
        }
    }

    fn mount_module(
        &mut self,
        model: &Model,
        source: ImportSourceModel,
        real_parent: Option<NodeId>,
        anchor: Option<NodeId>,
    ) -> Mounted {
        match self.loader.load(&source) {
            Ok(module) => {
                let id = self.alloc();
                // The tag names the module's export, not an HTML element;
                // the binding renders into a neutral container.
                self.backend.create_element(id, "div");
                self.attach(real_parent, anchor, id);
                let mut binding = module.bind(id, (self.channel_factory)());
                binding.render(&sanitize_module_model(model, &source));
                Mounted {
                    backend_node: Some(id),
                    kind: MountedKind::Module {
                        binding,
                        module,
                        source,
                    },
                    children: Vec::new(),
                }
            }
            Err(err) => {
                tracing::error!("{err}");
                match &source.fallback {
                    Some(fallback) => self.mount_child(&fallback.clone(), real_parent, anchor),
                    None => Mounted {
                        backend_node: None,
                        kind: MountedKind::Fragment,
                        children: Vec::new(),
                    },
                }
            }
        }
    }

    fn eval_inline_script(&mut self, code: &str) -> Option<ScriptCleanup> {
        if !self.options.allow_inline_scripts {
            tracing::warn!(
                "inline script ignored; enable ClientOptions::allow_inline_scripts to opt in"
            );
            return None;
        }
        self.backend.eval_script(code)
    }

    // -- diffing -----------------------------------------------------------

    fn sync_node(
        &mut self,
        mounted: &mut Mounted,
        old: &ModelChild,
        new: &ModelChild,
        real_parent: Option<NodeId>,
        anchor: Option<NodeId>,
    ) {
        match (old, new) {
            (ModelChild::Text(old_text), ModelChild::Text(new_text)) => {
                if old_text != new_text {
                    if let Some(id) = mounted.backend_node {
                        self.backend.set_text(id, new_text);
                    }
                }
            }
            (ModelChild::Node(old_model), ModelChild::Node(new_model))
                if compatible(old_model, new_model) =>
            {
                self.patch_model(mounted, old_model, new_model, real_parent, anchor);
            }
            _ => {
                // Identity changed: build the replacement in place, then
                // drop the old subtree.
                let fresh = self.mount_child(new, real_parent, anchor);
                let stale = std::mem::replace(mounted, fresh);
                self.unmount(stale, true);
            }
        }
    }

    fn patch_model(
        &mut self,
        mounted: &mut Mounted,
        old_model: &Model,
        new_model: &Model,
        real_parent: Option<NodeId>,
        anchor: Option<NodeId>,
    ) {
        match &mut mounted.kind {
            MountedKind::Module {
                binding,
                module,
                source,
            } => {
                *source = new_model
                    .import_source
                    .clone()
                    .expect("module node keeps its import source");
                if source.unmount_before_update {
                    binding.unmount();
                    let node = mounted
                        .backend_node
                        .expect("module node has a backend node");
                    *binding = module.bind(node, (self.channel_factory)());
                }
                binding.render(&sanitize_module_model(new_model, source));
            }
            MountedKind::Script { cleanup } => {
                let old_code = script_text(old_model);
                let new_code = script_text(new_model);
                if old_code != new_code {
                    if let Some(run) = cleanup.take() {
                        run();
                    }
                    *cleanup = self.eval_inline_script(&new_code);
                }
            }
            MountedKind::Element => {
                let id = mounted.backend_node.expect("element has a backend node");
                self.sync_attributes(
                    id,
                    &new_model.tag_name,
                    &old_model.attributes,
                    &new_model.attributes,
                );
                self.sync_listeners(id, &old_model.event_handlers, &new_model.event_handlers);
                self.sync_children(
                    &mut mounted.children,
                    &old_model.children,
                    &new_model.children,
                    Some(id),
                    None,
                );
            }
            MountedKind::Fragment => {
                self.sync_children(
                    &mut mounted.children,
                    &old_model.children,
                    &new_model.children,
                    real_parent,
                    anchor,
                );
            }
            MountedKind::Text => {}
        }
    }

    fn sync_attributes(
        &mut self,
        id: NodeId,
        tag: &str,
        old: &BTreeMap<String, AttributeValue>,
        new: &BTreeMap<String, AttributeValue>,
    ) {
        for name in old.keys() {
            if !new.contains_key(name) {
                self.backend.remove_attribute(id, name);
                if name == "value" {
                    self.input_values.remove(&id.0);
                }
            }
        }

        for (name, value) in new {
            if old.get(name) == Some(value) {
                continue;
            }
            if name == "value" && is_user_input_tag(tag) {
                if let AttributeValue::Text(server_value) = value {
                    // The server is telling us what the user already typed;
                    // re-applying it would reset the cursor.
                    if self.input_values.get(&id.0) == Some(server_value) {
                        continue;
                    }
                }
                self.input_values.remove(&id.0);
            }
            self.backend.set_attribute(id, name, value);
        }
    }

    fn sync_listeners(
        &mut self,
        id: NodeId,
        old: &BTreeMap<String, EventTarget>,
        new: &BTreeMap<String, EventTarget>,
    ) {
        for event in old.keys() {
            if !new.contains_key(event) {
                self.backend.remove_event_listener(id, event);
            }
        }
        for (event, descriptor) in new {
            match old.get(event) {
                Some(previous) if previous == descriptor => {}
                Some(_) => {
                    self.backend.remove_event_listener(id, event);
                    self.backend.add_event_listener(id, event, descriptor);
                }
                None => self.backend.add_event_listener(id, event, descriptor),
            }
        }
    }

    /// Keyed child sync. Pairs like the layout does (key when both sides
    /// have one, position otherwise), keeps the longest increasing run of
    /// retained children in place, and moves or mounts the rest in one
    /// right-to-left pass with a running anchor.
    fn sync_children(
        &mut self,
        mounted_children: &mut Vec<Mounted>,
        old_children: &[ModelChild],
        new_children: &[ModelChild],
        real_parent: Option<NodeId>,
        tail_anchor: Option<NodeId>,
    ) {
        let mut old_slots: Vec<Option<Mounted>> =
            std::mem::take(mounted_children).into_iter().map(Some).collect();

        let mut keyed: FxHashMap<&str, usize> = FxHashMap::default();
        for (index, child) in old_children.iter().enumerate() {
            if let Some(key) = child_key(child) {
                keyed.insert(key, index);
            }
        }

        let pairs: Vec<Option<usize>> = new_children
            .iter()
            .enumerate()
            .map(|(index, child)| match child_key(child) {
                Some(key) => keyed.remove(key),
                None => match old_children.get(index) {
                    Some(old) if child_key(old).is_none() => Some(index),
                    _ => None,
                },
            })
            .collect();

        // The longest increasing run of retained old indices stays put in
        // the DOM; everything else moves. This leaves the maximum number of
        // nodes untouched.
        let retained: Vec<usize> = pairs.iter().filter_map(|pair| *pair).collect();
        let mut stable_seq = FxHashSet::default();
        let mut predecessors = vec![0; retained.len()];
        let mut starts = vec![0; retained.len()];
        lis_with(
            &retained,
            &mut stable_seq,
            |a, b| a < b,
            &mut predecessors,
            &mut starts,
        );
        let stable: FxHashSet<usize> = stable_seq.into_iter().map(|k| retained[k]).collect();

        let mut new_mounted: Vec<Option<Mounted>> =
            (0..new_children.len()).map(|_| None).collect();
        let mut anchor = tail_anchor;

        for (index, new_child) in new_children.iter().enumerate().rev() {
            let mounted = match pairs[index] {
                Some(old_index) => {
                    let mut mounted = old_slots[old_index]
                        .take()
                        .expect("paired child is still mounted");
                    self.sync_node(
                        &mut mounted,
                        &old_children[old_index],
                        new_child,
                        real_parent,
                        anchor,
                    );
                    if !stable.contains(&old_index) {
                        self.move_before(&mounted, real_parent, anchor);
                    }
                    mounted
                }
                None => self.mount_child(new_child, real_parent, anchor),
            };
            anchor = first_backend_node(&mounted).or(anchor);
            new_mounted[index] = Some(mounted);
        }

        for leftover in old_slots.into_iter().flatten() {
            self.unmount(leftover, true);
        }

        *mounted_children = new_mounted
            .into_iter()
            .map(|mounted| mounted.expect("every new child was mounted"))
            .collect();
    }

    fn move_before(&mut self, mounted: &Mounted, parent: Option<NodeId>, anchor: Option<NodeId>) {
        let mut nodes = Vec::new();
        collect_backend_nodes(mounted, &mut nodes);
        for node in nodes {
            self.attach(parent, anchor, node);
        }
    }

    fn unmount(&mut self, mounted: Mounted, remove_from_dom: bool) {
        match mounted.kind {
            MountedKind::Module { mut binding, .. } => binding.unmount(),
            MountedKind::Script { cleanup } => {
                if let Some(run) = cleanup {
                    run();
                }
            }
            _ => {}
        }

        // Children inside a removed element disappear with it; only nodes
        // spliced through fragments need their own removal.
        let remove_children = remove_from_dom && mounted.backend_node.is_none();
        for child in mounted.children {
            self.unmount(child, remove_children);
        }

        if let Some(id) = mounted.backend_node {
            self.input_values.remove(&id.0);
            if remove_from_dom {
                self.backend.remove_node(id);
            }
        }
    }
}

// -- structure helpers ------------------------------------------------------

fn child_key(child: &ModelChild) -> Option<&str> {
    match child {
        ModelChild::Node(model) => model.key.as_deref(),
        ModelChild::Text(_) => None,
    }
}

fn is_user_input_tag(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

fn is_inline_script(model: &Model) -> bool {
    model.tag_name == "script" && model.attributes.is_empty()
}

fn script_text(model: &Model) -> String {
    model
        .children
        .iter()
        .filter_map(|child| match child {
            ModelChild::Text(text) => Some(text.as_str()),
            ModelChild::Node(_) => None,
        })
        .collect()
}

/// Two model nodes are the same client-side identity: same rendering path
/// (normal / inline-script / module) and same tag, with modules also pinned
/// to their source.
fn compatible(old: &Model, new: &Model) -> bool {
    match (&old.import_source, &new.import_source) {
        (Some(old_source), Some(new_source)) => {
            old.tag_name == new.tag_name
                && old_source.source == new_source.source
                && old_source.source_type == new_source.source_type
        }
        (None, None) => {
            old.tag_name == new.tag_name && is_inline_script(old) == is_inline_script(new)
        }
        _ => false,
    }
}

fn first_backend_node(mounted: &Mounted) -> Option<NodeId> {
    if let Some(id) = mounted.backend_node {
        return Some(id);
    }
    mounted.children.iter().find_map(first_backend_node)
}

fn collect_backend_nodes(mounted: &Mounted, out: &mut Vec<NodeId>) {
    if let Some(id) = mounted.backend_node {
        out.push(id);
        return;
    }
    for child in &mounted.children {
        collect_backend_nodes(child, out);
    }
}

fn descend_mut<'a>(root: &'a mut Mounted, indices: &[usize]) -> Option<&'a mut Mounted> {
    let mut current = root;
    for &index in indices {
        current = current.children.get_mut(index)?;
    }
    Some(current)
}

/// The depth of the shallowest module-delegated ancestor strictly above the
/// node `indices` addresses, if any.
fn module_ancestor_depth(root: &Mounted, indices: &[usize]) -> Option<usize> {
    let mut current = root;
    for (depth, &index) in indices.iter().enumerate() {
        if matches!(current.kind, MountedKind::Module { .. }) {
            return Some(depth);
        }
        current = current.children.get(index)?;
    }
    None
}

/// The nearest real (backend-node-bearing) ancestor of the addressed node.
fn find_real_parent(root: &Mounted, indices: &[usize]) -> Option<NodeId> {
    let mut real = None;
    let mut current = root;
    for &index in indices {
        if let Some(id) = current.backend_node {
            real = Some(id);
        }
        current = match current.children.get(index) {
            Some(child) => child,
            None => return real,
        };
    }
    real
}

/// The backend node immediately after the addressed position in flattened
/// document order, bounded by the nearest real ancestor.
fn find_anchor(root: &Mounted, indices: &[usize]) -> Option<NodeId> {
    fn search(current: &Mounted, indices: &[usize]) -> (Option<NodeId>, bool) {
        let Some((&index, rest)) = indices.split_first() else {
            return (None, false);
        };
        let Some(child) = current.children.get(index) else {
            return (None, current.backend_node.is_some());
        };

        let (found, stopped) = search(child, rest);
        if found.is_some() || stopped {
            return (found, stopped);
        }

        for sibling in &current.children[index + 1..] {
            if let Some(node) = first_backend_node(sibling) {
                return (Some(node), true);
            }
        }

        (None, current.backend_node.is_some())
    }

    search(root, indices).0
}

fn path_of(indices: &[usize]) -> String {
    let mut path = String::new();
    for index in indices {
        path.push_str("/children/");
        path.push_str(&index.to_string());
    }
    path
}
