//! Import-source elements: loading, binding, fallbacks, and the
//! ancestor/child source invariant.

use lattice_client::modules::{Module, ModuleBinding, ModuleChannel, ModuleLoader};
use lattice_client::testing::TestDom;
use lattice_client::{ClientError, NodeId, Reconciler};
use lattice_core::{ImportSourceModel, LayoutUpdate, Model, ModelChild};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

struct RecordingLoader {
    log: Log,
    fail: bool,
}

struct RecordingModule {
    log: Log,
    source: String,
}

struct RecordingBinding {
    log: Log,
    source: String,
}

impl ModuleLoader for RecordingLoader {
    fn load(&mut self, source: &ImportSourceModel) -> Result<Rc<dyn Module>, ClientError> {
        if self.fail {
            return Err(ClientError::ImportSourceFailure {
                import_source: source.source.clone(),
                message: "network down".to_string(),
            });
        }
        self.log.borrow_mut().push(format!("load {}", source.source));
        Ok(Rc::new(RecordingModule {
            log: self.log.clone(),
            source: source.source.clone(),
        }))
    }
}

impl Module for RecordingModule {
    fn bind(&self, _node: NodeId, _channel: ModuleChannel) -> Box<dyn ModuleBinding> {
        self.log.borrow_mut().push(format!("bind {}", self.source));
        Box::new(RecordingBinding {
            log: self.log.clone(),
            source: self.source.clone(),
        })
    }
}

impl ModuleBinding for RecordingBinding {
    fn render(&mut self, model: &Model) {
        let children = serde_json::to_string(&model.children).unwrap_or_default();
        self.log
            .borrow_mut()
            .push(format!("render {} {children}", self.source));
    }

    fn unmount(&mut self) {
        self.log.borrow_mut().push(format!("unmount {}", self.source));
    }
}

fn client(log: &Log, fail: bool) -> Reconciler<TestDom> {
    Reconciler::new(
        TestDom::new(),
        Box::new(RecordingLoader {
            log: log.clone(),
            fail,
        }),
    )
}

fn update(path: &str, value: serde_json::Value) -> LayoutUpdate {
    LayoutUpdate::new(path, serde_json::from_value(value).expect("valid model json"))
}

#[test]
fn modules_load_bind_and_render_once_per_identity() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut reconciler = client(&log, false);

    reconciler
        .apply(&update(
            "",
            json!({
                "tagName": "Chart",
                "importSource": { "source": "charts", "sourceType": "NAME" },
                "children": [ { "tagName": "series", "children": ["data"] } ],
            }),
        ))
        .unwrap();

    let entries = log.borrow();
    assert_eq!(entries[0], "load charts");
    assert_eq!(entries[1], "bind charts");
    assert!(entries[2].starts_with("render charts"));
    assert_eq!(entries.len(), 3);
}

#[test]
fn mismatched_child_sources_render_the_fallback_and_never_bind() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut reconciler = client(&log, false);

    reconciler
        .apply(&update(
            "",
            json!({
                "tagName": "Chart",
                "importSource": { "source": "charts", "sourceType": "NAME" },
                "children": [
                    {
                        "tagName": "Rogue",
                        "importSource": {
                            "source": "other-library",
                            "sourceType": "NAME",
                            "fallback": { "tagName": "span", "children": ["fallback"] },
                        },
                    },
                ],
            }),
        ))
        .unwrap();

    let entries = log.borrow().clone();
    // Only the ancestor module was ever loaded or bound.
    assert!(entries.iter().all(|entry| !entry.contains("other-library")));
    // The binding saw the fallback in the rogue child's place.
    let render = entries.iter().find(|entry| entry.starts_with("render")).unwrap();
    assert!(render.contains("fallback"));
    assert!(!render.contains("Rogue"));
}

#[test]
fn load_failures_mount_the_declared_fallback() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut reconciler = client(&log, true);

    reconciler
        .apply(&update(
            "",
            json!({
                "tagName": "Chart",
                "importSource": {
                    "source": "charts",
                    "sourceType": "NAME",
                    "fallback": { "tagName": "p", "children": ["still loading"] },
                },
            }),
        ))
        .unwrap();

    assert_eq!(reconciler.backend().render_to_string(), "<p>still loading</p>");
    assert!(log.borrow().is_empty());
}

#[test]
fn unmount_before_update_rebinds_each_render() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut reconciler = client(&log, false);

    let chart = |label: &str| {
        json!({
            "tagName": "Chart",
            "importSource": {
                "source": "charts",
                "sourceType": "NAME",
                "unmountBeforeUpdate": true,
            },
            "children": [label],
        })
    };

    reconciler.apply(&update("", chart("first"))).unwrap();
    reconciler.apply(&update("", chart("second"))).unwrap();

    let entries = log.borrow().clone();
    let sequence: Vec<&str> = entries
        .iter()
        .map(|entry| entry.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(sequence, ["load", "bind", "render", "unmount", "bind", "render"]);
}

#[test]
fn patches_inside_a_module_subtree_rerender_the_binding() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut reconciler = client(&log, false);

    reconciler
        .apply(&update(
            "",
            json!({
                "tagName": "div",
                "children": [
                    {
                        "tagName": "Chart",
                        "importSource": { "source": "charts", "sourceType": "NAME" },
                        "children": [ { "tagName": "series", "children": ["v1"] } ],
                    },
                ],
            }),
        ))
        .unwrap();
    log.borrow_mut().clear();

    // The server patches a node the module owns.
    reconciler
        .apply(&update(
            "/children/0/children/0",
            json!({ "tagName": "series", "children": ["v2"] }),
        ))
        .unwrap();

    let entries = log.borrow().clone();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("render charts"));
    assert!(entries[0].contains("v2"));
}

#[test]
fn sanitize_drops_only_mismatched_descendants() {
    let source: ImportSourceModel = serde_json::from_value(json!({
        "source": "charts",
        "sourceType": "NAME",
    }))
    .unwrap();
    let model: Model = serde_json::from_value(json!({
        "tagName": "Chart",
        "importSource": { "source": "charts", "sourceType": "NAME" },
        "children": [
            { "tagName": "Inner", "importSource": { "source": "charts", "sourceType": "NAME" } },
            { "tagName": "Rogue", "importSource": { "source": "elsewhere", "sourceType": "URL" } },
        ],
    }))
    .unwrap();

    let sanitized = lattice_client::sanitize_module_model(&model, &source);
    let ModelChild::Node(kept) = &sanitized.children[0] else {
        panic!("matching child kept");
    };
    assert_eq!(kept.tag_name, "Inner");
    let ModelChild::Node(dropped) = &sanitized.children[1] else {
        panic!("mismatch replaced by a node");
    };
    assert_eq!(dropped.tag_name, "", "no fallback declared: zero-width node");
}
