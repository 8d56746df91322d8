//! Input flicker avoidance: the user's buffer wins until the server
//! genuinely diverges from it.

use lattice_client::modules::{Module, ModuleLoader};
use lattice_client::testing::TestDom;
use lattice_client::{ClientError, Reconciler};
use lattice_core::{ImportSourceModel, LayoutUpdate, Model};
use serde_json::json;

struct NoModules;

impl ModuleLoader for NoModules {
    fn load(&mut self, source: &ImportSourceModel) -> Result<std::rc::Rc<dyn Module>, ClientError> {
        Err(ClientError::ImportSourceFailure {
            import_source: source.source.clone(),
            message: "no loader in this test".to_string(),
        })
    }
}

fn form_update(value: &str) -> LayoutUpdate {
    let model: Model = serde_json::from_value(json!({
        "tagName": "div",
        "children": [
            { "tagName": "input", "attributes": { "value": value } },
        ],
    }))
    .unwrap();
    LayoutUpdate::new("", model)
}

fn input_value(client: &Reconciler<TestDom>) -> String {
    let input = client.backend().find_by_tag("input")[0];
    match &client.backend().node(input).attributes["value"] {
        lattice_core::AttributeValue::Text(text) => text.clone(),
        other => panic!("unexpected value attribute: {other:?}"),
    }
}

#[test]
fn a_server_value_matching_the_buffer_is_not_reapplied() {
    let mut client = Reconciler::new(TestDom::new(), Box::new(NoModules));
    client.apply(&form_update("hello")).unwrap();
    let input = client.backend().find_by_tag("input")[0];

    // The user typed; the server echoes the new value back (the usual
    // controlled-input round trip). The value *did* change server-side,
    // but it agrees with the recorded buffer.
    client.record_input(input, "hello!");
    client.apply(&form_update("hello!")).unwrap();

    // No set_attribute fired: the DOM still holds the browser's own text,
    // cursor intact.
    assert_eq!(input_value(&client), "hello");
}

#[test]
fn a_diverging_server_value_overwrites_the_buffer() {
    let mut client = Reconciler::new(TestDom::new(), Box::new(NoModules));
    client.apply(&form_update("hello")).unwrap();
    let input = client.backend().find_by_tag("input")[0];

    client.record_input(input, "hello!");
    client.apply(&form_update("reset")).unwrap();

    // Server authority: the value diverged, so it lands.
    assert_eq!(input_value(&client), "reset");

    // And the stale buffer is gone: the next echo applies normally.
    client.apply(&form_update("reset2")).unwrap();
    assert_eq!(input_value(&client), "reset2");
}
