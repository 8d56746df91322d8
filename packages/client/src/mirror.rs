//! The client's local copy of the server's model.

use lattice_core::{LayoutUpdate, Model, ProtocolError};

/// Mirrors the layout's model by replaying `layout-update` messages. Starts
/// empty; the first update always lands at path `""`.
#[derive(Debug, Default)]
pub struct Mirror {
    model: Model,
    synced: bool,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a root model has arrived since (re)connection.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Replace the subtree the update addresses.
    pub fn apply(&mut self, update: &LayoutUpdate) -> Result<(), ProtocolError> {
        if update.path.is_empty() {
            self.model = update.model.clone();
            self.synced = true;
            return Ok(());
        }
        if !self.synced {
            return Err(ProtocolError::Unresolvable {
                path: update.path.clone(),
            });
        }
        self.model.apply(&update.path, update.model.clone())
    }

    /// Forget everything; the next update must be a full resync.
    pub fn reset(&mut self) {
        self.model = Model::default();
        self.synced = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::{Model, ModelChild};

    #[test]
    fn patches_before_the_first_full_sync_are_rejected() {
        let mut mirror = Mirror::new();
        let patch = LayoutUpdate::new("/children/0", Model::default());
        assert!(mirror.apply(&patch).is_err());
    }

    #[test]
    fn full_sync_then_patch() {
        let mut mirror = Mirror::new();
        let mut root = Model {
            tag_name: "div".into(),
            ..Default::default()
        };
        root.children = vec![ModelChild::Node(Model {
            tag_name: "span".into(),
            ..Default::default()
        })];

        mirror.apply(&LayoutUpdate::new("", root)).unwrap();
        mirror
            .apply(&LayoutUpdate::new(
                "/children/0",
                Model {
                    tag_name: "p".into(),
                    ..Default::default()
                },
            ))
            .unwrap();

        let child = mirror.model().children[0].as_node().unwrap();
        assert_eq!(child.tag_name, "p");
    }
}
