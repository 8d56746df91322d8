//! The module fetch endpoint's backing store.
//!
//! A client resolving an import source with `sourceType = NAME` asks the
//! host for `{prefix}/modules/{name}`. The registry holds dynamically-built
//! ES module shims, typically one-line re-exports of a CDN distribution.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: Arc<RwLock<HashMap<String, String>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register module text under a name.
    pub fn register(&self, name: impl Into<String>, source: impl Into<String>) {
        self.modules
            .write()
            .expect("module registry lock")
            .insert(name.into(), source.into());
    }

    /// Register a shim that re-exports a library from a CDN.
    pub fn register_cdn_shim(&self, name: impl Into<String>, url: &str) {
        let shim = format!("export * from \"{url}\";\nexport {{ default }} from \"{url}\";\n");
        self.register(name, shim);
    }

    /// The module text for `name`, served as `application/javascript`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.modules
            .read()
            .expect("module registry lock")
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.modules
            .read()
            .expect("module registry lock")
            .keys()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shims_reexport_the_cdn_url() {
        let registry = ModuleRegistry::new();
        registry.register_cdn_shim("charts", "https://esm.sh/charts@4");
        let shim = registry.get("charts").unwrap();
        assert!(shim.contains("export * from \"https://esm.sh/charts@4\""));
        assert!(registry.get("missing").is_none());
    }
}
