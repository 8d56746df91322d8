use lattice_core::prelude::{attach_debug_value, debug_mode_active};
use std::fmt::Debug;

/// Attach a value to this component for inspection.
///
/// Does nothing unless the layout runs in debug mode, so the value is never
/// formatted in production.
pub fn use_debug_value<T: Debug>(value: &T) {
    if debug_mode_active() {
        attach_debug_value(format!("{value:?}"));
    }
}

/// Like [`use_debug_value`], with a custom formatter that only runs in
/// debug mode.
pub fn use_debug_value_with<T>(value: &T, format: impl FnOnce(&T) -> String) {
    if debug_mode_active() {
        attach_debug_value(format(value));
    }
}
