use lattice_core::prelude::use_hook;
use std::cell::RefCell;
use std::rc::Rc;

/// Memoize a closure across renders, keyed by `deps`.
///
/// Children receiving the returned `Rc` see the same allocation until `deps`
/// changes, so prop memoization keeps working for callback-carrying props.
pub fn use_callback<F, D>(deps: D, callback: F) -> Rc<F>
where
    F: 'static,
    D: PartialEq + Clone + 'static,
{
    let slot: Rc<RefCell<Option<(D, Rc<F>)>>> = use_hook(|| Rc::new(RefCell::new(None)));

    let mut stored = slot.borrow_mut();
    match &*stored {
        Some((old_deps, stored_callback)) if *old_deps == deps => stored_callback.clone(),
        _ => {
            let callback = Rc::new(callback);
            *stored = Some((deps, callback.clone()));
            callback
        }
    }
}
