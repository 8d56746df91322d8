use lattice_core::prelude::use_hook;
use std::cell::RefCell;
use std::rc::Rc;

/// Memoize a computation across renders, keyed by `deps`.
///
/// `compute` runs on first render and again whenever `deps` compares unequal
/// to the previous render's; otherwise the cached value is returned.
pub fn use_memo<T, D>(deps: D, compute: impl FnOnce(&D) -> T) -> T
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
{
    let slot: Rc<RefCell<Option<(D, T)>>> = use_hook(|| Rc::new(RefCell::new(None)));

    let mut stored = slot.borrow_mut();
    match &*stored {
        Some((old_deps, value)) if *old_deps == deps => value.clone(),
        _ => {
            let value = compute(&deps);
            *stored = Some((deps, value.clone()));
            value
        }
    }
}
