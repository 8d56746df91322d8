use lattice_core::prelude::{push_drop_callback, push_effect, use_hook};
use std::cell::RefCell;
use std::rc::Rc;

struct EffectSlot<D> {
    deps: Option<D>,
    cleanup: Option<Box<dyn FnOnce()>>,
}

/// Run a side effect after every render of this component.
///
/// The setup closure runs once the update carrying this render has been
/// produced, and returns a cleanup closure. The cleanup runs before the next
/// setup, and once more when the component unmounts. Return `|| {}` when
/// there is nothing to tear down.
pub fn use_effect<F, C>(setup: F)
where
    F: FnOnce() -> C + 'static,
    C: FnOnce() + 'static,
{
    let slot = effect_slot::<()>();
    push_effect(move || {
        let previous = slot.borrow_mut().cleanup.take();
        if let Some(cleanup) = previous {
            cleanup();
        }
        let cleanup = setup();
        slot.borrow_mut().cleanup = Some(Box::new(cleanup));
    });
}

/// Run a side effect when `deps` changes.
///
/// The setup runs on first mount and whenever `deps` compares unequal to
/// the value it held the last time the effect ran.
///
/// ```rust, ignore
/// use_effect_with_deps(
///     move |user_id| {
///         subscribe(*user_id);
///         move || unsubscribe()
///     },
///     user_id,
/// );
/// ```
pub fn use_effect_with_deps<F, C, D>(setup: F, deps: D)
where
    F: FnOnce(&D) -> C + 'static,
    C: FnOnce() + 'static,
    D: PartialEq + Clone + 'static,
{
    let slot = effect_slot::<D>();

    let changed = slot
        .borrow()
        .deps
        .as_ref()
        .map(|stored| *stored != deps)
        .unwrap_or(true);
    if !changed {
        return;
    }

    push_effect(move || {
        let previous = slot.borrow_mut().cleanup.take();
        if let Some(cleanup) = previous {
            cleanup();
        }
        let cleanup = setup(&deps);
        let mut slot = slot.borrow_mut();
        slot.cleanup = Some(Box::new(cleanup));
        slot.deps = Some(deps);
    });
}

/// Allocate the hook slot and wire its unmount cleanup. Each setup's cleanup
/// runs at most once: it is taken out of the slot before being called.
fn effect_slot<D: 'static>() -> Rc<RefCell<EffectSlot<D>>> {
    use_hook(|| {
        let slot = Rc::new(RefCell::new(EffectSlot::<D> {
            deps: None,
            cleanup: None,
        }));
        push_drop_callback({
            let slot = slot.clone();
            move || {
                if let Some(cleanup) = slot.borrow_mut().cleanup.take() {
                    cleanup();
                }
            }
        });
        slot
    })
}
