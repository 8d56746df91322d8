use lattice_core::prelude::{
    current_scope_id, provide_context, push_drop_callback, schedule_update_any,
    try_consume_context, use_hook, ScopeId,
};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// A provided context value plus the scopes subscribed to it.
///
/// Subscribers are tracked by scope ID only, so an unmounted consumer is
/// never kept alive by its provider; consumers unsubscribe through a drop
/// callback holding a weak reference back to the provider.
pub struct ContextProvider<T> {
    value: RefCell<T>,
    subscribers: RefCell<FxHashSet<ScopeId>>,
    update_any: Rc<dyn Fn(ScopeId)>,
}

/// Provide a context of type `T` to every descendant of this component.
///
/// Call it with the current value on each render: when the value compares
/// unequal to the previous one, every subscribed consumer re-renders.
pub fn use_context_provider<T>(value: T) -> T
where
    T: Clone + PartialEq + 'static,
{
    let provider = use_hook(|| {
        let provider = Rc::new(ContextProvider {
            value: RefCell::new(value.clone()),
            subscribers: RefCell::new(FxHashSet::default()),
            update_any: schedule_update_any(),
        });
        provide_context(provider.clone());
        provider
    });

    let changed = *provider.value.borrow() != value;
    if changed {
        *provider.value.borrow_mut() = value.clone();
        for subscriber in provider.subscribers.borrow().iter() {
            (provider.update_any)(*subscriber);
        }
    }

    value
}

/// Subscribe to the nearest ancestor provider of `T`.
///
/// Returns `None` when no ancestor provides one. The subscription lasts
/// until this component unmounts; a changed provider value re-renders this
/// component.
pub fn use_context<T>() -> Option<T>
where
    T: Clone + PartialEq + 'static,
{
    let provider = use_hook(|| {
        let provider = try_consume_context::<Rc<ContextProvider<T>>>();
        if let (Some(provider), Some(id)) = (&provider, current_scope_id()) {
            provider.subscribers.borrow_mut().insert(id);
            let weak = Rc::downgrade(provider);
            push_drop_callback(move || {
                if let Some(provider) = weak.upgrade() {
                    provider.subscribers.borrow_mut().remove(&id);
                }
            });
        }
        provider
    });

    provider.map(|provider| provider.value.borrow().clone())
}
