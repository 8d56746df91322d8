use lattice_core::prelude::{schedule_update, use_hook};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// An alternative to [`use_state`](crate::use_state) for state that evolves
/// through a fixed set of actions.
///
/// Dispatches are batched exactly like state setters: each dispatch folds
/// the reducer over the latest value, and a reduction that produces an equal
/// state is a no-op.
///
/// ```rust, ignore
/// enum Action { Increment, Reset }
///
/// let count = use_reducer(
///     |state: &i32, action| match action {
///         Action::Increment => state + 1,
///         Action::Reset => 0,
///     },
///     || 0,
/// );
/// count.dispatch(Action::Increment);
/// ```
pub fn use_reducer<S, A, R>(reducer: R, initial: impl FnOnce() -> S) -> UseReducer<S, A>
where
    S: Clone + PartialEq + 'static,
    A: 'static,
    R: Fn(&S, A) -> S + 'static,
{
    use_hook(|| {
        let slot = Rc::new(RefCell::new(initial()));
        let update = schedule_update();
        let dispatch = {
            let slot = slot.clone();
            Rc::new(move |action: A| {
                let next = reducer(&slot.borrow(), action);
                let mut current = slot.borrow_mut();
                if *current != next {
                    *current = next;
                    drop(current);
                    update();
                }
            }) as Rc<dyn Fn(A)>
        };
        UseReducer { slot, dispatch }
    })
}

pub struct UseReducer<S: 'static, A: 'static> {
    slot: Rc<RefCell<S>>,
    dispatch: Rc<dyn Fn(A)>,
}

impl<S: Clone + 'static, A: 'static> UseReducer<S, A> {
    pub fn get(&self) -> S {
        self.slot.borrow().clone()
    }

    pub fn read(&self) -> Ref<'_, S> {
        self.slot.borrow()
    }

    pub fn dispatch(&self, action: A) {
        (self.dispatch)(action);
    }

    /// The dispatcher alone, for handing to child components.
    pub fn dispatcher(&self) -> Rc<dyn Fn(A)> {
        self.dispatch.clone()
    }
}

impl<S: 'static, A: 'static> Clone for UseReducer<S, A> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}
