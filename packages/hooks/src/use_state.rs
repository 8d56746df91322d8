use lattice_core::prelude::{schedule_update, use_hook};
use std::cell::{Ref, RefCell};
use std::fmt::{Debug, Display};
use std::rc::Rc;

/// Store state between component renders.
///
/// Returns a handle to the current value plus a setter. Writing a new value
/// marks the component dirty; the next render observes it. Writes are
/// batched within one event handler: plain `set` calls are last-write-wins,
/// while `modify` folds over the latest written value, so N updates cause
/// exactly one re-render.
///
/// Setting a value equal to the current one is a no-op.
///
/// ```rust, ignore
/// fn counter(_: ()) -> Element {
///     let count = use_state(|| 0);
///
///     Some(
///         button()
///             .on("click", {
///                 to_owned![count];
///                 move |_| count.modify(|n| n + 1)
///             })
///             .child(count.get().to_string())
///             .build(),
///     )
/// }
/// ```
pub fn use_state<T>(initial: impl FnOnce() -> T) -> UseState<T>
where
    T: Clone + PartialEq + 'static,
{
    use_hook(|| UseState {
        slot: Rc::new(RefCell::new(initial())),
        update: schedule_update(),
    })
}

pub struct UseState<T: 'static> {
    slot: Rc<RefCell<T>>,
    update: Rc<dyn Fn()>,
}

impl<T: Clone + PartialEq + 'static> UseState<T> {
    /// The latest written value. Between renders this already reflects any
    /// pending sets from the current event handler.
    pub fn get(&self) -> T {
        self.slot.borrow().clone()
    }

    /// Borrow the value without cloning.
    pub fn read(&self) -> Ref<'_, T> {
        self.slot.borrow()
    }

    /// Replace the value. Equal values are ignored entirely.
    pub fn set(&self, new: T) {
        {
            let mut slot = self.slot.borrow_mut();
            if *slot == new {
                return;
            }
            *slot = new;
        }
        (self.update)();
    }

    /// Compute the next value from the latest written one. Repeated calls in
    /// one handler see each other's output, which is what makes
    /// `modify(|n| n + 1)` three times count by three.
    pub fn modify(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.slot.borrow());
        self.set(next);
    }

    /// The setter alone, for handing to child components.
    pub fn setter(&self) -> Rc<dyn Fn(T)> {
        let this = self.clone();
        Rc::new(move |new| this.set(new))
    }
}

impl<T: 'static> Clone for UseState<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            update: self.update.clone(),
        }
    }
}

impl<T: Display + 'static> Display for UseState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slot.borrow())
    }
}

impl<T: Debug + 'static> Debug for UseState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.slot.borrow())
    }
}

impl<T: PartialEq + 'static> PartialEq<T> for UseState<T> {
    fn eq(&self, other: &T) -> bool {
        &*self.slot.borrow() == other
    }
}
