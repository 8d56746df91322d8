use lattice_core::prelude::use_hook;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// A persistent mutable container whose mutation does **not** schedule a
/// render. Use it for values the UI does not depend on directly: timers,
/// counters feeding effects, handles to external resources.
pub fn use_ref<T: 'static>(initial: impl FnOnce() -> T) -> UseRef<T> {
    use_hook(|| UseRef {
        inner: Rc::new(RefCell::new(initial())),
    })
}

pub struct UseRef<T: 'static> {
    inner: Rc<RefCell<T>>,
}

impl<T: 'static> UseRef<T> {
    pub fn read(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    pub fn write(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    pub fn with<O>(&self, f: impl FnOnce(&T) -> O) -> O {
        f(&self.inner.borrow())
    }

    pub fn with_mut<O>(&self, f: impl FnOnce(&mut T) -> O) -> O {
        f(&mut self.inner.borrow_mut())
    }

    pub fn set(&self, value: T) {
        *self.inner.borrow_mut() = value;
    }
}

impl<T: 'static> Clone for UseRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
