#![doc = include_str!("../README.md")]

/// A helper macro for cloning captured values into event handlers and tasks.
///
/// ```rust, ignore
/// let items = use_state(Vec::new);
/// let on_click = {
///     to_owned![items];
///     move |_| items.modify(|list| list.iter().cloned().rev().collect())
/// };
/// ```
#[macro_export]
macro_rules! to_owned {
    ($($name:ident),+ $(,)?) => {
        $(
            #[allow(unused_mut)]
            let mut $name = $name.to_owned();
        )+
    };
}

mod use_callback;
pub use use_callback::*;

mod use_connection;
pub use use_connection::*;

mod use_context;
pub use use_context::*;

mod use_debug_value;
pub use use_debug_value::*;

mod use_effect;
pub use use_effect::*;

mod use_memo;
pub use use_memo::*;

mod use_reducer;
pub use use_reducer::*;

mod use_ref;
pub use use_ref::*;

mod use_state;
pub use use_state::*;
