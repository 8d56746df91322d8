#![doc = include_str!("../README.md")]
#![allow(non_snake_case)]

pub mod attributes;
pub mod elements;
pub mod events;

pub use attributes::{normalize_attribute_name, normalize_attributes, normalize_style_value};
pub use elements::*;

pub mod prelude {
    pub use crate::elements::{element, fragment, text, ElementBuilder, IntoVNode};
    pub use crate::events::{EventCategory, EventData};
}
