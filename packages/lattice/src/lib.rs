#![doc = include_str!("../README.md")]

pub use lattice_core as core;
pub use lattice_hooks as hooks;
pub use lattice_html as html;

#[cfg(feature = "client")]
pub use lattice_client as client;

#[cfg(feature = "liveview")]
pub use lattice_liveview as liveview;

pub mod prelude {
    pub use lattice_core::prelude::*;
    pub use lattice_hooks::*;
    pub use lattice_html::prelude::*;

    #[cfg(feature = "liveview")]
    pub use lattice_liveview::{LiveViewConfig, LiveViewPool};
}
