//! Value types for grid references, selections, navigation and deltas.

mod delta;
mod label;
mod navigation;
mod reference;
mod selection;
mod viewport;
mod window;

pub use delta::*;
pub use label::*;
pub use navigation::*;
pub use reference::*;
pub use selection::*;
pub use viewport::*;
pub use window::*;
