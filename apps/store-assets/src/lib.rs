//! Store asset tooling: extension icons and store-ready screenshots.

pub mod icons;
pub mod logging;
pub mod scanner;
pub mod screenshots;

pub use icons::generate_icon_set;
pub use screenshots::{normalize_batch, BatchCallbacks, BatchProgress};
