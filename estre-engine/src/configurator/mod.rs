//! Configurator
//!
//! - [`visibility`] - attribute dependency resolver
//! - [`ConfigurationSession`] - per-category configuration state machine

mod session;
pub mod visibility;

pub use session::*;
pub use visibility::{is_visible, missing_required, visible_attributes};
