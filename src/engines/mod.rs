//! Search engine module
//!
//! Defines the engine enumeration, the driver traits and the registry that
//! maps each engine to its driver.

mod json;
mod kind;
mod loader;
mod registry;
mod traits;

// Driver implementations
pub mod tencent;
pub mod youku;

pub use kind::{Engine, UnknownEngine};
pub use loader::DriverLoader;
pub use registry::DriverRegistry;
pub use traits::*;
