//! Foundation layer: math types, logging, and collections
//!
//! Everything here is dependency-light and usable from any other module.

pub mod collections;
pub mod logging;
pub mod math;
