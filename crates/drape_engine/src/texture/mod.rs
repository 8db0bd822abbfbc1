//! Derived texture generation

pub mod normal_map;

pub use normal_map::{NormalMap, NormalMapSynthesizer};
