//! shelf application library
//!
//! The `books` module and its wiring into the module registry.

pub mod modules;

pub use modules::*;
