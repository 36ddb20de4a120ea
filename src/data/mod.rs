//! Data sources for fitting.
//!
//! Loading real datasets is left to the caller; this module only provides
//! seeded synthetic series.

pub mod synthetic;

pub use synthetic::*;
