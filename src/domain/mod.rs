//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the curve family tag (`CurveKind`)
//! - the daily observation series (`TimeSeries`)
//! - fit diagnostics (`FitQuality`)

pub mod types;

pub use types::*;
