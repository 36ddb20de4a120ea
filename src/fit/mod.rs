//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit one family by Levenberg–Marquardt and report standard errors
//! - fit several families and rank them by BIC

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
