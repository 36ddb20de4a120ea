//! `epi-curves` library crate.
//!
//! Fits sigmoid growth curves (logistic, Gompertz, generalized logistic) to
//! cumulative epidemic counts and turns the fitted parameters into calendar
//! forecasts: peak day, completion milestones, plateau, and a daily table of
//! predictions extended past the last observation.
//!
//! Layout:
//!
//! - `domain`: series, curve tags and fit diagnostics
//! - `models`: the curve families and the [`models::CurveModel`] wrapper
//! - `fit`: Levenberg–Marquardt fitting and BIC model selection
//! - `analysis`: summaries, extended tables and differenced series
//! - `data`: seeded synthetic series

pub mod analysis;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;

pub use error::{CurveError, Result};
