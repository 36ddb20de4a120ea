//! Numerical utilities: stable sigmoid helpers and least-squares covariance.

pub mod covariance;
pub mod sigmoid;

pub use covariance::*;
pub use sigmoid::*;
