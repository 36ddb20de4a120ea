//! Growth-curve families.
//!
//! Every family implements [`GrowthCurve`] with closed-form evaluation,
//! inverse and derivative; [`CurveModel`] holds any one of them.

pub mod curve;
pub mod generalized;
pub mod gompertz;
pub mod logistic;
pub mod model;

pub use curve::{FittedCurve, GrowthCurve};
pub use generalized::GeneralizedLogistic;
pub use gompertz::Gompertz;
pub use logistic::Logistic;
pub use model::CurveModel;
