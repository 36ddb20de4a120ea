//! Analysis helpers built on fitted models: calendar summaries, extended
//! prediction tables, differenced series, and text output.

pub mod diff;
pub mod format;
pub mod summary;
pub mod table;

pub use diff::*;
pub use format::*;
pub use summary::*;
pub use table::*;
