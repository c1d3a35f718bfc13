#![deny(rust_2018_idioms)]

// This module contains the definition of `EvalError`.
pub mod error;

// This module contains the definition of `Cell` and `RawMeasurement`.
pub mod measure;

// This module contains the definition of `Rule`, `Deriver` and `Derived`,
// and the cell-level derivation functions.
pub mod derive;

// This module contains the definition of `Table` (the tabular echo of a
// derived table).
pub mod table;

// This module contains the definition of `ChartBuilder`, `Chart` and the
// `Backend` trait charts are rendered through.
pub mod chart;

// This module contains the definition of `Workload` (workload documents).
pub mod config;

// This module contains the parser of sweep result files.
pub mod sweep;

// Re-exports.
pub use config::Workload;
pub use derive::{Derived, Deriver, Metric, OpCount, Rule, Unit};
pub use error::EvalError;
pub use measure::{Cell, RawMeasurement};
pub use table::Table;

pub const K: f64 = 1_000.0;
pub const M: f64 = 1_000_000.0;
