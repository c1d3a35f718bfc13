#![deny(rust_2018_idioms)]

// This module contains the definition of `PlotFmt` and `Store`.
pub mod fmt;

// This module contains the catalogue of evaluation figures.
pub mod figures;

// This module contains the matplotlib wrappers and the `Backend` that draws
// charts through them.
#[cfg(feature = "pyo3")]
pub mod plot;

// Re-exports.
pub use figures::Figure;
pub use fmt::{PlotFmt, Store};

// folder where all plots will be stored
pub const PLOT_DIR: &str = "plots";

/// Converts a `PyResult` into a `Report`, printing the python traceback.
#[cfg(feature = "pyo3")]
#[macro_export]
macro_rules! pytry {
    ($py:expr, $e:expr) => {{
        match $e {
            Ok(v) => v,
            Err(e) => {
                e.print($py);
                color_eyre::eyre::bail!("python error: {}", e)
            }
        }
    }};
}

/// Builds a `PyDict` from `(key, value)` pairs.
#[cfg(feature = "pyo3")]
#[macro_export]
macro_rules! pydict {
    ($py:expr, $($tup:expr),*) => {{
        let dict = pyo3::types::PyDict::new($py);
        #[allow(unused_mut)]
        let mut res: pyo3::PyResult<&pyo3::types::PyDict> = Ok(dict);
        $(
            let (key, value) = $tup;
            if let Err(e) = dict.set_item(key, value) {
                res = Err(e);
            }
        )*
        res
    }};
    ($py:expr, $($tup:expr,)*) => {{
        $crate::pydict![$py, $($tup),*]
    }};
}
