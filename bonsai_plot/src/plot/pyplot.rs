use crate::plot::axes::Axes;
use crate::plot::figure::Figure;
use pyo3::prelude::*;
use pyo3::types::PyDict;

pub struct PyPlot<'p> {
    plt: &'p PyModule,
    lines: &'p PyModule,
    patches: &'p PyModule,
}

impl<'p> PyPlot<'p> {
    pub fn new(py: Python<'p>) -> PyResult<Self> {
        let plt = PyModule::import(py, "matplotlib.pyplot")?;
        let lines = PyModule::import(py, "matplotlib.lines")?;
        let patches = PyModule::import(py, "matplotlib.patches")?;
        Ok(Self {
            plt,
            lines,
            patches,
        })
    }

    /// Sets a global style parameter (`matplotlib.rcParams`).
    pub fn rc_param<V>(&self, key: &str, value: V) -> PyResult<()>
    where
        V: ToPyObject,
    {
        self.plt.getattr("rcParams")?.set_item(key, value)?;
        Ok(())
    }

    /// Creates a figure with `nrows` vertically stacked axes.
    pub fn subplots(
        &self,
        nrows: usize,
        kwargs: Option<&PyDict>,
    ) -> PyResult<(Figure<'p>, Vec<Axes<'p>>)> {
        let result = self.plt.getattr("subplots")?.call((nrows, 1), kwargs)?;
        let (fig, ax) = result.extract::<(&PyAny, &PyAny)>()?;
        let axes = if nrows == 1 {
            vec![Axes::new(ax)]
        } else {
            // an array of axes
            (0..nrows)
                .map(|index| ax.get_item(index).map(Axes::new))
                .collect::<PyResult<_>>()?
        };
        Ok((Figure::new(fig), axes))
    }

    /// Creates a legend handle drawn as a line.
    pub fn line2d(&self, kwargs: Option<&PyDict>) -> PyResult<&'p PyAny> {
        let empty: Vec<f64> = Vec::new();
        self.lines
            .getattr("Line2D")?
            .call((empty.clone(), empty), kwargs)
    }

    /// Creates a legend handle drawn as a filled patch.
    pub fn patch(&self, kwargs: Option<&PyDict>) -> PyResult<&'p PyAny> {
        self.patches.getattr("Patch")?.call((), kwargs)
    }

    pub fn savefig(&self, path: &str, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.plt.getattr("savefig")?.call((path,), kwargs)?;
        Ok(())
    }

    pub fn show(&self) -> PyResult<()> {
        self.plt.getattr("show")?.call0()?;
        Ok(())
    }

    pub fn close(&self, figure: Figure<'_>) -> PyResult<()> {
        self.plt.getattr("close")?.call1((figure.fig(),))?;
        Ok(())
    }
}
