use pyo3::prelude::*;
use pyo3::types::PyDict;

pub struct Figure<'p> {
    fig: &'p PyAny,
}

impl<'p> Figure<'p> {
    pub fn new(fig: &'p PyAny) -> Self {
        Self { fig }
    }

    pub fn fig(&self) -> &'p PyAny {
        self.fig
    }

    pub fn set_size_inches(&self, width: f64, height: f64) -> PyResult<()> {
        self.fig.call_method1("set_size_inches", (width, height))?;
        Ok(())
    }

    pub fn tight_layout(&self) -> PyResult<()> {
        self.fig.call_method0("tight_layout")?;
        Ok(())
    }

    pub fn subplots_adjust(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.fig.call_method("subplots_adjust", (), kwargs)?;
        Ok(())
    }
}
