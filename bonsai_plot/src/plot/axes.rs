use pyo3::prelude::*;
use pyo3::types::PyDict;

pub struct Axes<'p> {
    ax: &'p PyAny,
}

impl<'p> Axes<'p> {
    pub fn new(ax: &'p PyAny) -> Self {
        Self { ax }
    }

    pub fn set_xlabel(
        &self,
        label: &str,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("set_xlabel", (label,), kwargs)?;
        Ok(())
    }

    pub fn set_ylabel(
        &self,
        label: &str,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("set_ylabel", (label,), kwargs)?;
        Ok(())
    }

    pub fn set_xticks(&self, ticks: Vec<f64>) -> PyResult<()> {
        self.ax.call_method1("set_xticks", (ticks,))?;
        Ok(())
    }

    pub fn set_xticklabels(
        &self,
        labels: Vec<String>,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("set_xticklabels", (labels,), kwargs)?;
        Ok(())
    }

    pub fn set_yticks(&self, ticks: Vec<f64>) -> PyResult<()> {
        self.ax.call_method1("set_yticks", (ticks,))?;
        Ok(())
    }

    pub fn tick_params(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("tick_params", (), kwargs)?;
        Ok(())
    }

    pub fn legend(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("legend", (), kwargs)?;
        Ok(())
    }

    pub fn plot(
        &self,
        x: Vec<f64>,
        y: Vec<f64>,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("plot", (x, y), kwargs)?;
        Ok(())
    }

    pub fn bar(
        &self,
        x: Vec<f64>,
        height: Vec<f64>,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("bar", (x, height), kwargs)?;
        Ok(())
    }
}
