use bonsai_plot::figures;
use bonsai_plot::plot::Matplotlib;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use pyo3::prelude::*;
use tracing::info;

// where the interleave granularity results are looked up
const SWEEP_DIR: &str = ".";

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // derive everything before drawing anything
    let figures = figures::all(SWEEP_DIR).wrap_err("build figures")?;

    let gil = Python::acquire_gil();
    let py = gil.python();
    let mut matplotlib = Matplotlib::new(py)?;

    for figure in figures {
        print!("{}", figure.echo()?);
        if let Some(chart) = figure.chart() {
            chart
                .render(&mut matplotlib, &figure.output())
                .wrap_err_with(|| format!("render {}", figure.name()))?;
            info!("rendered {}", figure.name());
        }
    }
    Ok(())
}
