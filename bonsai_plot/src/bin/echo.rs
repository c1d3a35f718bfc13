use bonsai_eval::{Table, Workload};
use bonsai_plot::figures;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use tracing::info;

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let paths: Vec<_> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        echo_figures()
    } else {
        echo_workloads(&paths)
    }
}

fn echo_figures() -> Result<(), Report> {
    for figure in figures::all(".")? {
        print!("{}", figure.echo()?);
    }
    Ok(())
}

fn echo_workloads(paths: &[String]) -> Result<(), Report> {
    for path in paths {
        let workload = Workload::load(path)?;
        let table = workload
            .table()
            .wrap_err_with(|| format!("derive workload {}", path))?;
        info!("derived {} in {}", path, workload.unit().name());
        println!("# {}", path);
        print!("{}", table.to_csv(Table::DEFAULT_PRECISION)?);
    }
    Ok(())
}
