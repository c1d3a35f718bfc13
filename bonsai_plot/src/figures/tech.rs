use super::Figure;
use bonsai_eval::chart::{
    ChartBuilder, FigureStyle, Layout, LegendSpec, LineStyle, Marker, Mode,
    Series, Style,
};
use bonsai_eval::derive::NormalizeScope;
use bonsai_eval::measure::fmt_position;
use bonsai_eval::table::transpose;
use bonsai_eval::{Derived, Deriver, RawMeasurement, Rule, Table, Unit, K, M};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;

fn tick_labels(ticks: &[f64]) -> Vec<String> {
    ticks.iter().map(|tick| fmt_position(*tick)).collect()
}

/// Turns a table with one row per axis point into one row per configuration.
fn by_config(
    names: &[&'static str],
    per_point: &[&[f64]],
) -> Vec<(&'static str, Vec<f64>)> {
    names
        .iter()
        .zip(transpose(per_point))
        .map(|(name, values)| (*name, values.into_iter().flatten().collect()))
        .collect()
}

fn raw(
    axis: &[f64],
    rows: &[(&'static str, Vec<f64>)],
) -> Result<RawMeasurement, Report> {
    let rows: Vec<_> = rows
        .iter()
        .map(|(name, values)| (*name, values.as_slice()))
        .collect();
    Ok(RawMeasurement::from_rows(axis, None, &rows)?)
}

/// Throughput and PMM write bandwidth as the staging size of values grows.
pub fn val_persist() -> Result<Figure, Report> {
    const THREADS: [f64; 5] = [1.0, 6.0, 12.0, 18.0, 24.0];
    const LATENCY: &[(&str, &[f64])] = &[
        ("256B", &[3.524, 10.114, 20.158, 30.481, 41.293]),
        ("512B", &[2.052, 10.358, 20.311, 33.478, 59.334]),
        ("1024B", &[2.088, 10.170, 26.532, 50.726, 76.653]),
        ("wo", &[2.258, 22.857, 50.196, 81.558, 115.827]),
    ];
    const PMM_WRITE_BW: &[(&str, &[f64])] = &[
        ("256B", &[1119.35, 2349.79, 2343.50, 2338.85, 2300.41]),
        ("512B", &[1872.70, 2353.37, 2332.33, 2008.32, 1606.29]),
        ("1024B", &[1890.77, 2337.84, 1803.92, 1400.27, 1230.34]),
        ("wo", &[1867.89, 1048.54, 943.43, 871.23, 803.20]),
    ];
    const STYLES: [(Marker, &str); 4] = [
        (Marker::X, "blue"),
        (Marker::Diamond, "orange"),
        (Marker::Circle, "aqua"),
        (Marker::Circle, "green"),
    ];

    let latency = RawMeasurement::from_rows(&THREADS, None, LATENCY)?;
    let throughput = Deriver::new(Rule::throughput(240.0 * K, Unit::KOpsPerSec))
        .derive(&latency)
        .wrap_err("derive staging throughput")?;
    let bandwidth = RawMeasurement::from_rows(&THREADS, None, PMM_WRITE_BW)?;
    let bandwidth = Deriver::new(Rule::Identity).derive(&bandwidth)?;

    let mut chart = ChartBuilder::new(Layout::shared_x(), THREADS.to_vec());
    for (panel, derived, line_style) in [
        (0, &throughput, LineStyle::Solid),
        (1, &bandwidth, LineStyle::Dashed),
    ] {
        for ((name, metrics), (marker, color)) in derived.rows().zip(STYLES) {
            let style = Style::new()
                .marker(marker)
                .open()
                .color(color)
                .line_style(line_style);
            let series = Series::new(name, metrics.to_vec(), style);
            chart.add_series(panel, series)?;
        }
    }
    chart
        .set_axis(
            0,
            THREADS.to_vec(),
            Vec::new(),
            None,
            Some("Throughput (K ops/s)"),
        )?
        .set_axis(
            1,
            THREADS.to_vec(),
            tick_labels(&THREADS),
            Some("Thread Number"),
            Some("PMM Write BW (B/s)"),
        )?
        .legend(0, LegendSpec::top(4))?
        .style(FigureStyle {
            hspace: Some(0.0),
            ..FigureStyle::default()
        });

    Ok(Figure::new("eval_val_persist_tech")
        .with_table(Table::pivot("thread", &throughput))
        .with_table(Table::pivot("thread", &bandwidth))
        .with_chart(chart.build()))
}

/// Normalized throughput, with and without garbage collection, as the log
/// packing size grows.
pub fn log_persist() -> Result<Figure, Report> {
    const PACKING_SIZE: [f64; 6] = [0.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0];
    const NAMES: [&str; 2] = ["Throughput", "Throughput with GC"];
    // ops/s, one row per packing size
    const THROUGHPUT: [&[f64]; 6] = [
        &[2435043.04, 1393967.82],
        &[9451573.12, 6020238.98],
        &[10349996.48, 8027338.70],
        &[10988867.17, 9783683.75],
        &[12097121.73, 11482270.22],
        &[12535130.43, 12465580.58],
    ];

    let raw = raw(&PACKING_SIZE, &by_config(&NAMES, &THROUGHPUT))?;
    let normalized = Deriver::new(Rule::Identity)
        .derive(&raw)?
        .normalize(NormalizeScope::Global)
        .wrap_err("normalize packing throughput")?;

    // bars are placed at the index of each packing size
    let positions: Vec<_> =
        (0..PACKING_SIZE.len()).map(|index| index as f64).collect();
    let mut chart = ChartBuilder::new(Layout::Single, positions.clone());
    chart.mode(0, Mode::Bar { group_width: 1.0 })?;
    for ((name, metrics), color) in normalized.rows().zip(["b", "g"]) {
        let style = Style::new().color(color);
        chart.add_series(0, Series::new(name, metrics.to_vec(), style))?;
    }
    chart
        .set_axis(
            0,
            positions,
            tick_labels(&PACKING_SIZE),
            Some("Packing size (B)"),
            Some("Normalized throughput"),
        )?
        .legend(0, LegendSpec::default())?;

    Ok(Figure::new("eval_log_persist_tech")
        .with_table(Table::pivot("packing_size", &normalized))
        .with_chart(chart.build()))
}

/// Throughput of one thread as the stripe size grows.
pub fn stripe_size() -> Result<Figure, Report> {
    const STRIPE_SIZE: [f64; 5] = [256.0, 512.0, 768.0, 1024.0, 1280.0];
    const LATENCY: &[(&str, &[f64])] =
        &[("bonsai", &[3.783, 3.230, 3.587, 3.866, 4.229])];

    let raw = RawMeasurement::from_rows(&STRIPE_SIZE, None, LATENCY)?;
    let throughput = Deriver::new(Rule::fixed_point(5.0 * M, Unit::MOpsPerSec))
        .derive(&raw)
        .wrap_err("derive stripe size throughput")?;

    let mut chart = ChartBuilder::new(Layout::Single, STRIPE_SIZE.to_vec());
    // a group of 80 leaves bars 64 wide
    chart.mode(0, Mode::Bar { group_width: 80.0 })?;
    for (_, metrics) in throughput.rows() {
        let style = Style::new().color("g");
        chart.add_series(0, Series::unlabeled(metrics.to_vec(), style))?;
    }
    chart.set_axis(
        0,
        STRIPE_SIZE.to_vec(),
        tick_labels(&STRIPE_SIZE),
        Some("Stripe size (B)"),
        Some("Throughput (M ops/s)"),
    )?;

    Ok(Figure::new("eval_scalability_tech_stripe_size")
        .with_table(Table::pivot("stripe_size", &throughput))
        .with_chart(chart.build()))
}

/// Throughput and DRAM usage of each indexing technique.
pub fn index() -> Result<Figure, Report> {
    const THREADS: [f64; 5] = [1.0, 12.0, 24.0, 36.0, 48.0];
    const NAMES: [&str; 3] = ["Bonsai-DI", "+offload", "+upload"];
    const OPS_PER_THREAD: f64 = 10.0;
    // one row per thread count
    const LATENCY: [&[f64]; 5] = [
        &[1.0, 2.0, 3.0],
        &[4.0, 5.0, 6.0],
        &[7.0, 8.0, 9.0],
        &[10.0, 11.0, 12.0],
        &[13.0, 14.0, 15.0],
    ];
    // KB, one row per thread count
    const DRAM_USAGE: [&[f64]; 5] = [
        &[1.0, 2.0, 3.0],
        &[4.0, 5.0, 6.0],
        &[7.0, 8.0, 9.0],
        &[10.0, 11.0, 12.0],
        &[13.0, 14.0, 15.0],
    ];

    let latency = raw(&THREADS, &by_config(&NAMES, &LATENCY))?;
    let rule = Rule::throughput(OPS_PER_THREAD, Unit::OpsPerSec);
    let throughput = Deriver::new(rule)
        .derive(&latency)
        .wrap_err("derive index throughput")?;
    let usage = raw(&THREADS, &by_config(&NAMES, &DRAM_USAGE))?;
    let usage = Deriver::new(Rule::Identity).derive(&usage)?;

    let mut chart = ChartBuilder::new(Layout::shared_x(), THREADS.to_vec());
    for (panel, derived) in [(0, &throughput), (1, &usage)] {
        // three bars 3 wide, centered on each thread count
        chart.mode(panel, Mode::Bar { group_width: 11.25 })?;
        add_bars(&mut chart, panel, derived)?;
    }
    chart
        .set_axis(
            0,
            THREADS.to_vec(),
            Vec::new(),
            None,
            Some("Throughput (ops/s)"),
        )?
        .set_axis(
            1,
            THREADS.to_vec(),
            tick_labels(&THREADS),
            Some("Thread Number"),
            Some("DRAM Usage (KB)"),
        )?
        .legend(0, LegendSpec::default())?
        .style(FigureStyle {
            hspace: Some(0.0),
            ..FigureStyle::default()
        });

    Ok(Figure::new("eval_index_tech")
        .with_table(Table::pivot("thread", &throughput))
        .with_table(Table::pivot("thread", &usage))
        .with_chart(chart.build()))
}

fn add_bars(
    chart: &mut ChartBuilder,
    panel: usize,
    derived: &Derived,
) -> Result<(), Report> {
    for ((name, metrics), color) in derived.rows().zip(["b", "g", "r"]) {
        let style = Style::new().color(color);
        chart.add_series(panel, Series::new(name, metrics.to_vec(), style))?;
    }
    Ok(())
}
