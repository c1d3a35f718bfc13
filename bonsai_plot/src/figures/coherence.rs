use super::Figure;
use bonsai_eval::chart::{
    Breakdown, ChartBuilder, Component, Layout, LegendSpec, Mode,
};
use bonsai_eval::measure::fmt_position;
use bonsai_eval::{Derived, Metric, Table};
use color_eyre::Report;

// operations
const N: f64 = 5_000_000.0;
// sockets
const S: f64 = 2.0;
// NVM lines written per remote DRAM line
const B: f64 = 4.0;

// update ratio (%)
const UPDATE_RATIO: [f64; 4] = [0.0, 33.0, 66.0, 100.0];

const ACCESSES: [(&str, &str); 4] = [
    ("Local DRAM Access", "///"),
    ("Remote DRAM Access", "\\\\\\"),
    ("Local NVM Access", "ooo"),
    ("Remote NVM Access", "xxx"),
];

/// Lines touched by a protocol, per kind of access, for an update ratio
/// `p` in `[0, 1]`.
type Cost = fn(f64) -> [f64; 4];

const PROTOCOLS: [(&str, f64, &str, Cost); 3] = [
    ("MESI", -5.0, "#E69F00", mesi),
    ("SMR", 0.0, "#56B4E9", smr),
    ("WoSI", 5.0, "#009E73", wosi),
];

fn mesi(p: f64) -> [f64; 4] {
    [(1.0 - p) * N, (S - 1.0) * p * N, 0.0, 0.0]
}

fn smr(p: f64) -> [f64; 4] {
    [0.0, 0.0, (S - 1.0) * B * p * N, 0.0]
}

fn wosi(p: f64) -> [f64; 4] {
    [(1.0 - p) * N, 0.0, 0.0, 0.0]
}

/// Lines touched by each coherence protocol, broken down by kind of access.
pub fn protocol_overhead() -> Result<Figure, Report> {
    let mut chart = ChartBuilder::new(Layout::Single, UPDATE_RATIO.to_vec());
    chart.mode(0, Mode::Stacked { bar_width: 5.0 })?;

    let mut totals = Vec::new();
    for (name, offset, color, cost) in PROTOCOLS {
        let costs: Vec<_> = UPDATE_RATIO
            .iter()
            .map(|ratio| cost(ratio / 100.0))
            .collect();
        let mut breakdown = Breakdown::new(name, color);
        for (index, (label, hatch)) in ACCESSES.iter().enumerate() {
            let values = costs.iter().map(|cost| cost[index]).collect();
            let component = Component::new(*label, *hatch, values);
            breakdown = breakdown.component(component);
        }
        let total: Vec<_> = breakdown
            .totals(UPDATE_RATIO.len())
            .into_iter()
            .map(Metric::Value)
            .collect();
        totals.push((name.to_string(), total));
        chart.add_stacked_breakdown(0, offset, breakdown)?;
    }

    let ticks = UPDATE_RATIO.to_vec();
    let tick_labels = ticks.iter().map(|tick| fmt_position(*tick)).collect();
    chart
        .set_axis(
            0,
            ticks,
            tick_labels,
            Some("update ratio (%)"),
            Some("protocol overhead (lines)"),
        )?
        .legend(
            0,
            LegendSpec {
                loc: String::from("upper left"),
                ..LegendSpec::default()
            },
        )?;

    let totals = Derived::from_rows(UPDATE_RATIO.to_vec(), totals)?;
    Ok(Figure::new("eval_coherence_protocol")
        .with_table(Table::pivot("update_ratio", &totals))
        .with_chart(chart.build()))
}
