use super::Figure;
use crate::{PlotFmt, Store};
use bonsai_eval::chart::{
    ChartBuilder, FigureStyle, Layout, LegendSpec, LineStyle, Series,
};
use bonsai_eval::derive::{GIB, KIB};
use bonsai_eval::measure::fmt_position;
use bonsai_eval::{Deriver, RawMeasurement, Rule, Table, Unit, K, M};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use tracing::debug;

const THREADS: [f64; 9] = [1.0, 6.0, 12.0, 18.0, 24.0, 30.0, 36.0, 42.0, 48.0];

// Sentinels written by the benchmark driver when a run did not finish.
const MAX_INT: f64 = 240.0 * M;
const MAX_STR: f64 = 5760.0 * K;

type Rows = &'static [(Store, &'static [f64])];

/// A second panel, sharing the thread axis, with a raw counter per store.
struct Counter {
    y_label: &'static str,
    values: Rows,
}

/// Throughput of every store as the number of threads grows.
struct Scalability {
    name: &'static str,
    op_count: f64,
    unit: Unit,
    saturation: f64,
    latency: Rows,
    marker_size: f64,
    yticks: Option<Vec<f64>>,
    legend_ncol: usize,
    counter: Option<Counter>,
}

impl Scalability {
    fn new(
        name: &'static str,
        op_count: f64,
        unit: Unit,
        latency: Rows,
    ) -> Self {
        Self {
            name,
            op_count,
            unit,
            saturation: MAX_INT,
            latency,
            marker_size: 8.0,
            yticks: None,
            legend_ncol: 3,
            counter: None,
        }
    }

    fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = saturation;
        self
    }

    fn marker_size(mut self, marker_size: f64) -> Self {
        self.marker_size = marker_size;
        self
    }

    /// Sets y ticks `0, step, 2 * step, .., max`.
    fn yticks(mut self, step: f64, max: f64) -> Self {
        let count = (max / step).round() as usize;
        self.yticks = Some((0..=count).map(|i| i as f64 * step).collect());
        self
    }

    fn counter(mut self, y_label: &'static str, values: Rows) -> Self {
        self.counter = Some(Counter { y_label, values });
        self.legend_ncol = 4;
        self
    }

    fn figure(self) -> Result<Figure, Report> {
        let rows: Vec<_> = self
            .latency
            .iter()
            .map(|(store, latency)| (store.key(), *latency))
            .collect();
        let raw =
            RawMeasurement::from_rows(&THREADS, Some(self.saturation), &rows)?;
        let derived = Deriver::new(Rule::throughput(self.op_count, self.unit))
            .derive(&raw)
            .wrap_err_with(|| format!("derive throughput of {}", self.name))?;
        debug!("{}: derived {} stores", self.name, derived.rows().count());

        let layout = if self.counter.is_some() {
            Layout::shared_x()
        } else {
            Layout::Single
        };
        let mut chart = ChartBuilder::new(layout, THREADS.to_vec());

        let colored = self.counter.is_some();
        let rows = self.latency.iter().zip(derived.rows());
        for ((store, _), (_, metrics)) in rows {
            let style = if colored {
                PlotFmt::colored_line(*store, self.marker_size)
            } else {
                PlotFmt::line(*store, self.marker_size)
            };
            let name = PlotFmt::store_name(*store);
            let series = Series::new(name, metrics.to_vec(), style);
            chart.add_series(0, series)?;
        }

        let ticks = THREADS.to_vec();
        let tick_labels: Vec<_> =
            THREADS.iter().map(|t| fmt_position(*t)).collect();
        let throughput = format!("Throughput ({})", self.unit.name());
        let mut style = FigureStyle::default();
        match &self.counter {
            None => {
                style.label_size = 20.0;
                chart.set_axis(
                    0,
                    ticks,
                    tick_labels,
                    Some("Thread Number"),
                    Some(throughput.as_str()),
                )?;
            }
            Some(counter) => {
                style.hspace = Some(0.0);
                for (store, values) in counter.values.iter() {
                    let style = PlotFmt::colored_line(*store, 8.0)
                        .line_style(LineStyle::Dashed);
                    let series = Series::from_values(
                        PlotFmt::store_name(*store),
                        values,
                        style,
                    );
                    chart.add_series(1, series)?;
                }
                chart.set_axis(
                    0,
                    ticks.clone(),
                    Vec::new(),
                    None,
                    Some(throughput.as_str()),
                )?;
                chart.set_axis(
                    1,
                    ticks,
                    tick_labels,
                    Some("Thread Number"),
                    Some(counter.y_label),
                )?;
            }
        }
        if let Some(yticks) = self.yticks {
            chart.set_yticks(0, yticks)?;
        }
        chart.legend(0, LegendSpec::top(self.legend_ncol))?;
        chart.style(style);

        Ok(Figure::new(self.name)
            .with_table(Table::pivot("thread", &derived))
            .with_chart(chart.build()))
    }
}

pub fn a_int() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::DPTree,
            &[
                4.596, 10.472, 18.069, 25.214, 31.945, 37.688, 43.657, 50.189,
                57.191,
            ],
        ),
        (
            Store::FastFair,
            &[
                7.134, 9.799, 11.056, 12.000, 13.202, 21.624, 24.842, 31.675,
                45.375,
            ],
        ),
        (
            Store::ListDB,
            &[
                7.599, 12.307, 17.301, 23.195, 31.949, 35.298, 46.982, 61.836,
                78.329,
            ],
        ),
        (
            Store::Pacman,
            &[
                5.698, 7.327, 7.977, 8.516, 8.960, 12.496, 12.899, 13.325,
                12.101,
            ],
        ),
        (
            Store::PACTree,
            &[
                9.098, 9.586, 11.796, 12.733, 13.479, 24.368, 32.008, 31.117,
                35.446,
            ],
        ),
        (
            Store::Bonsai,
            &[3.277, 4.442, 4.915, 5.134, 5.576, 6.556, 7.180, 7.138, 7.289],
        ),
    ];
    Scalability::new("ycsb_a_int", 5.0 * M, Unit::MOpsPerSec, LATENCY)
        .yticks(2.0, 32.0)
        .figure()
}

pub fn a_str() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::Pacman,
            &[
                1.767, 2.250, 3.441, 5.159, 6.898, 23.629, 28.833, 38.268,
                43.489,
            ],
        ),
        (
            Store::Bonsai,
            &[2.421, 2.637, 3.124, 3.935, 4.895, 3.948, 4.119, 4.560, 5.122],
        ),
    ];
    Scalability::new("ycsb_a_str", 240.0 * K, Unit::KOpsPerSec, LATENCY)
        .saturation(MAX_STR)
        .yticks(200.0, 2400.0)
        .figure()
}

pub fn c_int() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (Store::DPTree, &[MAX_INT; 9]),
        (
            Store::FastFair,
            &[2.605, 4.031, 4.541, 4.828, 5.090, 6.297, 6.923, 7.863, 9.624],
        ),
        (
            Store::ListDB,
            &[1.694, 2.320, 3.252, 4.518, 5.693, 8.065, 8.625, 9.998, 12.361],
        ),
        (
            Store::Pacman,
            &[3.184, 4.044, 4.380, 4.566, 4.707, 5.688, 5.889, 6.032, 6.982],
        ),
        (
            Store::PACTree,
            &[2.715, 3.642, 3.552, 4.548, 4.726, 5.357, 5.576, 5.912, 7.408],
        ),
        (
            Store::Bonsai,
            &[2.201, 2.862, 3.123, 3.154, 3.262, 3.816, 3.963, 3.982, 4.239],
        ),
    ];
    Scalability::new("ycsb_c_int", 2.5 * M, Unit::MOpsPerSec, LATENCY)
        .yticks(2.0, 28.0)
        .figure()
}

pub fn c_str() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::Pacman,
            &[
                5.178, 5.895, 6.396, 6.704, 7.093, 21.034, 30.193, 38.906,
                48.818,
            ],
        ),
        (
            Store::Viper,
            &[
                6.235, 5.822, 6.114, 6.324, 6.774, 13.861, 23.558, 30.056,
                36.503,
            ],
        ),
        (
            Store::Bonsai,
            &[
                4.789, 5.734, 6.291, 6.873, 7.558, 12.831, 14.987, 19.121,
                21.986,
            ],
        ),
    ];
    // not collected yet
    const REMOTE_ACCESS: Rows = &[
        (Store::ListDB, &[0.0; 9]),
        (Store::Pacman, &[0.0; 9]),
        (Store::Viper, &[0.0; 9]),
        (Store::Bonsai, &[0.0; 9]),
    ];
    Scalability::new("ycsb_c_str", 5.0 * M, Unit::MOpsPerSec, LATENCY)
        .counter("Remote PM Access (lines)", REMOTE_ACCESS)
        .figure()
}

pub fn d_int() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::DPTree,
            &[4.536, 4.914, 5.330, 5.921, 6.430, 6.211, 6.451, 6.761, 7.155],
        ),
        (
            Store::FastFair,
            &[
                6.074, 9.063, 10.099, 10.781, 11.377, 12.032, 12.498, 13.419,
                13.656,
            ],
        ),
        (
            Store::ListDB,
            &[
                4.916, 7.676, 10.313, 13.569, 16.915, 21.238, 24.474, 32.453,
                38.197,
            ],
        ),
        (
            Store::Pacman,
            &[
                4.391, 7.957, 8.604, 9.158, 9.536, 11.590, 11.972, 12.364,
                12.691,
            ],
        ),
        (
            Store::PACTree,
            &[
                6.622, 9.947, 10.338, 10.269, 10.717, 11.807, 11.061, 12.128,
                13.600,
            ],
        ),
        (
            Store::Bonsai,
            &[4.199, 5.523, 5.899, 6.267, 6.396, 7.334, 7.571, 7.808, 7.750],
        ),
    ];
    Scalability::new("ycsb_d_int", 5.0 * M, Unit::MOpsPerSec, LATENCY)
        .marker_size(10.0)
        .yticks(2.0, 28.0)
        .figure()
}

/// YCSB-D with 24B keys and 1KB values.
pub fn d_str() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::FastFair,
            &[
                6.787, 6.438, 7.409, 8.098, 9.332, 18.668, 27.384, 43.369,
                53.127,
            ],
        ),
        (
            Store::DPTree,
            &[
                6.149, 8.572, 9.146, 12.167, 14.962, 16.419, 18.892, 18.829,
                29.819,
            ],
        ),
        (
            Store::PACTree,
            &[
                6.002, 7.778, 9.794, 10.984, 13.402, 18.749, 18.894, 21.873,
                29.202,
            ],
        ),
        (
            Store::Pacman,
            &[
                5.373, 6.010, 6.126, 6.843, 6.982, 11.333, 16.852, 27.485,
                31.597,
            ],
        ),
        (
            Store::ListDB,
            &[
                8.365, 16.976, 19.052, 20.605, 22.252, 42.342, 52.483, 64.742,
                63.975,
            ],
        ),
        (
            Store::Bonsai,
            &[4.692, 6.339, 6.442, 6.478, 6.515, 6.484, 6.617, 7.544, 8.313],
        ),
    ];
    Scalability::new("ycsb_d_str", 5.0 * M, Unit::MOpsPerSec, LATENCY)
        .yticks(2.0, 28.0)
        .figure()
}

pub fn e_int() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::DPTree,
            &[
                1.914, 2.222, 2.499, 3.112, 3.903, 25.401, 31.508, 37.077,
                42.786,
            ],
        ),
        (
            Store::PACTree,
            &[3.140, 3.473, 3.696, 3.925, 4.254, 7.595, 12.812, 16.329, 21.449],
        ),
        (
            Store::Bonsai,
            &[2.030, 2.178, 2.249, 2.469, 2.521, 5.135, 8.744, 14.289, 17.53],
        ),
        (
            Store::FastFair,
            &[
                24.754, 29.406, 28.550, 29.932, 32.693, 59.221, 90.554,
                119.231, 145.943,
            ],
        ),
        (
            Store::Pacman,
            &[
                10.868, 13.169, 14.189, 15.201, 15.248, 33.186, 34.338,
                35.470, 36.912,
            ],
        ),
    ];
    // not collected yet
    const DIMM_READ_BW: Rows =
        &[(Store::PACTree, &[0.0; 9]), (Store::Bonsai, &[0.0; 9])];
    Scalability::new("ycsb_e_int", 0.5 * M, Unit::MOpsPerSec, LATENCY)
        .marker_size(12.0)
        .counter("DIMM Read BW (B/s)", DIMM_READ_BW)
        .figure()
}

/// YCSB-E with 24B keys.
pub fn e_str() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::Pacman,
            &[
                43.383, 26.230, 27.081, 27.631, 28.128, 37.564, 47.226, 39.862,
                46.993,
            ],
        ),
        (
            Store::PACTree,
            &[
                4.846, 5.073, 5.251, 5.640, 6.240, 26.108, 30.642, 35.776,
                37.658,
            ],
        ),
        (
            Store::Bonsai,
            &[
                3.174, 3.652, 3.859, 4.130, 4.378, 11.997, 17.085, 23.558,
                28.324,
            ],
        ),
    ];
    // not collected yet
    const DIMM_READ_BW: Rows =
        &[(Store::PACTree, &[0.0; 9]), (Store::Bonsai, &[0.0; 9])];
    Scalability::new("ycsb_e_str", 0.5 * M, Unit::MOpsPerSec, LATENCY)
        .counter("DIMM Read BW (B/s)", DIMM_READ_BW)
        .figure()
}

pub fn load_int() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::DPTree,
            &[
                2.087, 5.993, 9.980, 16.920, 24.916, 35.597, 40.868, 48.728,
                54.497,
            ],
        ),
        (
            Store::FastFair,
            &[
                4.363, 5.831, 6.580, 7.284, 8.301, 13.605, 16.243, 22.317,
                27.696,
            ],
        ),
        (
            Store::ListDB,
            &[
                4.420, 6.863, 7.978, 9.604, 10.736, 10.651, 12.219, 13.062,
                16.199,
            ],
        ),
        (
            Store::Pacman,
            &[2.691, 3.558, 3.982, 4.297, 4.482, 5.729, 5.916, 6.059, 7.035],
        ),
        (
            Store::PACTree,
            &[
                5.250, 6.526, 8.151, 8.448, 9.492, 14.051, 20.949, 23.543,
                35.515,
            ],
        ),
        (
            Store::Viper,
            &[3.121, 3.096, 3.420, 3.266, 3.575, 4.912, 5.824, 5.791, 6.045],
        ),
        (
            Store::Bonsai,
            &[1.362, 1.904, 2.127, 2.386, 2.325, 2.715, 2.854, 3.007, 2.946],
        ),
    ];
    Scalability::new("ycsb_load_int", 2.5 * M, Unit::MOpsPerSec, LATENCY)
        .marker_size(12.0)
        .yticks(2.0, 42.0)
        .figure()
}

pub fn load_str() -> Result<Figure, Report> {
    const LATENCY: Rows = &[
        (
            Store::ListDB,
            &[
                2.446, 8.288, 15.971, 23.253, 31.075, 21.984, 21.839, 24.722,
                29.558,
            ],
        ),
        (
            Store::Pacman,
            &[0.835, 1.473, 3.210, 4.787, 6.402, 27.57, 33.30, 38.808, 44.256],
        ),
        (
            Store::Viper,
            &[
                1.616, 2.230, 4.979, 7.304, 9.936, MAX_STR, MAX_STR, MAX_STR,
                MAX_STR,
            ],
        ),
        (
            Store::Bonsai,
            &[1.730, 1.755, 1.821, 2.540, 3.374, 2.650, 2.608, 2.990, 3.473],
        ),
    ];
    const PMM_WRITE_BW: Rows = &[
        (
            Store::ListDB,
            &[
                4368.55, 4937.32, 5090.55, 5117.40, 5042.62, 9606.24, 10490.72,
                9447.24, 9747.96,
            ],
        ),
        (
            Store::Pacman,
            &[
                2395.68, 8054.37, 7395.74, 7377.98, 7108.59, 3350.36, 3321.75,
                3272.71, 3241.03,
            ],
        ),
        (
            Store::Viper,
            &[2022.25, 6672.89, 6442.92, 6204.28, 6031.45, 0.0, 0.0, 0.0, 0.0],
        ),
        (
            Store::Bonsai,
            &[
                1138.62, 6818.75, 13050.39, 13863.94, 14026.37, 21108.42,
                24191.92, 24477.78, 24700.26,
            ],
        ),
    ];
    Scalability::new("ycsb_load_str", 120.0 * K, Unit::KOpsPerSec, LATENCY)
        .saturation(MAX_STR)
        .counter("PMM Write BW (B/s)", PMM_WRITE_BW)
        .figure()
}

/// DRAM consumption of every store (in GiB), echoed as a table only.
pub fn dram() -> Result<Figure, Report> {
    const THREADS: [f64; 3] = [1.0, 24.0, 48.0];
    // KiB
    const DRAM: Rows = &[
        (Store::DPTree, &[8282.0, 147266.0, 365506.0]),
        (Store::FastFair, &[0.0, 0.0, 0.0]),
        (Store::PACTree, &[0.0, 0.0, 0.0]),
        (Store::ListDB, &[1048576.0, 1048576.0, 1048576.0]),
        (Store::Pacman, &[157031.0, 3768757.0, 7537514.0]),
        (Store::Viper, &[216516.0, 5196392.0, 11103700.0]),
        (Store::Bonsai, &[23088.0, 554112.0, 1108224.0]),
    ];
    let rows: Vec<_> = DRAM
        .iter()
        .map(|(store, usage)| (store.key(), *usage))
        .collect();
    let raw = RawMeasurement::from_rows(&THREADS, None, &rows)?;
    let rule = Rule::ScaleToBinary {
        multiplier: KIB,
        divisor: GIB,
    };
    let derived = Deriver::new(rule)
        .derive(&raw)
        .wrap_err("derive dram consumption")?;
    Ok(Figure::new("ycsb_dram").with_table(Table::pivot("thread", &derived)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::tests::sketch;
    use bonsai_eval::chart::LegendEntry;
    use bonsai_eval::Metric;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn ycsb_c_throughput() {
        let figure = c_int().unwrap();
        let table = &figure.tables()[0];
        let header: Vec<_> =
            table.header().iter().map(String::as_str).collect();
        assert_eq!(
            header,
            vec![
                "thread", "dptree", "fastfair", "listdb", "pacman", "pactree",
                "bonsai"
            ]
        );

        let bonsai = table.column("bonsai").unwrap();
        for (metric, expected) in bonsai.iter().zip([1.136, 5.241, 9.606]) {
            assert!(close(metric.value().unwrap(), expected));
        }
        // dptree never finished
        let dptree = table.column("dptree").unwrap();
        assert!(dptree.iter().all(|metric| *metric == Metric::Saturated));

        // and is drawn at zero
        let sketch = sketch(&figure);
        let (_, line) = &sketch.lines[0];
        assert_eq!(line.label.as_deref(), Some("DPTree"));
        assert!(line.y.iter().all(|y| *y == 0.0));
        assert_eq!(sketch.legends[0].len(), 6);
    }

    #[test]
    fn counters_share_the_thread_axis() {
        let figure = load_str().unwrap();
        let sketch = sketch(&figure);
        let on = |panel| {
            sketch.lines.iter().filter(|(p, _)| *p == panel).count()
        };
        let (upper, lower) = (on(0), on(1));
        assert_eq!((upper, lower), (4, 4));
        assert!(matches!(
            &sketch.legends[0][0],
            LegendEntry::Line { label, .. } if label == "ListDB"
        ));

        // viper saturates past 24 threads
        let viper = figure.tables()[0].column("viper").unwrap();
        assert_eq!(viper[5..], [Metric::Saturated; 4]);
    }

    #[test]
    fn string_key_figures() {
        let figure = d_str().unwrap();
        let bonsai = figure.tables()[0].column("bonsai").unwrap();
        // 5M ops per thread, 48 threads in 8.313s
        assert!(close(bonsai[8].value().unwrap(), 28.871));
        assert_eq!(sketch(&figure).lines.len(), 6);

        let figure = e_str().unwrap();
        let header = figure.tables()[0].header().to_vec();
        assert_eq!(header, vec!["thread", "pacman", "pactree", "bonsai"]);
        let sketch = sketch(&figure);
        let lower = sketch.lines.iter().filter(|(panel, _)| *panel == 1);
        assert_eq!(lower.count(), 2);
    }

    #[test]
    fn dram_in_gib() {
        let figure = dram().unwrap();
        assert!(figure.chart().is_none());
        let listdb = figure.tables()[0].column("listdb").unwrap();
        assert!(listdb.iter().all(|metric| *metric == Metric::Value(1.0)));
        let bonsai = figure.tables()[0].column("bonsai").unwrap();
        assert!(close(bonsai[2].value().unwrap(), 1.057));
    }
}
