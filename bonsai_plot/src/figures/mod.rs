mod coherence;
mod interleave;
mod tech;
mod ycsb;

use crate::PLOT_DIR;
use bonsai_eval::chart::{Chart, Output};
use bonsai_eval::Table;
use color_eyre::Report;
use std::path::Path;

pub use interleave::DATA_FILES;

/// One evaluation figure: the derived tables echoed to stdout and the chart
/// drawn from them.
#[derive(Debug, Clone)]
pub struct Figure {
    name: &'static str,
    tables: Vec<Table>,
    chart: Option<Chart>,
}

impl Figure {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tables: Vec::new(),
            chart: None,
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_chart(mut self, chart: Chart) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    /// The tables as CSV, each preceded by a `# <name>` line.
    pub fn echo(&self) -> Result<String, Report> {
        let mut echo = String::new();
        for table in self.tables.iter() {
            echo.push_str(&format!("# {}\n", self.name));
            echo.push_str(&table.to_csv(Table::DEFAULT_PRECISION)?);
        }
        Ok(echo)
    }

    /// Where the chart is saved.
    pub fn output(&self) -> Output {
        Output::pdf(format!("{}/{}.pdf", PLOT_DIR, self.name))
    }
}

/// Builds every figure. Sweep results are looked up under `sweep_dir`;
/// figures whose results are absent are skipped.
pub fn all(sweep_dir: impl AsRef<Path>) -> Result<Vec<Figure>, Report> {
    let mut figures = vec![
        ycsb::a_int()?,
        ycsb::a_str()?,
        ycsb::c_int()?,
        ycsb::c_str()?,
        ycsb::d_int()?,
        ycsb::d_str()?,
        ycsb::e_int()?,
        ycsb::e_str()?,
        ycsb::load_int()?,
        ycsb::load_str()?,
        ycsb::dram()?,
        tech::val_persist()?,
        tech::log_persist()?,
        tech::stripe_size()?,
        tech::index()?,
        coherence::protocol_overhead()?,
    ];
    if let Some(figure) = interleave::granularity(sweep_dir)? {
        figures.push(figure);
    }
    Ok(figures)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bonsai_eval::chart::{
        AxisSpec, Backend, BarSpec, FigureStyle, Layout, LegendEntry,
        LegendSpec, LineSpec,
    };

    /// Backend that keeps what would have been drawn.
    #[derive(Default)]
    pub(crate) struct Sketch {
        pub lines: Vec<(usize, LineSpec)>,
        pub bars: Vec<(usize, BarSpec)>,
        pub legends: Vec<Vec<LegendEntry>>,
        pub finished: bool,
    }

    impl Backend for Sketch {
        fn start(
            &mut self,
            _layout: Layout,
            _style: &FigureStyle,
        ) -> Result<(), Report> {
            Ok(())
        }

        fn line(&mut self, panel: usize, line: LineSpec) -> Result<(), Report> {
            self.lines.push((panel, line));
            Ok(())
        }

        fn bar(&mut self, panel: usize, bar: BarSpec) -> Result<(), Report> {
            self.bars.push((panel, bar));
            Ok(())
        }

        fn axis(
            &mut self,
            _panel: usize,
            _axis: &AxisSpec,
        ) -> Result<(), Report> {
            Ok(())
        }

        fn legend(
            &mut self,
            _panel: usize,
            _legend: &LegendSpec,
            entries: &[LegendEntry],
        ) -> Result<(), Report> {
            self.legends.push(entries.to_vec());
            Ok(())
        }

        fn finish(&mut self, _output: &Output) -> Result<(), Report> {
            self.finished = true;
            Ok(())
        }
    }

    pub(crate) fn sketch(figure: &Figure) -> Sketch {
        let mut sketch = Sketch::default();
        figure
            .chart()
            .expect("figure should have a chart")
            .render(&mut sketch, &figure.output())
            .expect("rendering to a sketch should work");
        sketch
    }

    #[test]
    fn catalogue() {
        let figures = all("does-not-exist").expect("figures should build");
        let names: Vec<_> =
            figures.iter().map(|figure| figure.name()).collect();
        assert_eq!(names.len(), 16);
        assert!(names.contains(&"ycsb_d_str"));
        assert!(names.contains(&"ycsb_e_str"));
        assert!(names.contains(&"ycsb_c_int"));
        assert!(!names.contains(&"interleave_granularity"));

        for figure in figures.iter() {
            if figure.chart().is_some() {
                assert!(sketch(figure).finished);
            }
            assert!(figure.echo().is_ok());
        }
    }

    #[test]
    fn echo_rounds_to_two_places() {
        let echo = ycsb::c_int().unwrap().echo().unwrap();
        let lines: Vec<_> = echo.lines().collect();
        assert_eq!(lines[0], "# ycsb_c_int");
        assert_eq!(
            lines[1],
            "thread,dptree,fastfair,listdb,pacman,pactree,bonsai"
        );
        assert_eq!(lines[2], "1,DNF,0.96,1.48,0.79,0.92,1.14");
        assert!(Figure::new("empty").echo().unwrap().is_empty());
    }

    #[test]
    fn output_path() {
        let figure = Figure::new("ycsb_a_int");
        assert_eq!(figure.output(), Output::pdf("plots/ycsb_a_int.pdf"));
    }
}
