use super::Figure;
use bonsai_eval::chart::{
    ChartBuilder, Layout, LegendSpec, Marker, Series, Style,
};
use bonsai_eval::sweep::parse_sweep;
use bonsai_eval::{Deriver, Rule};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use std::path::Path;
use tracing::{debug, info};

/// Result files of the interleave granularity experiment, one per
/// granularity.
pub const DATA_FILES: [&str; 5] = [
    ".data/data_256",
    ".data/data_512",
    ".data/data_1024",
    ".data/data_2048",
    ".data/data_4096",
];

/// Latency as the number of workers grows, for every interleave granularity
/// whose results exist under `dir`.
pub fn granularity(dir: impl AsRef<Path>) -> Result<Option<Figure>, Report> {
    let dir = dir.as_ref();
    let mut texts = Vec::new();
    for file in DATA_FILES {
        let path = dir.join(file);
        if !path.is_file() {
            debug!("no sweep results at {}", path.display());
            continue;
        }
        let text = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("read {}", path.display()))?;
        texts.push(text);
    }
    if texts.is_empty() {
        info!("no interleave granularity results; skipping");
        return Ok(None);
    }
    let texts: Vec<_> = texts.iter().map(String::as_str).collect();
    from_texts(&texts).map(Some)
}

fn from_texts(texts: &[&str]) -> Result<Figure, Report> {
    let mut sweeps = texts
        .iter()
        .map(|text| parse_sweep(text))
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("parse sweep results")?
        .into_iter();
    let mut sweep = match sweeps.next() {
        Some(sweep) => sweep,
        None => color_eyre::eyre::bail!("no sweep results"),
    };
    for next in sweeps {
        sweep.merge(next)?;
    }

    let latency = Deriver::new(Rule::Identity).derive(sweep.raw())?;
    let mut chart = ChartBuilder::new(Layout::Single, latency.axis().to_vec());
    for (name, metrics) in latency.rows() {
        let style = Style::new().marker(Marker::Circle);
        chart.add_series(0, Series::new(name, metrics.to_vec(), style))?;
    }
    chart
        .set_axis(
            0,
            latency.axis().to_vec(),
            sweep.columns().to_vec(),
            Some("n_worker"),
            Some("latency"),
        )?
        .rotate_xticks(0, 45.0)?
        .legend(0, LegendSpec::default())?;

    Ok(Figure::new("interleave_granularity").with_chart(chart.build()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::tests::sketch;

    #[test]
    fn absent_results_are_skipped() {
        let figure = granularity("does-not-exist").unwrap();
        assert!(figure.is_none());
    }

    #[test]
    fn one_line_per_run() {
        let figure = from_texts(&[
            "1 2 4\n256-seq 3.5 2.0 1.25\n",
            "1 2 4\n512-seq 3.0 1.5 1.0\n512-rand 4.0 2.5 1.5\n",
        ])
        .unwrap();
        let sketch = sketch(&figure);
        assert_eq!(sketch.lines.len(), 3);
        assert_eq!(sketch.lines[2].1.label.as_deref(), Some("512-rand"));
        assert_eq!(sketch.lines[0].1.x, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn columns_must_agree() {
        assert!(from_texts(&["1 2\na 1 2\n", "1 2 4\nb 1 2 3\n"]).is_err());
    }
}
