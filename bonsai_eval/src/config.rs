use crate::derive::InvalidPolicy;
use crate::{
    Cell, Derived, Deriver, EvalError, OpCount, RawMeasurement, Rule, Table,
    Unit,
};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// How the cells of a workload document are turned into metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Throughput,
    FixedPoint,
    Identity,
}

impl Default for RuleKind {
    fn default() -> Self {
        RuleKind::Throughput
    }
}

// header of the axis column when a document doesn't name it
const DEFAULT_AXIS_NAME: &str = "thread";

/// A workload document: the raw measurements of one experiment together
/// with what's needed to derive them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workload {
    axis: Vec<f64>,
    #[serde(default)]
    axis_name: Option<String>,
    // declaration order is kept by serde_json's `preserve_order`
    series: Map<String, Value>,
    op_count: f64,
    unit: Unit,
    #[serde(default)]
    saturation: Option<f64>,
    #[serde(default)]
    op_count_per_series: HashMap<String, f64>,
    #[serde(default)]
    rule: RuleKind,
    #[serde(default)]
    on_invalid: Option<InvalidPolicy>,
}

impl Workload {
    pub fn from_json_str(json: &str) -> Result<Self, Report> {
        let workload: Self =
            serde_json::from_str(json).wrap_err("parse workload document")?;
        // fail early on series that aren't lists of numbers
        workload.raw()?;
        Ok(workload)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Report> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read workload {}", path.display()))?;
        Self::from_json_str(&json)
            .wrap_err_with(|| format!("load workload {}", path.display()))
    }

    /// Overrides what happens to cells that can't be derived.
    pub fn with_policy(mut self, policy: InvalidPolicy) -> Self {
        self.on_invalid = Some(policy);
        self
    }

    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    pub fn axis_name(&self) -> &str {
        self.axis_name.as_deref().unwrap_or(DEFAULT_AXIS_NAME)
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Returns the raw table; `null` cells are missing.
    pub fn raw(&self) -> Result<RawMeasurement, EvalError> {
        let mut raw = RawMeasurement::new(self.axis.clone());
        if let Some(saturation) = self.saturation {
            raw = raw.with_saturation(saturation);
        }
        for (name, values) in self.series.iter() {
            let values = match values {
                Value::Array(values) => values,
                _ => return Err(EvalError::invalid(name, "*", "not a list")),
            };
            if values.len() > self.axis.len() {
                return Err(EvalError::AxisMismatch {
                    label: name.clone(),
                    expected: self.axis.len(),
                    found: values.len(),
                });
            }
            let cells = values
                .iter()
                .zip(self.axis.iter())
                .map(|(value, x)| match value {
                    Value::Null => Ok(Cell::Missing),
                    Value::Number(number) => number
                        .as_f64()
                        .map(|value| Cell::classify(value, self.saturation))
                        .ok_or_else(|| {
                            EvalError::invalid(name, x, "not a number")
                        }),
                    _ => Err(EvalError::invalid(name, x, "not a number")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            raw.push_cells(name.as_str(), cells)?;
        }
        Ok(raw)
    }

    pub fn op_count(&self) -> OpCount {
        self.op_count_per_series.iter().fold(
            OpCount::new(self.op_count),
            |op_count, (name, count)| op_count.with(name.as_str(), *count),
        )
    }

    pub fn deriver(&self) -> Deriver {
        let rule = match self.rule {
            RuleKind::Throughput => {
                Rule::throughput(self.op_count(), self.unit)
            }
            RuleKind::FixedPoint => {
                Rule::fixed_point(self.op_count(), self.unit)
            }
            RuleKind::Identity => Rule::Identity,
        };
        let deriver = Deriver::new(rule);
        match self.on_invalid {
            Some(policy) => deriver.on_invalid(policy),
            None => deriver,
        }
    }

    pub fn derive(&self) -> Result<Derived, EvalError> {
        self.deriver().derive(&self.raw()?)
    }

    /// Derives the document and pivots it under its axis name.
    pub fn table(&self) -> Result<Table, EvalError> {
        Ok(Table::pivot(self.axis_name(), &self.derive()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Metric;

    const YCSB_C: &str = r#"{
        "axis": [1, 6, 12],
        "series": {
            "viper": [1.616, 240000000, 240000000],
            "bonsai": [2.201, 2.862, 3.123],
            "dptree": [1.0, null]
        },
        "op_count": 2500000,
        "unit": "m_ops_per_sec",
        "saturation": 240000000
    }"#;

    #[test]
    fn series_keep_document_order() {
        let workload = Workload::from_json_str(YCSB_C).unwrap();
        let raw = workload.raw().unwrap();
        let names: Vec<_> = raw.names().collect();
        assert_eq!(names, vec!["viper", "bonsai", "dptree"]);
        assert_eq!(
            raw.get("dptree"),
            Some(&[Cell::Measured(1.0), Cell::Missing, Cell::Missing][..])
        );
    }

    #[test]
    fn derive_document() {
        let workload = Workload::from_json_str(YCSB_C)
            .unwrap()
            // the missing dptree cells would halt otherwise
            .with_policy(InvalidPolicy::MarkMissing);
        let derived = workload.derive().unwrap();

        let viper = derived.get("viper").unwrap();
        assert_eq!(viper[1], Metric::Saturated);
        assert_eq!(viper[2], Metric::Saturated);

        let bonsai = derived.get("bonsai").unwrap();
        let expected = [1.136, 5.241, 9.606];
        for (metric, expected) in bonsai.iter().zip(expected) {
            let value = metric.value().unwrap();
            assert!((value - expected).abs() < 1e-3, "{}", value);
        }
        assert_eq!(derived.get("dptree").unwrap()[2], Metric::Missing);
    }

    #[test]
    fn missing_cells_halt_by_default() {
        let workload = Workload::from_json_str(YCSB_C).unwrap();
        assert!(matches!(
            workload.derive(),
            Err(EvalError::InvalidMeasurement { .. })
        ));
    }

    #[test]
    fn per_series_op_count() {
        let json = r#"{
            "axis": [0.5],
            "series": { "bonsai": [2.0], "pactree": [2.0] },
            "op_count": 1000,
            "op_count_per_series": { "pactree": 4000 },
            "unit": "k_ops_per_sec",
            "rule": "fixed_point"
        }"#;
        let derived = Workload::from_json_str(json).unwrap().derive().unwrap();
        assert_eq!(derived.get("bonsai"), Some(&[Metric::Value(0.5)][..]));
        assert_eq!(derived.get("pactree"), Some(&[Metric::Value(2.0)][..]));
    }

    #[test]
    fn axis_column_is_named_by_the_document() {
        let json = r#"{
            "axis": [256, 512],
            "axis_name": "stripe_size",
            "series": { "bonsai": [2.0, 4.0] },
            "op_count": 1000,
            "unit": "ops_per_sec",
            "rule": "fixed_point"
        }"#;
        let table = Workload::from_json_str(json).unwrap().table().unwrap();
        assert_eq!(table.header(), &["stripe_size", "bonsai"]);
        assert_eq!(table.rows()[1], (512.0, vec![Metric::Value(250.0)]));

        let workload = Workload::from_json_str(YCSB_C).unwrap();
        assert_eq!(workload.axis_name(), "thread");
    }

    #[test]
    fn bad_documents() {
        // unknown unit
        assert!(Workload::from_json_str(
            r#"{ "axis": [1], "series": {}, "op_count": 1, "unit": "ops" }"#
        )
        .is_err());
        // strings are not measurements
        assert!(Workload::from_json_str(
            r#"{ "axis": [1], "series": { "a": ["1"] }, "op_count": 1,
                 "unit": "ops_per_sec" }"#
        )
        .is_err());
        // more points than the axis
        assert!(Workload::from_json_str(
            r#"{ "axis": [1], "series": { "a": [1, 2] }, "op_count": 1,
                 "unit": "ops_per_sec" }"#
        )
        .is_err());
    }
}
