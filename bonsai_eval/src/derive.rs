use crate::measure::fmt_position;
use crate::{Cell, EvalError, RawMeasurement};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const KIB: f64 = 1024.0;
pub const MIB: f64 = 1024.0 * KIB;
pub const GIB: f64 = 1024.0 * MIB;

/// Unit throughput is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    OpsPerSec,
    KOpsPerSec,
    MOpsPerSec,
}

impl Unit {
    pub fn scale(&self) -> f64 {
        match self {
            Unit::OpsPerSec => 1.0,
            Unit::KOpsPerSec => 1_000.0,
            Unit::MOpsPerSec => 1_000_000.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Unit::OpsPerSec => "ops/s",
            Unit::KOpsPerSec => "K ops/s",
            Unit::MOpsPerSec => "M ops/s",
        }
    }
}

/// Computes `op_count * thread_count / latency` in `unit`.
/// Returns `None` if either `thread_count` or `latency` is not strictly
/// positive (or not finite).
pub fn throughput_from_latency(
    op_count: f64,
    thread_count: f64,
    latency: f64,
    unit: Unit,
) -> Option<f64> {
    if !is_positive(thread_count) {
        return None;
    }
    fixed_point_latency(op_count * thread_count, latency, unit)
}

/// Computes `op_count / latency` in `unit`, for axes that are a tunable
/// parameter instead of a thread count.
pub fn fixed_point_latency(
    op_count: f64,
    latency: f64,
    unit: Unit,
) -> Option<f64> {
    if !is_positive(latency) || !op_count.is_finite() {
        return None;
    }
    Some(op_count / latency / unit.scale())
}

/// Divides every value by the maximum value. Returns `None` if the maximum
/// is not strictly positive.
pub fn normalize_by_max(values: &[f64]) -> Option<Vec<f64>> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !is_positive(max) {
        return None;
    }
    Some(values.iter().map(|value| value / max).collect())
}

/// Computes `value * multiplier / divisor`, e.g. bytes to GiB.
pub fn scale_to_binary_unit(
    value: f64,
    multiplier: f64,
    divisor: f64,
) -> Option<f64> {
    if !is_positive(divisor) {
        return None;
    }
    Some(value * multiplier / divisor)
}

pub fn identity(value: f64) -> f64 {
    value
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Number of operations an elapsed time corresponds to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpCount {
    default: f64,
    per_config: HashMap<String, f64>,
}

impl OpCount {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            per_config: HashMap::new(),
        }
    }

    /// Overrides the operation count of configuration `name`.
    pub fn with(mut self, name: impl Into<String>, op_count: f64) -> Self {
        self.per_config.insert(name.into(), op_count);
        self
    }

    pub fn get(&self, name: &str) -> f64 {
        self.per_config.get(name).copied().unwrap_or(self.default)
    }
}

impl From<f64> for OpCount {
    fn from(default: f64) -> Self {
        Self::new(default)
    }
}

/// Derivation rule applied to every cell of a raw table.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The axis is the thread count and cells are elapsed seconds.
    Throughput { ops: OpCount, unit: Unit },
    /// The axis is a tunable parameter and cells are elapsed seconds.
    FixedPoint { ops: OpCount, unit: Unit },
    ScaleToBinary { multiplier: f64, divisor: f64 },
    Identity,
}

impl Rule {
    pub fn throughput(ops: impl Into<OpCount>, unit: Unit) -> Self {
        Rule::Throughput {
            ops: ops.into(),
            unit,
        }
    }

    pub fn fixed_point(ops: impl Into<OpCount>, unit: Unit) -> Self {
        Rule::FixedPoint {
            ops: ops.into(),
            unit,
        }
    }

    fn apply(&self, name: &str, x: f64, raw: f64) -> Result<f64, &'static str> {
        if !raw.is_finite() || raw < 0.0 {
            return Err("negative or non-finite value");
        }
        match self {
            Rule::Throughput { ops, unit } => {
                if !is_positive(x) {
                    return Err("non-positive thread count");
                }
                throughput_from_latency(ops.get(name), x, raw, *unit)
                    .ok_or("non-positive latency")
            }
            Rule::FixedPoint { ops, unit } => {
                fixed_point_latency(ops.get(name), raw, *unit)
                    .ok_or("non-positive latency")
            }
            Rule::ScaleToBinary {
                multiplier,
                divisor,
            } => scale_to_binary_unit(raw, *multiplier, *divisor)
                .ok_or("non-positive divisor"),
            Rule::Identity => Ok(identity(raw)),
        }
    }
}

/// What to do with a cell that can't be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPolicy {
    Halt,
    MarkSaturated,
    MarkMissing,
}

impl Default for InvalidPolicy {
    fn default() -> Self {
        InvalidPolicy::Halt
    }
}

/// Scope the maximum is taken over when normalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeScope {
    PerSeries,
    Global,
}

/// A derived value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    Saturated,
    Missing,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(value) => Some(*value),
            _ => None,
        }
    }

    /// Value drawn on a chart: a saturated configuration completed no work
    /// at that setting, and a missing point leaves a gap.
    pub fn plotted(&self) -> f64 {
        match self {
            Metric::Value(value) => *value,
            Metric::Saturated => 0.0,
            Metric::Missing => f64::NAN,
        }
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Metric::Value(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deriver {
    rule: Rule,
    on_invalid: InvalidPolicy,
}

impl Deriver {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            on_invalid: InvalidPolicy::default(),
        }
    }

    pub fn on_invalid(mut self, policy: InvalidPolicy) -> Self {
        self.on_invalid = policy;
        self
    }

    pub fn derive(&self, raw: &RawMeasurement) -> Result<Derived, EvalError> {
        let rule = &self.rule;
        let mut rows = Vec::with_capacity(raw.len());
        for (name, cells) in raw.rows() {
            let metrics = raw
                .axis()
                .iter()
                .zip(cells)
                .map(|(&x, cell)| match cell {
                    Cell::Saturated => Ok(Metric::Saturated),
                    Cell::Missing => self.invalid(name, x, "missing value"),
                    Cell::Measured(value) => match rule.apply(name, x, *value)
                    {
                        Ok(derived) => Ok(Metric::Value(derived)),
                        Err(reason) => self.invalid(name, x, reason),
                    },
                })
                .collect::<Result<Vec<_>, _>>()?;
            debug!("{}: {:?}", name, metrics);
            rows.push((name.to_string(), metrics));
        }
        Ok(Derived {
            axis: raw.axis().to_vec(),
            rows,
        })
    }

    fn invalid(
        &self,
        name: &str,
        x: f64,
        reason: &'static str,
    ) -> Result<Metric, EvalError> {
        match self.on_invalid {
            InvalidPolicy::Halt => Err(EvalError::invalid(
                name,
                fmt_position(x),
                reason,
            )),
            InvalidPolicy::MarkSaturated => {
                warn!("{} at {}: {}; marked saturated", name, x, reason);
                Ok(Metric::Saturated)
            }
            InvalidPolicy::MarkMissing => {
                warn!("{} at {}: {}; marked missing", name, x, reason);
                Ok(Metric::Missing)
            }
        }
    }
}

/// Table of derived metrics, same shape as the raw table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    axis: Vec<f64>,
    rows: Vec<(String, Vec<Metric>)>,
}

impl Derived {
    /// Creates a table from values that are already in report units.
    pub fn from_rows(
        axis: Vec<f64>,
        rows: Vec<(String, Vec<Metric>)>,
    ) -> Result<Self, EvalError> {
        for (name, metrics) in rows.iter() {
            if metrics.len() != axis.len() {
                return Err(EvalError::AxisMismatch {
                    label: name.clone(),
                    expected: axis.len(),
                    found: metrics.len(),
                });
            }
        }
        Ok(Self { axis, rows })
    }

    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Metric])> {
        self.rows
            .iter()
            .map(|(name, metrics)| (name.as_str(), metrics.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[Metric]> {
        self.rows
            .iter()
            .find(|(row, _)| row == name)
            .map(|(_, metrics)| metrics.as_slice())
    }

    /// Returns a new table with every value divided by the maximum of its
    /// series (or of the whole table, if `NormalizeScope::Global`).
    pub fn normalize(&self, scope: NormalizeScope) -> Result<Self, EvalError> {
        let global_max = Self::max(self.rows.iter().flat_map(|(_, m)| m));
        let rows = self
            .rows
            .iter()
            .map(|(name, metrics)| {
                let max = match scope {
                    NormalizeScope::PerSeries => Self::max(metrics),
                    NormalizeScope::Global => global_max,
                };
                if !is_positive(max) {
                    return Err(EvalError::invalid(
                        name.as_str(),
                        "max",
                        "non-positive maximum",
                    ));
                }
                let metrics = metrics
                    .iter()
                    .map(|metric| match metric {
                        Metric::Value(value) => Metric::Value(value / max),
                        other => *other,
                    })
                    .collect();
                Ok((name.clone(), metrics))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            axis: self.axis.clone(),
            rows,
        })
    }

    fn max<'a>(metrics: impl IntoIterator<Item = &'a Metric>) -> f64 {
        metrics
            .into_iter()
            .filter_map(Metric::value)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
