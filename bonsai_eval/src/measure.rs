use crate::EvalError;
use tracing::warn;

/// A single raw measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Measured(f64),
    /// The configuration did not complete the workload at this setting (the
    /// raw value was the saturation sentinel).
    Saturated,
    /// The configuration was not tested at this setting.
    Missing,
}

impl Cell {
    /// Classifies a raw value against the saturation sentinel, if any.
    pub fn classify(value: f64, saturation: Option<f64>) -> Self {
        match saturation {
            Some(sentinel) if value == sentinel => Cell::Saturated,
            _ => Cell::Measured(value),
        }
    }

    pub fn measured(&self) -> Option<f64> {
        match self {
            Cell::Measured(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_saturated(&self) -> bool {
        matches!(self, Cell::Saturated)
    }
}

/// Table of raw measurements: one row per configuration (in declaration
/// order), one column per point of the independent-variable axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    axis: Vec<f64>,
    saturation: Option<f64>,
    rows: Vec<(String, Vec<Cell>)>,
}

impl RawMeasurement {
    /// Creates an empty table over `axis`.
    pub fn new(axis: Vec<f64>) -> Self {
        Self {
            axis,
            saturation: None,
            rows: Vec::new(),
        }
    }

    /// Sets the saturation sentinel. Rows already pushed are reclassified
    /// against it.
    pub fn with_saturation(mut self, saturation: f64) -> Self {
        self.saturation = Some(saturation);
        for (_, cells) in self.rows.iter_mut() {
            for cell in cells.iter_mut() {
                if let Some(value) = cell.measured() {
                    *cell = Cell::classify(value, self.saturation);
                }
            }
        }
        self
    }

    /// Creates a table from embedded constants.
    pub fn from_rows(
        axis: &[f64],
        saturation: Option<f64>,
        rows: &[(&str, &[f64])],
    ) -> Result<Self, EvalError> {
        let mut raw = Self::new(axis.to_vec());
        raw.saturation = saturation;
        for (name, values) in rows {
            raw.push(*name, values.iter().copied())?;
        }
        Ok(raw)
    }

    /// Appends a row of raw values, classifying each against the saturation
    /// sentinel.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<(), EvalError> {
        let saturation = self.saturation;
        let cells = values
            .into_iter()
            .map(|value| Cell::classify(value, saturation))
            .collect();
        self.push_cells(name, cells)
    }

    /// Appends a row of already classified cells. Rows shorter than the axis
    /// are padded with `Cell::Missing`.
    pub fn push_cells(
        &mut self,
        name: impl Into<String>,
        mut cells: Vec<Cell>,
    ) -> Result<(), EvalError> {
        let name = name.into();
        if cells.len() > self.axis.len() {
            return Err(EvalError::AxisMismatch {
                label: name,
                expected: self.axis.len(),
                found: cells.len(),
            });
        }
        if cells.len() < self.axis.len() {
            warn!(
                "{} has {} of {} points; padding with missing values",
                name,
                cells.len(),
                self.axis.len()
            );
            cells.resize(self.axis.len(), Cell::Missing);
        }
        self.rows.push((name, cells));
        Ok(())
    }

    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Cell])> {
        self.rows
            .iter()
            .map(|(name, cells)| (name.as_str(), cells.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[Cell]> {
        self.rows
            .iter()
            .find(|(row, _)| row == name)
            .map(|(_, cells)| cells.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Formats an axis point: whole numbers are shown without decimals.
pub fn fmt_position(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
