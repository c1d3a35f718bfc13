use crate::{Cell, EvalError, RawMeasurement};

/// Results of a parameter sweep: one named row per run, one column per
/// setting (e.g. worker count).
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    columns: Vec<String>,
    raw: RawMeasurement,
}

impl Sweep {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The measurements, over the axis `0, 1, ..` of column indexes.
    pub fn raw(&self) -> &RawMeasurement {
        &self.raw
    }

    /// Appends the rows of `other`, which must have been run over the same
    /// settings.
    pub fn merge(&mut self, other: Sweep) -> Result<(), EvalError> {
        if other.columns != self.columns {
            return Err(EvalError::AxisMismatch {
                label: other.columns.join(" "),
                expected: self.columns.len(),
                found: other.columns.len(),
            });
        }
        for (name, cells) in other.raw.rows() {
            self.raw.push_cells(name, cells.to_vec())?;
        }
        Ok(())
    }
}

/// Parses whitespace-separated sweep output: a header line with the column
/// names, then one `<label> <v1> <v2> ..` line per run.
pub fn parse_sweep(text: &str) -> Result<Sweep, EvalError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let columns: Vec<String> = lines
        .next()
        .map(|header| header.split_whitespace().map(String::from).collect())
        .unwrap_or_default();

    let axis = (0..columns.len()).map(|index| index as f64).collect();
    let mut raw = RawMeasurement::new(axis);
    for line in lines {
        let mut fields = line.split_whitespace();
        // lines are non-empty
        let label = fields.next().unwrap_or_default();
        let cells = fields
            .zip(columns.iter())
            .map(|(field, column)| {
                field
                    .parse::<f64>()
                    .map(Cell::Measured)
                    .map_err(|_| {
                        EvalError::invalid(label, column, "not a number")
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let found = line.split_whitespace().count() - 1;
        if found != columns.len() {
            return Err(EvalError::AxisMismatch {
                label: label.to_string(),
                expected: columns.len(),
                found,
            });
        }
        raw.push_cells(label, cells)?;
    }
    Ok(Sweep { columns, raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_256: &str = "1 2 4 8\n\
                            256-seq 10.5 6.25 3.5 2.0\n\
                            256-rand 12 7 4 2.5\n";

    #[test]
    fn parse() {
        let sweep = parse_sweep(DATA_256).unwrap();
        assert_eq!(sweep.columns(), &["1", "2", "4", "8"]);
        assert_eq!(sweep.raw().axis(), &[0.0, 1.0, 2.0, 3.0]);
        let names: Vec<_> = sweep.raw().names().collect();
        assert_eq!(names, vec!["256-seq", "256-rand"]);
        assert_eq!(
            sweep.raw().get("256-seq").unwrap()[1],
            Cell::Measured(6.25)
        );
    }

    #[test]
    fn row_width_must_match() {
        let err = parse_sweep("1 2\nseq 1.0\n").unwrap_err();
        assert_eq!(
            err,
            EvalError::AxisMismatch {
                label: String::from("seq"),
                expected: 2,
                found: 1,
            }
        );
        assert!(parse_sweep("1 2\nseq 1.0 2.0 3.0\n").is_err());
    }

    #[test]
    fn malformed_numbers() {
        let err = parse_sweep("1 2\nseq 1.0 fast\n").unwrap_err();
        assert_eq!(err, EvalError::invalid("seq", "2", "not a number"));
    }

    #[test]
    fn merge_sweeps() {
        let mut sweep = parse_sweep(DATA_256).unwrap();
        let other = parse_sweep("1 2 4 8\n512-seq 9 5 3 1.5\n").unwrap();
        sweep.merge(other).unwrap();
        assert_eq!(sweep.raw().len(), 3);

        let other = parse_sweep("1 2\n512-seq 9 5\n").unwrap();
        assert!(sweep.merge(other).is_err());
    }
}
