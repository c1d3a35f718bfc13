use crate::derive::Metric;
use crate::measure::fmt_position;
use crate::Derived;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;

const SATURATED: &str = "DNF";
const MISSING: &str = "NA";

/// Turns per-configuration columns into per-axis-point rows. Columns shorter
/// than the longest one contribute `None` to the rows they don't reach.
pub fn transpose<T: Clone>(columns: &[&[T]]) -> Vec<Vec<Option<T>>> {
    let len = columns.iter().map(|column| column.len()).max().unwrap_or(0);
    (0..len)
        .map(|index| {
            columns
                .iter()
                .map(|column| column.get(index).cloned())
                .collect()
        })
        .collect()
}

/// Derived table pivoted to one row per axis point, with one column per
/// configuration (in declaration order).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<(f64, Vec<Metric>)>,
}

impl Table {
    /// Decimal places kept when echoing derived values.
    pub const DEFAULT_PRECISION: usize = 2;

    pub fn pivot(axis_header: &str, derived: &Derived) -> Self {
        let mut header = vec![axis_header.to_string()];
        header.extend(derived.names().map(String::from));

        let columns: Vec<_> =
            derived.rows().map(|(_, metrics)| metrics).collect();
        let rows = derived
            .axis()
            .iter()
            .copied()
            .zip(transpose(&columns))
            .map(|(x, row)| {
                // all columns of a derived table have the axis length
                let row = row
                    .into_iter()
                    .map(|metric| metric.unwrap_or(Metric::Missing))
                    .collect();
                (x, row)
            })
            .collect();
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[(f64, Vec<Metric>)] {
        &self.rows
    }

    /// Returns the values of column `name`, one per row.
    pub fn column(&self, name: &str) -> Option<Vec<Metric>> {
        // skip the axis header
        let index = self.header.iter().skip(1).position(|h| h == name)?;
        Some(self.rows.iter().map(|(_, row)| row[index]).collect())
    }

    /// Renders the table as comma-separated text, with values rounded to
    /// `precision` decimal places.
    pub fn to_csv(&self, precision: usize) -> Result<String, Report> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.header)
            .wrap_err("write csv header")?;
        for (x, row) in self.rows.iter() {
            let mut record = vec![fmt_position(*x)];
            record.extend(row.iter().map(|metric| match metric {
                Metric::Value(value) => format!("{:.*}", precision, value),
                Metric::Saturated => SATURATED.to_string(),
                Metric::Missing => MISSING.to_string(),
            }));
            writer.write_record(&record).wrap_err("write csv row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| eyre::eyre!("flush csv: {}", e.error()))?;
        let csv = String::from_utf8(bytes).wrap_err("csv is utf8")?;
        Ok(csv)
    }

    /// Parses text produced by `Table::to_csv`.
    pub fn from_csv(text: &str) -> Result<Self, Report> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let header: Vec<String> = reader
            .headers()
            .wrap_err("read csv header")?
            .iter()
            .map(String::from)
            .collect();
        if header.is_empty() {
            eyre::bail!("csv header is empty");
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.wrap_err("read csv row")?;
            let mut fields = record.iter();
            let x = match fields.next() {
                Some(x) => x.trim().parse::<f64>().wrap_err("parse axis")?,
                None => eyre::bail!("empty csv row"),
            };
            let row = fields
                .map(|field| match field.trim() {
                    SATURATED => Ok(Metric::Saturated),
                    MISSING => Ok(Metric::Missing),
                    value => value
                        .parse::<f64>()
                        .map(Metric::Value)
                        .wrap_err_with(|| format!("parse value {:?}", value)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push((x, row));
        }
        Ok(Self { header, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived() -> Derived {
        Derived::from_rows(
            vec![1.0, 6.0, 12.0],
            vec![
                (
                    String::from("pacman"),
                    vec![
                        Metric::Value(0.7852),
                        Metric::Value(3.7089),
                        Metric::Value(6.84931),
                    ],
                ),
                (
                    String::from("bonsai"),
                    vec![
                        Metric::Saturated,
                        Metric::Value(5.24109),
                        Metric::Missing,
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn transpose_columns() {
        let a = [1, 2, 3];
        let b = [4, 5];
        let rows = transpose(&[&a[..], &b[..]]);
        assert_eq!(
            rows,
            vec![
                vec![Some(1), Some(4)],
                vec![Some(2), Some(5)],
                vec![Some(3), None],
            ]
        );
    }

    #[test]
    fn pivot_keeps_order() {
        let table = Table::pivot("thread", &derived());
        assert_eq!(table.header(), &["thread", "pacman", "bonsai"]);
        let axis: Vec<_> = table.rows().iter().map(|(x, _)| *x).collect();
        assert_eq!(axis, vec![1.0, 6.0, 12.0]);
        assert_eq!(
            table.rows()[1].1,
            vec![Metric::Value(3.7089), Metric::Value(5.24109)]
        );
    }

    #[test]
    fn csv_echo() {
        let csv = Table::pivot("thread", &derived()).to_csv(2).unwrap();
        let expected = "thread,pacman,bonsai\n\
                        1,0.79,DNF\n\
                        6,3.71,5.24\n\
                        12,6.85,NA\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn csv_round_trip() {
        let derived = derived();
        let table = Table::pivot("thread", &derived);
        let parsed = Table::from_csv(&table.to_csv(2).unwrap()).unwrap();
        assert_eq!(parsed.header(), table.header());

        for name in derived.names() {
            let original = derived.get(name).unwrap();
            let parsed = parsed.column(name).unwrap();
            for (original, parsed) in original.iter().zip(parsed) {
                match (original, parsed) {
                    (Metric::Value(a), Metric::Value(b)) => {
                        assert!((a - b).abs() <= 0.005 + 1e-9)
                    }
                    (a, b) => assert_eq!(*a, b),
                }
            }
        }
    }

    #[test]
    fn bad_csv() {
        assert!(Table::from_csv("thread,a\n1,fast\n").is_err());
    }
}
