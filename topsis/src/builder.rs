pub use crate::config::*;

/// A builder for assembling a table row by row.
///
/// This is the simplest way to feed data that comes from a text source.
///
/// ```
/// pub use topsis::builder::Builder;
/// pub use topsis::{score, Impact};
/// # use topsis::TopsisError;
///
/// let mut builder = Builder::new(&["Model", "Price", "Storage", "Camera"]);
///
/// builder.add_row_str(&["M1", "250", "16", "12"])?;
/// builder.add_row_str(&["M2", "200", "16", "8"])?;
/// builder.add_row_str(&["M3", "300", "32", "16"])?;
///
/// let table = builder.build();
/// let scored = score(&table, &[1.0, 1.0, 1.0], &[Impact::Cost, Impact::Benefit, Impact::Benefit])?;
/// assert_eq!(scored.ranks()[2], 1);
///
/// # Ok::<(), TopsisError>(())
/// ```
pub struct Builder {
    pub(crate) _header: Vec<String>,
    pub(crate) _rows: Vec<Vec<Value>>,
}

impl Builder {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Builder {
        Builder {
            _header: header.iter().map(|s| s.as_ref().to_string()).collect(),
            _rows: Vec::new(),
        }
    }

    /// Adds a row of text cells. Each cell is interpreted with [Value::parse].
    pub fn add_row_str(&mut self, cells: &[&str]) -> Result<(), TopsisError> {
        let values: Vec<Value> = cells.iter().map(|s| Value::parse(s)).collect();
        self.add_row(values)
    }

    /// Adds a row of cells.
    ///
    /// The row must have exactly one cell per column of the header.
    pub fn add_row(&mut self, cells: Vec<Value>) -> Result<(), TopsisError> {
        if cells.len() != self._header.len() {
            return Err(TopsisError::RaggedRow {
                row: self._rows.len() + 1,
                expected: self._header.len(),
                found: cells.len(),
            });
        }
        self._rows.push(cells);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    /// Classifies the columns and returns the table.
    pub fn build(self) -> Table {
        Table::classified(&self._header, self._rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_columns() {
        let mut b = Builder::new(&["Name", "A", "B", "Mixed", "Blank"]);
        b.add_row_str(&["x", "1", " 2.5 ", "3", "4"]).unwrap();
        b.add_row_str(&["y", "-1", "1e3", "n/a", ""]).unwrap();
        let table = b.build();

        let kinds: Vec<ColumnKind> = table.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Identifier,
                ColumnKind::Numeric,
                ColumnKind::Numeric,
                ColumnKind::Identifier,
                ColumnKind::Identifier,
            ]
        );
        assert_eq!(table.numeric_columns(), vec![1, 2]);
        assert_eq!(table.column_values(2), vec![2.5, 1000.0]);
        assert_eq!(table.rows()[1][3], Value::Text("n/a".to_string()));
        assert_eq!(table.row_label(1), "y");
    }

    #[test]
    fn non_finite_cells_are_text() {
        let mut b = Builder::new(&["A", "B"]);
        b.add_row_str(&["NaN", "1"]).unwrap();
        b.add_row(vec![Value::Number(f64::INFINITY), Value::Number(2.0)])
            .unwrap();
        let table = b.build();
        assert_eq!(table.rows()[0][0], Value::Text("NaN".to_string()));
        assert_eq!(table.numeric_columns(), vec![1]);
        assert_eq!(table.row_label(0), "NaN");
    }

    #[test]
    fn no_identifier_column() {
        let mut b = Builder::new(&["A", "B"]);
        b.add_row_str(&["1", "2"]).unwrap();
        let table = b.build();
        assert_eq!(table.row_label(0), "#1");
    }

    #[test]
    fn empty_table_has_no_criteria() {
        let table = Builder::new(&["A", "B"]).build();
        assert!(table.numeric_columns().is_empty());
    }

    #[test]
    fn ragged_row() {
        let mut b = Builder::new(&["A", "B", "C"]);
        b.add_row_str(&["1", "2", "3"]).unwrap();
        assert_eq!(
            b.add_row_str(&["1", "2"]),
            Err(TopsisError::RaggedRow {
                row: 2,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(b.num_rows(), 1);

        let res = Table::new(&["A", "B"], vec![vec![Value::Number(1.0)]]);
        assert!(matches!(res, Err(TopsisError::RaggedRow { row: 1, .. })));
    }
}
