// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of one cell of a table.
///
/// Only finite numbers are considered for scoring. Any other content is
/// carried through the computation untouched.
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    Number(f64),
    /// Opaque content: names, identifiers, labels, blank cells.
    Text(String),
}

impl Value {
    /// Interprets the content of a text cell.
    ///
    /// The trimmed content is read as a number if it can be. Anything else,
    /// including the empty string, is kept verbatim as text.
    pub fn parse(s: &str) -> Value {
        match s.trim().parse::<f64>() {
            Ok(x) if x.is_finite() => Value::Number(x),
            _ => Value::Text(s.to_string()),
        }
    }

    /// The value of this cell if it can take part in the scoring.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) if x.is_finite() => Some(*x),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// How a column takes part in the scoring.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ColumnKind {
    /// A criterion: every cell holds a finite number.
    Numeric,
    /// Anything else. Passed through unchanged.
    Identifier,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// A table of alternatives.
///
/// Columns and rows keep their insertion order. Every row has exactly one cell
/// per column. The kind of each column is decided once, at construction.
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table and classifies its columns.
    ///
    /// A column is numeric if the table has at least one row and all of its cells
    /// are finite numbers. All the other columns are identifiers.
    pub fn new<S: AsRef<str>>(header: &[S], rows: Vec<Vec<Value>>) -> Result<Table, TopsisError> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(TopsisError::RaggedRow {
                    row: idx + 1,
                    expected: header.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Table::classified(header, rows))
    }

    // The rows must already have the width of the header.
    pub(crate) fn classified<S: AsRef<str>>(header: &[S], rows: Vec<Vec<Value>>) -> Table {
        let columns = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let is_numeric =
                    !rows.is_empty() && rows.iter().all(|row| row[idx].as_number().is_some());
                Column {
                    name: name.as_ref().to_string(),
                    kind: if is_numeric {
                        ColumnKind::Numeric
                    } else {
                        ColumnKind::Identifier
                    },
                }
            })
            .collect();
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The positions of the numeric columns, in column order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| match c.kind {
                ColumnKind::Numeric => Some(idx),
                ColumnKind::Identifier => None,
            })
            .collect()
    }

    /// The numbers of a numeric column. Cells that are not numbers are skipped,
    /// which never happens for a column classified as numeric.
    pub fn column_values(&self, column: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column).and_then(|v| v.as_number()))
            .collect()
    }

    /// A short human name for a row: the content of the first identifier column,
    /// or its 1-based position if there is no such column.
    pub fn row_label(&self, row: usize) -> String {
        let first_id = self
            .columns
            .iter()
            .position(|c| c.kind == ColumnKind::Identifier);
        match (first_id, self.rows.get(row)) {
            (Some(col), Some(cells)) => cells[col].to_string(),
            _ => format!("#{}", row + 1),
        }
    }
}

/// The direction of preference for a criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Impact {
    /// Higher is better.
    Benefit,
    /// Lower is better.
    Cost,
}

impl Impact {
    /// Reads `benefit` / `cost` (in any case) or the short forms `+` / `-`.
    pub fn from_symbol(symbol: &str) -> Option<Impact> {
        match symbol.trim().to_lowercase().as_str() {
            "benefit" | "+" => Some(Impact::Benefit),
            "cost" | "-" => Some(Impact::Cost),
            _ => None,
        }
    }
}

impl Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Benefit => write!(f, "benefit"),
            Impact::Cost => write!(f, "cost"),
        }
    }
}

// ******** Output data structures *********

/// What the scoring found for one criterion.
#[derive(PartialEq, Debug, Clone)]
pub struct CriterionStats {
    pub name: String,
    /// Position of the criterion in the table.
    pub column: usize,
    pub weight: f64,
    pub impact: Impact,
    /// The divisor used for the vector normalization (1 for an all-zero column).
    pub norm: f64,
    pub ideal_best: f64,
    pub ideal_worst: f64,
}

/// The outcome for one row.
#[derive(PartialEq, Debug, Clone)]
pub struct RowScore {
    pub dist_best: f64,
    pub dist_worst: f64,
    pub score: f64,
    pub rank: u32,
}

/// The input table, augmented with a score and a rank per row.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoredTable {
    pub(crate) table: Table,
    pub(crate) rules: ScoringRules,
    pub(crate) criteria: Vec<CriterionStats>,
    pub(crate) scores: Vec<RowScore>,
}

impl ScoredTable {
    /// The original table, as it was given.
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn criteria(&self) -> &[CriterionStats] {
        &self.criteria
    }

    pub fn row_scores(&self) -> &[RowScore] {
        &self.scores
    }

    pub fn scores(&self) -> Vec<f64> {
        self.scores.iter().map(|rs| rs.score).collect()
    }

    pub fn ranks(&self) -> Vec<u32> {
        self.scores.iter().map(|rs| rs.rank).collect()
    }

    /// The names of all the original columns, followed by the score and rank columns.
    pub fn header(&self) -> Vec<String> {
        let mut res: Vec<String> = self.table.columns.iter().map(|c| c.name.clone()).collect();
        res.push(self.rules.score_column.to_string());
        res.push(self.rules.rank_column.to_string());
        res
    }

    /// The original rows in their original order, each followed by its score and rank.
    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.table
            .rows
            .iter()
            .zip(self.scores.iter())
            .map(|(row, rs)| {
                let mut cells = row.clone();
                cells.push(Value::Number(rs.score));
                cells.push(Value::Number(rs.rank as f64));
                cells
            })
            .collect()
    }
}

/// Which of the two input vectors has the wrong length.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DimensionKind {
    Weights,
    Impacts,
}

impl Display for DimensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionKind::Weights => write!(f, "weights"),
            DimensionKind::Impacts => write!(f, "impacts"),
        }
    }
}

/// Errors that prevent the scoring from running.
///
/// Nothing is computed when one of them is returned.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TopsisError {
    /// Fewer than two numeric criterion columns.
    Schema { numeric_columns: usize },
    /// The weights or the impacts do not line up with the numeric columns.
    DimensionMismatch {
        kind: DimensionKind,
        expected: usize,
        found: usize,
    },
    /// Positions are 1-based.
    InvalidImpact { position: usize, symbol: String },
    /// Positions are 1-based.
    InvalidWeight { position: usize, token: String },
    /// A row does not have one cell per column. Rows are 1-based.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl Error for TopsisError {}

impl Display for TopsisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisError::Schema { numeric_columns } => write!(
                f,
                "the input must contain at least 2 numeric columns, found {}",
                numeric_columns
            ),
            TopsisError::DimensionMismatch {
                kind,
                expected,
                found,
            } => write!(
                f,
                "number of {} ({}) does not match number of numeric columns ({})",
                kind, found, expected
            ),
            TopsisError::InvalidImpact { position, symbol } => write!(
                f,
                "impact #{} is {:?}: impacts must be either 'benefit' ('+') or 'cost' ('-')",
                position, symbol
            ),
            TopsisError::InvalidWeight { position, token } => write!(
                f,
                "weight #{} is {:?}: weights must be non-negative numbers",
                position, token
            ),
            TopsisError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells, expected one per column ({})",
                row, found, expected
            ),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoringRules {
    /// Header of the appended score column.
    pub score_column: &'static str,
    /// Header of the appended rank column.
    pub rank_column: &'static str,
}

impl ScoringRules {
    pub const DEFAULT_RULES: ScoringRules = ScoringRules {
        score_column: "Topsis Score",
        rank_column: "Rank",
    };
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules::DEFAULT_RULES
    }
}
