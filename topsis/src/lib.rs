mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

pub use crate::config::*;

// **** Private structures ****

// The weighted, normalized criteria, stored column by column.
#[derive(PartialEq, Debug, Clone)]
struct WeightedMatrix {
    columns: Vec<Vec<f64>>,
    norms: Vec<f64>,
}

impl WeightedMatrix {
    fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Euclidean distance between one row and a reference point.
    ///
    /// Accumulated with `hypot`, so large weights do not overflow the squares.
    fn distance(&self, row: usize, point: &[f64]) -> f64 {
        self.columns
            .iter()
            .zip(point.iter())
            .fold(0.0_f64, |acc, (col, p)| acc.hypot(col[row] - p))
    }
}

#[derive(PartialEq, Debug, Clone)]
struct IdealPoints {
    best: Vec<f64>,
    worst: Vec<f64>,
}

/// Scores and ranks the rows of a table with the default rules.
///
/// Arguments:
/// * `table` the alternatives. Its numeric columns are the criteria.
/// * `weights` one non-negative weight per numeric column, in column order. They do not need
/// to sum to 1.
/// * `impacts` one impact per numeric column, in column order.
///
/// The input table is left untouched. The returned table holds a copy of it.
///
/// ```
/// use topsis::{score, Impact, Table, Value};
///
/// let table = Table::new(
///     &["Name", "Price", "Storage"],
///     vec![
///         vec![Value::parse("A"), Value::Number(250.0), Value::Number(16.0)],
///         vec![Value::parse("B"), Value::Number(200.0), Value::Number(32.0)],
///     ],
/// )?;
/// let scored = score(&table, &[1.0, 1.0], &[Impact::Cost, Impact::Benefit])?;
/// assert_eq!(scored.ranks(), vec![2, 1]);
/// # Ok::<(), topsis::TopsisError>(())
/// ```
pub fn score(
    table: &Table,
    weights: &[f64],
    impacts: &[Impact],
) -> Result<ScoredTable, TopsisError> {
    score_with_rules(table, weights, impacts, &ScoringRules::DEFAULT_RULES)
}

/// Same as [score], with explicit rules.
pub fn score_with_rules(
    table: &Table,
    weights: &[f64],
    impacts: &[Impact],
    rules: &ScoringRules,
) -> Result<ScoredTable, TopsisError> {
    let criteria = checks(table, weights, impacts.len())?;
    check_weights(weights)?;
    Ok(run_scoring(table, &criteria, weights, impacts, rules))
}

/// Same as [score], with the impacts given as symbols (`benefit`, `cost`, `+`, `-`).
///
/// The validation happens in this order: enough numeric columns, number of weights,
/// number of impacts, the impact symbols themselves, then the weight values.
pub fn score_symbols<S: AsRef<str>>(
    table: &Table,
    weights: &[f64],
    impact_symbols: &[S],
) -> Result<ScoredTable, TopsisError> {
    let criteria = checks(table, weights, impact_symbols.len())?;
    let mut impacts: Vec<Impact> = Vec::new();
    for (idx, s) in impact_symbols.iter().enumerate() {
        let impact = Impact::from_symbol(s.as_ref()).ok_or_else(|| TopsisError::InvalidImpact {
            position: idx + 1,
            symbol: s.as_ref().to_string(),
        })?;
        impacts.push(impact);
    }
    check_weights(weights)?;
    Ok(run_scoring(
        table,
        &criteria,
        weights,
        &impacts,
        &ScoringRules::DEFAULT_RULES,
    ))
}

/// Parses a comma-separated list of weights, such as `1,1,0.5,2`.
pub fn parse_weights(s: &str) -> Result<Vec<f64>, TopsisError> {
    s.split(',')
        .enumerate()
        .map(|(idx, token)| match token.trim().parse::<f64>() {
            Ok(x) if x.is_finite() && x >= 0.0 => Ok(x),
            _ => Err(TopsisError::InvalidWeight {
                position: idx + 1,
                token: token.trim().to_string(),
            }),
        })
        .collect()
}

/// Parses a comma-separated list of impacts, such as `+,-,benefit,cost`.
pub fn parse_impacts(s: &str) -> Result<Vec<Impact>, TopsisError> {
    s.split(',')
        .enumerate()
        .map(|(idx, symbol)| {
            Impact::from_symbol(symbol).ok_or_else(|| TopsisError::InvalidImpact {
                position: idx + 1,
                symbol: symbol.trim().to_string(),
            })
        })
        .collect()
}

// Returns the positions of the criteria columns.
fn checks(
    table: &Table,
    weights: &[f64],
    num_impacts: usize,
) -> Result<Vec<usize>, TopsisError> {
    let criteria = table.numeric_columns();
    debug!(
        "checks: {:?} rows, criteria columns: {:?}",
        table.num_rows(),
        criteria
    );
    if criteria.len() < 2 {
        return Err(TopsisError::Schema {
            numeric_columns: criteria.len(),
        });
    }
    if weights.len() != criteria.len() {
        return Err(TopsisError::DimensionMismatch {
            kind: DimensionKind::Weights,
            expected: criteria.len(),
            found: weights.len(),
        });
    }
    if num_impacts != criteria.len() {
        return Err(TopsisError::DimensionMismatch {
            kind: DimensionKind::Impacts,
            expected: criteria.len(),
            found: num_impacts,
        });
    }
    Ok(criteria)
}

// Comes last: a bad impact symbol is reported before a bad weight value.
fn check_weights(weights: &[f64]) -> Result<(), TopsisError> {
    match weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        Some((idx, w)) => Err(TopsisError::InvalidWeight {
            position: idx + 1,
            token: w.to_string(),
        }),
        None => Ok(()),
    }
}

// The validation is done at this point.
fn run_scoring(
    table: &Table,
    criteria: &[usize],
    weights: &[f64],
    impacts: &[Impact],
    rules: &ScoringRules,
) -> ScoredTable {
    info!(
        "Scoring {:?} rows over {:?} criteria",
        table.num_rows(),
        criteria.len()
    );

    let matrix = weighted_matrix(table, criteria, weights);
    debug!("run_scoring: norms: {:?}", matrix.norms);

    let ideals = ideal_points(&matrix, impacts);
    debug!(
        "run_scoring: ideal best: {:?} ideal worst: {:?}",
        ideals.best, ideals.worst
    );

    let mut scores: Vec<RowScore> = (0..matrix.num_rows())
        .map(|row| {
            let dist_best = matrix.distance(row, &ideals.best);
            let dist_worst = matrix.distance(row, &ideals.worst);
            RowScore {
                dist_best,
                dist_worst,
                score: closeness(dist_best, dist_worst),
                rank: 0,
            }
        })
        .collect();
    debug!(
        "run_scoring: distances (best, worst): {:?}",
        scores
            .iter()
            .map(|rs| (rs.dist_best, rs.dist_worst))
            .collect::<Vec<(f64, f64)>>()
    );

    let ranks = dense_ranks(&scores.iter().map(|rs| rs.score).collect::<Vec<f64>>());
    for (rs, rank) in scores.iter_mut().zip(ranks) {
        rs.rank = rank;
    }

    let criteria_stats: Vec<CriterionStats> = criteria
        .iter()
        .enumerate()
        .map(|(idx, &column)| CriterionStats {
            name: table.columns()[column].name.clone(),
            column,
            weight: weights[idx],
            impact: impacts[idx],
            norm: matrix.norms[idx],
            ideal_best: ideals.best[idx],
            ideal_worst: ideals.worst[idx],
        })
        .collect();

    {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by_key(|&row| scores[row].rank);
        for row in order {
            info!(
                "Rank {}: {} (score {:.4})",
                scores[row].rank,
                table.row_label(row),
                scores[row].score
            );
        }
    }

    ScoredTable {
        table: table.clone(),
        rules: rules.clone(),
        criteria: criteria_stats,
        scores,
    }
}

// Normalizes each criterion by its root-sum-of-squares, then applies the weight.
fn weighted_matrix(table: &Table, criteria: &[usize], weights: &[f64]) -> WeightedMatrix {
    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut norms: Vec<f64> = Vec::new();
    for (&column, &weight) in criteria.iter().zip(weights.iter()) {
        let values = table.column_values(column);
        let norm = column_norm(&values);
        columns.push(values.iter().map(|x| x / norm * weight).collect());
        norms.push(norm);
    }
    WeightedMatrix { columns, norms }
}

// An all-zero column keeps a divisor of 1 and stays all zeros.
fn column_norm(values: &[f64]) -> f64 {
    let rss = values.iter().fold(0.0_f64, |acc, x| acc.hypot(*x));
    if rss == 0.0 {
        1.0
    } else {
        rss
    }
}

fn ideal_points(matrix: &WeightedMatrix, impacts: &[Impact]) -> IdealPoints {
    let mut best: Vec<f64> = Vec::new();
    let mut worst: Vec<f64> = Vec::new();
    for (col, impact) in matrix.columns.iter().zip(impacts.iter()) {
        let max = col.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = col.iter().cloned().fold(f64::INFINITY, f64::min);
        match impact {
            Impact::Benefit => {
                best.push(max);
                worst.push(min);
            }
            Impact::Cost => {
                best.push(min);
                worst.push(max);
            }
        }
    }
    IdealPoints { best, worst }
}

// Relative closeness to the ideal solution, dist_worst / (dist_best + dist_worst).
// Written as a ratio so that the sum of two large distances cannot overflow.
// A row sitting on the ideal worst point gets 0, including the case where it
// also sits on the ideal best point (all the rows are equal).
fn closeness(dist_best: f64, dist_worst: f64) -> f64 {
    if dist_worst == 0.0 {
        0.0
    } else {
        1.0 / (1.0 + dist_best / dist_worst)
    }
}

/// Dense ranking, highest score first: equal scores share a rank and the next
/// distinct score takes the next integer.
fn dense_ranks(scores: &[f64]) -> Vec<u32> {
    let mut distinct: Vec<f64> = scores.to_vec();
    distinct.sort_by(|a, b| b.total_cmp(a));
    distinct.dedup_by(|a, b| a.total_cmp(b) == std::cmp::Ordering::Equal);
    scores
        .iter()
        .map(|s| {
            let pos = distinct
                .binary_search_by(|d| s.total_cmp(d))
                .unwrap_or_else(|p| p);
            (pos + 1) as u32
        })
        .collect()
}
