use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::table::{CellValue, Table, coerce_date};

pub const DATE_COLUMN: &str = "Date";
pub const OPPONENT_COLUMN: &str = "Opponent";
pub const RESULT_COLUMN: &str = "Result";
pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const DEFAULT_METRIC_COUNT: usize = 6;

pub const COMPARISON_HEADERS: [&str; 4] =
    ["Metric", "Game 1", "Game 2", "Difference (Game2 - Game1)"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: String,
    pub game1: CellValue,
    pub game2: CellValue,
    /// `None` when either side is not a number.
    pub difference: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub game1: String,
    pub game2: String,
    pub rows: Vec<ComparisonRow>,
}

pub fn game_label(date: Option<NaiveDateTime>, opponent: &CellValue, result: &CellValue) -> String {
    let date = date
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());
    format!(
        "{date} vs {} ({})",
        opponent.label_text(),
        result.label_text()
    )
}

/// One label per row, in row order. Duplicate labels are kept as-is.
pub fn game_labels(table: &Table) -> Result<Vec<String>> {
    let opponent = required_column(table, OPPONENT_COLUMN)?;
    let result = required_column(table, RESULT_COLUMN)?;
    let date = table.column_index(DATE_COLUMN);

    Ok((0..table.row_count())
        .map(|row| {
            let parsed = date.and_then(|col| coerce_date(table.cell(row, col)));
            game_label(parsed, table.cell(row, opponent), table.cell(row, result))
        })
        .collect())
}

/// Numeric columns that can be picked as a metric. `Date` is a key even when
/// it holds bare serial numbers.
pub fn metric_columns(table: &Table) -> Vec<&str> {
    table
        .numeric_columns()
        .into_iter()
        .filter(|name| *name != DATE_COLUMN)
        .collect()
}

/// The first metric columns in column order.
pub fn default_metrics(table: &Table) -> Vec<String> {
    metric_columns(table)
        .into_iter()
        .take(DEFAULT_METRIC_COUNT)
        .map(str::to_string)
        .collect()
}

/// Compare two games metric by metric.
///
/// Missing selections fall back to the first and second game and to
/// [`default_metrics`]. When two rows share a label the first row wins.
pub fn compare_games(
    table: &Table,
    game1: Option<&str>,
    game2: Option<&str>,
    metrics: Option<&[String]>,
) -> Result<Comparison> {
    let labels = game_labels(table)?;
    let (label1, row1) = resolve_game(&labels, game1, 0)?;
    let (label2, row2) = resolve_game(&labels, game2, 1)?;

    let metrics = match metrics {
        Some(list) => list.to_vec(),
        None => default_metrics(table),
    };

    let mut rows = Vec::with_capacity(metrics.len());
    for metric in metrics {
        let col = table
            .column_index(&metric)
            .ok_or_else(|| DashboardError::Schema(format!("Unknown metric column: {metric}")))?;
        let game1 = table.cell(row1, col).clone();
        let game2 = table.cell(row2, col).clone();
        let difference = match (game1.as_number(), game2.as_number()) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        };
        rows.push(ComparisonRow {
            metric,
            game1,
            game2,
            difference,
        });
    }

    Ok(Comparison {
        game1: label1,
        game2: label2,
        rows,
    })
}

fn resolve_game(labels: &[String], wanted: Option<&str>, fallback: usize) -> Result<(String, usize)> {
    match wanted {
        Some(label) => labels
            .iter()
            .position(|l| l == label)
            .map(|row| (label.to_string(), row))
            .ok_or_else(|| DashboardError::Selection {
                label: label.to_string(),
            }),
        None => labels
            .get(fallback)
            .map(|label| (label.clone(), fallback))
            .ok_or_else(|| DashboardError::Selection {
                label: format!("game {} (table has {} rows)", fallback + 1, labels.len()),
            }),
    }
}

fn required_column(table: &Table, name: &str) -> Result<usize> {
    table.column_index(name).ok_or_else(|| {
        DashboardError::Schema(format!("{} is missing the {name} column", table.name()))
    })
}
