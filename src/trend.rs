use chrono::NaiveDateTime;
use serde::Serialize;

use crate::compare::{self, DATE_COLUMN};
use crate::error::{DashboardError, Result};
use crate::table::{Table, coerce_date};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDateTime,
    /// `None` leaves a gap in the line.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub metric: String,
    pub title: String,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    /// `(min, max)` over the dated values, if any value is present.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.value)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn date_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.points.iter().map(|p| p.date).min()?;
        let last = self.points.iter().map(|p| p.date).max()?;
        Some((first, last))
    }
}

pub fn trend_title(metric: &str) -> String {
    format!("{metric} Over Time")
}

/// Build the series for one numeric column.
///
/// Rows whose date does not coerce are dropped, the rest stay in table order.
pub fn trend_series(table: &Table, metric: Option<&str>) -> Result<TrendSeries> {
    let date_col = table.column_index(DATE_COLUMN).ok_or_else(|| {
        DashboardError::Schema(format!("{} is missing the {DATE_COLUMN} column", table.name()))
    })?;

    let numeric = compare::metric_columns(table);
    let Some(&first) = numeric.first() else {
        return Err(DashboardError::Schema(format!(
            "{} has no numeric columns to chart",
            table.name()
        )));
    };

    let metric = metric.unwrap_or(first);
    let metric_col = match table.column_index(metric) {
        Some(idx) if numeric.contains(&metric) => idx,
        Some(_) => {
            return Err(DashboardError::Schema(format!(
                "{metric} is not a numeric column"
            )));
        }
        None => {
            return Err(DashboardError::Schema(format!(
                "Unknown metric column: {metric}"
            )));
        }
    };

    let points = (0..table.row_count())
        .filter_map(|row| {
            let date = coerce_date(table.cell(row, date_col))?;
            Some(TrendPoint {
                date,
                value: table.cell(row, metric_col).as_number(),
            })
        })
        .collect();

    Ok(TrendSeries {
        metric: metric.to_string(),
        title: trend_title(metric),
        points,
    })
}
