use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One scalar cell as read from the workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Only a truly blank cell is empty; whitespace text is kept as typed.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String form used when a cell is spliced into a label. Missing values
    /// read as `nan` so that a label is still produced for partial rows.
    pub fn label_text(&self) -> String {
        if self.is_empty() {
            return "nan".to_string();
        }
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(dt) => write!(f, "{}", format_date(dt)),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    if dt.time() == chrono::NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Coerce a cell to a timestamp. Anything that does not look like a date
/// comes back as `None` instead of an error.
pub fn coerce_date(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Date(dt) => Some(*dt),
        CellValue::Text(raw) => parse_date_text(raw),
        CellValue::Number(n) => excel_serial_to_datetime(*n),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

pub fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 7] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M",
    ];
    const DATE_FORMATS: [&str; 9] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%m/%d/%y",
        "%d %b %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%B %d, %Y",
        "%b %d %Y",
    ];

    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    None
}

/// Excel stores dates as days since 1899-12-30.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // 9999-12-31 is the last day Excel can represent.
    const MAX_SERIAL: f64 = 2_958_465.0;
    if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(chrono::NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Date,
    Text,
    Empty,
    Mixed,
}

impl ColumnKind {
    fn infer<'a>(cells: impl Iterator<Item = &'a CellValue>) -> Self {
        let mut kind = ColumnKind::Empty;
        for cell in cells {
            if cell.is_empty() {
                continue;
            }
            let this = match cell {
                CellValue::Number(_) => ColumnKind::Numeric,
                CellValue::Date(_) => ColumnKind::Date,
                CellValue::Text(_) | CellValue::Bool(_) => ColumnKind::Text,
                CellValue::Empty => continue,
            };
            kind = match kind {
                ColumnKind::Empty => this,
                current if current == this => current,
                _ => return ColumnKind::Mixed,
            };
        }
        kind
    }
}

/// A named rectangular block of cells with a header row.
///
/// The column-kind vector is computed once on construction and never
/// revisited; tables are immutable after that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        let kinds = (0..width)
            .map(|col| ColumnKind::infer(rows.iter().map(|row| &row[col])))
            .collect();
        Self {
            name: name.into(),
            columns,
            kinds,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column_index(name).map(|idx| self.kinds[idx])
    }

    /// Numeric columns in column order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.kinds)
            .filter(|(_, kind)| **kind == ColumnKind::Numeric)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}
