use std::collections::{HashMap, HashSet};
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::registry::TableRegistry;
use crate::table::{CellValue, Table, format_number, parse_date_text};

/// Zero-based physical row holding the column headers (the third row).
pub const DEFAULT_HEADER_ROW: u32 = 2;

/// Read every sheet of the workbook at `path` into a registry.
///
/// Rows above `header_row` are presentation artifacts and are skipped.
pub fn load_workbook(path: &Path, header_row: u32) -> Result<TableRegistry> {
    if !path.exists() {
        return Err(DashboardError::ResourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DashboardError::Parse(format!("{}: {e}", path.display())))?;

    let mut tables = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| DashboardError::Parse(format!("sheet {name}: {e}")))?;
        let table = table_from_range(&name, &range, header_row);
        debug!(
            sheet = %name,
            rows = table.row_count(),
            columns = table.column_count(),
            "sheet loaded"
        );
        tables.push(table);
    }

    info!(path = %path.display(), sheets = tables.len(), "workbook loaded");
    Ok(TableRegistry::new(tables))
}

/// Build a table from a calamine range using physical row/column positions.
///
/// calamine trims leading blank rows and columns from a range, so positions
/// are translated back through `Range::start` before picking the header.
pub fn table_from_range(name: &str, range: &Range<Data>, header_row: u32) -> Table {
    let (Some(start), Some(end)) = (range.start(), range.end()) else {
        return Table::new(name, Vec::new(), Vec::new());
    };
    let width = (end.1 + 1) as usize;

    let physical_row = |row: u32| -> Vec<CellValue> {
        (0..width as u32)
            .map(|col| {
                if row < start.0 || col < start.1 {
                    return CellValue::Empty;
                }
                range
                    .get_value((row, col))
                    .map(cell_from_data)
                    .unwrap_or(CellValue::Empty)
            })
            .collect()
    };

    let columns = header_names(&physical_row(header_row));

    let mut rows: Vec<Vec<CellValue>> = (header_row + 1..=end.0).map(physical_row).collect();
    while rows
        .last()
        .is_some_and(|row| row.iter().all(CellValue::is_empty))
    {
        rows.pop();
    }

    Table::new(name, columns, rows)
}

/// Header cells become column names verbatim. Blank cells are named by
/// position and repeats get the lowest free `.<n>` suffix.
fn header_names(cells: &[CellValue]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(cells.len());
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(cells.len());
    for (idx, cell) in cells.iter().enumerate() {
        let base = match cell {
            CellValue::Empty => format!("Unnamed: {idx}"),
            CellValue::Text(s) => s.clone(),
            other => other.to_string(),
        };
        let name = if taken.contains(&base) {
            let n = suffixes.entry(base.clone()).or_insert(0);
            loop {
                *n += 1;
                let candidate = format!("{base}.{n}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };
        taken.insert(name.clone());
        names.push(name);
    }
    names
}

pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::Date(value),
            None => CellValue::Text(format_number(dt.as_f64())),
        },
        Data::DateTimeIso(s) => match parse_date_text(s) {
            Some(value) => CellValue::Date(value),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
