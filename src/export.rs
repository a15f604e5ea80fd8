use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::compare::COMPARISON_HEADERS;
use crate::table::{CellValue, Table};
use crate::view::{Panel, ViewMode, ViewPayload};

const DATE_FORMAT: &str = "yyyy-mm-dd";

#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub sheets: usize,
    pub rows: usize,
}

pub fn export_file_name(mode: ViewMode, now: NaiveDateTime) -> String {
    format!("coach_{}_{}.xlsx", mode.slug(), now.format("%Y%m%d_%H%M%S"))
}

/// Write the rendered view into a fresh workbook under `dir`.
///
/// The source report is never touched; warnings have nothing to export.
pub fn export_view(
    payload: &ViewPayload<'_>,
    mode: ViewMode,
    dir: &Path,
    now: NaiveDateTime,
) -> Result<ExportReport> {
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let mut workbook = Workbook::new();
    let mut sheets = 0usize;
    let mut rows = 0usize;

    match payload {
        ViewPayload::Overview { kpis, notes } => {
            for panel in [kpis, notes] {
                if let Panel::Table { title, table } = panel {
                    let sheet = workbook.add_worksheet();
                    sheet.set_name(sheet_name(title))?;
                    rows += write_table(sheet, 0, table, &date_format)?;
                    sheets += 1;
                }
            }
            if sheets == 0 {
                bail!("nothing to export: overview sheets are missing");
            }
        }
        ViewPayload::Compare { comparison, .. } => {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Comparison")?;
            write_header(sheet, 0, COMPARISON_HEADERS.iter().copied())?;
            for (idx, row) in comparison.rows.iter().enumerate() {
                let r = idx as u32 + 1;
                write_cell(sheet, r, 0, &CellValue::Text(row.metric.clone()), &date_format)?;
                write_cell(sheet, r, 1, &row.game1, &date_format)?;
                write_cell(sheet, r, 2, &row.game2, &date_format)?;
                if let Some(diff) = row.difference {
                    sheet
                        .write_number(r, 3, diff)
                        .with_context(|| format!("write cell ({r},3)"))?;
                }
            }
            sheets = 1;
            rows = comparison.rows.len();
        }
        ViewPayload::Trend { series, .. } => {
            let sheet = workbook.add_worksheet();
            sheet.set_name(sheet_name(&series.title))?;
            write_header(sheet, 0, ["Date", series.metric.as_str()])?;
            for (idx, point) in series.points.iter().enumerate() {
                let r = idx as u32 + 1;
                write_cell(sheet, r, 0, &CellValue::Date(point.date), &date_format)?;
                if let Some(value) = point.value {
                    sheet
                        .write_number(r, 1, value)
                        .with_context(|| format!("write cell ({r},1)"))?;
                }
            }
            sheets = 1;
            rows = series.points.len();
        }
        ViewPayload::Sheets { table, .. } => {
            let sheet = workbook.add_worksheet();
            sheet.set_name(sheet_name(table.name()))?;
            rows = write_table(sheet, 0, table, &date_format)?;
            sheets = 1;
        }
        ViewPayload::Warning { message, .. } => bail!("nothing to export: {message}"),
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed creating export dir {}", dir.display()))?;
    let path = dir.join(export_file_name(mode, now));
    workbook
        .save(&path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    info!(path = %path.display(), sheets, rows, "view exported");
    Ok(ExportReport { path, sheets, rows })
}

/// Header plus body starting at `first_row`. Returns the number of body rows.
pub(crate) fn write_table(
    worksheet: &mut Worksheet,
    first_row: u32,
    table: &Table,
    date_format: &Format,
) -> Result<usize> {
    write_header(worksheet, first_row, table.columns().iter().map(String::as_str))?;
    for (row_idx, row) in table.rows().iter().enumerate() {
        let r = first_row + 1 + row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            write_cell(worksheet, r, col_idx as u16, cell, date_format)?;
        }
    }
    Ok(table.row_count())
}

fn write_header<'a>(
    worksheet: &mut Worksheet,
    row: u32,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    for (col_idx, name) in names.into_iter().enumerate() {
        worksheet
            .write_string(row, col_idx as u16, name)
            .with_context(|| format!("write header ({row},{col_idx})"))?;
    }
    Ok(())
}

pub(crate) fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    date_format: &Format,
) -> Result<()> {
    let written = match cell {
        CellValue::Empty => return Ok(()),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
        CellValue::Number(n) => worksheet.write_number(row, col, *n),
        CellValue::Text(s) => worksheet.write_string(row, col, s),
        CellValue::Date(dt) => {
            worksheet.write_number_with_format(row, col, excel_serial(dt), date_format)
        }
    };
    written.with_context(|| format!("write cell ({row},{col})"))?;
    Ok(())
}

fn excel_serial(dt: &NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .unwrap_or_default();
    (*dt - epoch).num_milliseconds() as f64 / 86_400_000.0
}

/// Excel caps sheet names at 31 characters and rejects a few symbols.
fn sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sheet_name("Goals/Shots Over Time"), "Goals_Shots Over Time");
        assert_eq!(sheet_name(""), "Sheet");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn serial_matches_excel_epoch() {
        let dt = NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_time(chrono::NaiveTime::MIN);
        assert_eq!(excel_serial(&dt), 45536.0);
    }
}
