use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook};

use crate::export::write_table;
use crate::registry::{SheetRole, TableRegistry};
use crate::table::{CellValue, Table};

fn date(y: i32, m: u32, d: u32) -> CellValue {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(|day| CellValue::Date(day.and_time(chrono::NaiveTime::MIN)))
        .unwrap_or(CellValue::Empty)
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn sample_match_summary() -> Table {
    let header = columns(&[
        "Date",
        "Opponent",
        "Venue",
        "Result",
        "Goals",
        "Goals Against",
        "Shots",
        "Shots on Target",
        "xG",
        "Possession %",
        "Pass Accuracy %",
        "Corners",
    ]);
    let fixtures: [(CellValue, &str, &str, &str, [f64; 8]); 8] = [
        (date(2024, 8, 22), "Duke", "H", "W", [3.0, 1.0, 17.0, 8.0, 2.41, 58.0, 81.5, 7.0]),
        (date(2024, 8, 29), "UNC", "A", "L", [1.0, 2.0, 9.0, 3.0, 0.92, 44.0, 76.2, 3.0]),
        (date(2024, 9, 6), "Clemson", "H", "D", [1.0, 1.0, 12.0, 5.0, 1.37, 51.0, 79.8, 6.0]),
        (date(2024, 9, 13), "NC State", "A", "W", [2.0, 0.0, 14.0, 6.0, 1.88, 55.0, 82.1, 5.0]),
        (text("TBD"), "Virginia", "H", "L", [0.0, 1.0, 8.0, 2.0, 0.64, 47.0, 74.9, 2.0]),
        (date(2024, 9, 27), "Louisville", "A", "W", [2.0, 1.0, 15.0, 7.0, 2.05, 53.0, 80.4, 8.0]),
        (date(2024, 10, 4), "Notre Dame", "H", "D", [0.0, 0.0, 10.0, 4.0, 1.02, 49.0, 78.3, 4.0]),
        (date(2024, 10, 11), "Pitt", "A", "W", [4.0, 2.0, 19.0, 10.0, 3.12, 61.0, 84.0, 9.0]),
    ];

    let rows = fixtures
        .into_iter()
        .map(|(day, opponent, venue, result, stats)| {
            let mut row = vec![day, text(opponent), text(venue), text(result)];
            row.extend(stats.into_iter().map(num));
            row
        })
        .collect();
    Table::new(SheetRole::MatchSummary.sheet_name(), header, rows)
}

pub fn sample_coach_view() -> Table {
    let rows = [
        ("Record (W-D-L)", text("4-2-2"), text("6-1-1"), "Behind"),
        ("Goals For", num(13.0), num(16.0), "Behind"),
        ("Goals Against", num(8.0), num(6.0), "Behind"),
        ("Avg xG", num(1.68), num(1.8), "On track"),
        ("Avg Possession %", num(52.4), num(55.0), "On track"),
        ("Clean Sheets", num(2.0), num(4.0), "Behind"),
    ]
    .into_iter()
    .map(|(kpi, value, target, status)| vec![text(kpi), value, target, text(status)])
    .collect();
    Table::new(
        SheetRole::CoachView.sheet_name(),
        columns(&["KPI", "Season", "Target", "Status"]),
        rows,
    )
}

pub fn sample_targets_notes() -> Table {
    let rows = vec![
        vec![
            text("Finishing"),
            text("Shots on target > 45%"),
            text("Extra finishing reps Tue/Thu"),
        ],
        vec![
            text("Set pieces"),
            text("1 goal per 3 games"),
            CellValue::Empty,
        ],
        vec![CellValue::Empty, CellValue::Empty, text("Review Pitt film")],
        vec![
            text("Pressing"),
            text("PPDA < 9"),
            text("Front three trigger on back pass"),
        ],
    ];
    Table::new(
        SheetRole::TargetsNotes.sheet_name(),
        columns(&["Focus Area", "Target", "Notes"]),
        rows,
    )
}

pub fn sample_registry() -> TableRegistry {
    TableRegistry::new(vec![
        sample_match_summary(),
        sample_coach_view(),
        sample_targets_notes(),
    ])
}

/// Write `tables` as a report workbook: a title row, a blank row, then the
/// header on the third row.
pub fn write_report(path: &Path, title: &str, tables: &[Table]) -> Result<()> {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let mut workbook = Workbook::new();
    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(table.name())
            .with_context(|| format!("invalid sheet name {}", table.name()))?;
        sheet
            .write_string(0, 0, format!("{title} | {}", table.name()))
            .context("write title row")?;
        write_table(sheet, 2, table, &date_format)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

pub fn write_sample_report(path: &Path) -> Result<()> {
    let registry = sample_registry();
    write_report(path, "WFU Soccer Team Report", registry.tables())
}

/// Midnight on the given day, for callers building their own tables.
pub fn day(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).map(|day| day.and_time(chrono::NaiveTime::MIN))
}
