use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use wfu_coach_dashboard::compare::COMPARISON_HEADERS;
use wfu_coach_dashboard::config::DashboardConfig;
use wfu_coach_dashboard::loader::load_workbook;
use wfu_coach_dashboard::table::{Table, format_date, format_number};
use wfu_coach_dashboard::view::{Panel, Selections, ViewMode, ViewPayload, render_view};

#[derive(Debug, Default)]
struct Args {
    file: Option<PathBuf>,
    view: ViewMode,
    selections: Selections,
    json: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let args = parse_args(std::env::args().skip(1).collect())?;
    let config = DashboardConfig::from_env();
    let path = args.file.unwrap_or(config.report_path);

    let registry = load_workbook(&path, config.header_row)
        .with_context(|| format!("unable to load {}", path.display()))?;
    let payload = render_view(&registry, args.view, &args.selections);

    if args.json {
        let json = serde_json::to_string_pretty(&payload).context("serialize view")?;
        println!("{json}");
    } else {
        println!("{}", args.view.heading());
        println!("{}", "=".repeat(args.view.heading().len()));
        print!("{}", payload_text(&payload));
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut out = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        if flag == "--json" {
            out.json = true;
            continue;
        }
        let value = match inline {
            Some(value) => value,
            None => iter
                .next()
                .with_context(|| format!("missing value for {flag}"))?,
        };
        match flag.as_str() {
            "--file" => out.file = Some(PathBuf::from(value)),
            "--view" => {
                out.view = ViewMode::from_slug(&value)
                    .with_context(|| format!("unknown view {value}"))?;
            }
            "--game1" => out.selections.game1 = Some(value),
            "--game2" => out.selections.game2 = Some(value),
            "--metric" => out
                .selections
                .metrics
                .get_or_insert_with(Vec::new)
                .push(value),
            "--trend-metric" => out.selections.trend_metric = Some(value),
            "--sheet" => out.selections.sheet = Some(value),
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(out)
}

fn payload_text(payload: &ViewPayload<'_>) -> String {
    let mut out = String::new();
    match payload {
        ViewPayload::Overview { kpis, notes } => {
            for panel in [kpis, notes] {
                out.push_str(&format!("\n{}\n", panel.title()));
                match panel {
                    Panel::Table { table, .. } => out.push_str(&table_text(table)),
                    Panel::Warning { message, .. } => out.push_str(&format!("WARNING: {message}\n")),
                }
            }
        }
        ViewPayload::Compare { comparison, .. } => {
            out.push_str(&format!("Game 1: {}\nGame 2: {}\n\n", comparison.game1, comparison.game2));
            let rows: Vec<Vec<String>> = comparison
                .rows
                .iter()
                .map(|row| {
                    vec![
                        row.metric.clone(),
                        row.game1.to_string(),
                        row.game2.to_string(),
                        row.difference.map(format_number).unwrap_or_default(),
                    ]
                })
                .collect();
            out.push_str(&grid_text(&COMPARISON_HEADERS, &rows));
        }
        ViewPayload::Trend { series, .. } => {
            out.push_str(&format!("{}\n\n", series.title));
            let rows: Vec<Vec<String>> = series
                .points
                .iter()
                .map(|p| {
                    vec![
                        format_date(&p.date),
                        p.value.map(format_number).unwrap_or_default(),
                    ]
                })
                .collect();
            out.push_str(&grid_text(&["Date", series.metric.as_str()], &rows));
        }
        ViewPayload::Sheets { sheet_names, table } => {
            out.push_str(&format!("Sheets: {}\n\n{}\n", sheet_names.join(", "), table.name()));
            out.push_str(&table_text(table));
        }
        ViewPayload::Warning { message, .. } => out.push_str(&format!("WARNING: {message}\n")),
    }
    out
}

fn table_text(table: &Table) -> String {
    let headers: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    grid_text(&headers, &rows)
}

fn grid_text(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<width$}", width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
