use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Wrap,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wfu_coach_dashboard::compare::COMPARISON_HEADERS;
use wfu_coach_dashboard::config::DashboardConfig;
use wfu_coach_dashboard::export::export_view;
use wfu_coach_dashboard::loader::load_workbook;
use wfu_coach_dashboard::registry::TableRegistry;
use wfu_coach_dashboard::state::{AppState, GameSlot, OverviewFocus};
use wfu_coach_dashboard::table::{self as sheet, format_date, format_number};
use wfu_coach_dashboard::trend::TrendSeries;
use wfu_coach_dashboard::view::{Panel, ViewMode, ViewPayload, render_view};

struct App {
    state: AppState,
    config: DashboardConfig,
    registry: Option<TableRegistry>,
    load_error: Option<String>,
    should_quit: bool,
}

/// Option lists of the current view, detached from the registry borrow so
/// that key handling can mutate the state.
#[derive(Default)]
struct ViewOptions {
    games: Vec<String>,
    metric_options: Vec<String>,
    current_metrics: Vec<String>,
    sheet_names: Vec<String>,
    scroll_rows: usize,
}

impl App {
    fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new();
        let (registry, load_error) = match load_workbook(&config.report_path, config.header_row) {
            Ok(registry) => {
                state.push_log(format!(
                    "[INFO] Loaded {} ({} sheets)",
                    config.report_path.display(),
                    registry.tables().len()
                ));
                for role in registry.missing_roles() {
                    state.push_log(format!("[WARN] {}", role.missing_warning()));
                }
                (Some(registry), None)
            }
            Err(err) => {
                error!(error = %err, "workbook load failed");
                state.push_log(format!("[WARN] {err}"));
                (None, Some(err.to_string()))
            }
        };
        Self {
            state,
            config,
            registry,
            load_error,
            should_quit: false,
        }
    }

    fn view_options(&self) -> ViewOptions {
        let Some(registry) = &self.registry else {
            return ViewOptions::default();
        };
        match render_view(registry, self.state.mode, &self.state.selections) {
            ViewPayload::Overview { kpis, notes } => {
                let focused = match self.state.overview_focus {
                    OverviewFocus::Kpis => kpis,
                    OverviewFocus::Notes => notes,
                };
                let scroll_rows = match focused {
                    Panel::Table { table, .. } => table.row_count(),
                    Panel::Warning { .. } => 0,
                };
                ViewOptions {
                    scroll_rows,
                    ..ViewOptions::default()
                }
            }
            ViewPayload::Compare {
                games,
                metric_options,
                comparison,
            } => ViewOptions {
                games,
                metric_options,
                current_metrics: comparison.rows.into_iter().map(|r| r.metric).collect(),
                ..ViewOptions::default()
            },
            ViewPayload::Trend { metric_options, .. } => ViewOptions {
                metric_options,
                ..ViewOptions::default()
            },
            ViewPayload::Sheets { sheet_names, table } => ViewOptions {
                sheet_names,
                scroll_rows: table.row_count(),
                ..ViewOptions::default()
            },
            ViewPayload::Warning { .. } => ViewOptions::default(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let opts = self.view_options();
        let max_scroll = opts.scroll_rows.saturating_sub(1) as u16;
        let mode = self.state.mode;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_mode(ViewMode::CoachOverview),
            KeyCode::Char('2') => self.state.set_mode(ViewMode::CompareTwoGames),
            KeyCode::Char('3') => self.state.set_mode(ViewMode::Trends),
            KeyCode::Char('4') => self.state.set_mode(ViewMode::AllSheets),
            KeyCode::Tab => self.state.cycle_mode(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_current(),
            KeyCode::Char('j') | KeyCode::Down => {
                if mode == ViewMode::CompareTwoGames {
                    self.state
                        .move_metric_cursor(opts.metric_options.len(), true);
                } else {
                    self.state.scroll_down(max_scroll);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if mode == ViewMode::CompareTwoGames {
                    self.state
                        .move_metric_cursor(opts.metric_options.len(), false);
                } else {
                    self.state.scroll_up();
                }
            }
            KeyCode::Char(c @ ('[' | ']')) => {
                let forward = c == ']';
                match mode {
                    ViewMode::CompareTwoGames => {
                        self.state.cycle_game(GameSlot::First, &opts.games, forward)
                    }
                    ViewMode::Trends => self.state.cycle_trend_metric(&opts.metric_options, forward),
                    ViewMode::AllSheets => self.state.cycle_sheet(&opts.sheet_names, forward),
                    ViewMode::CoachOverview => {}
                }
            }
            KeyCode::Char(c @ ('{' | '}')) if mode == ViewMode::CompareTwoGames => {
                self.state
                    .cycle_game(GameSlot::Second, &opts.games, c == '}');
            }
            KeyCode::Char(' ') if mode == ViewMode::CompareTwoGames => {
                self.state
                    .toggle_metric(&opts.metric_options, &opts.current_metrics);
            }
            KeyCode::Char('r') if mode == ViewMode::CompareTwoGames => {
                self.state.reset_metrics();
                self.state.push_log("[INFO] Metric selection reset to defaults");
            }
            KeyCode::Char('f') if mode == ViewMode::CoachOverview => {
                self.state.toggle_overview_focus();
            }
            _ => {}
        }
    }

    fn export_current(&mut self) {
        let Some(registry) = &self.registry else {
            self.state.push_log("[WARN] Nothing to export: workbook not loaded");
            return;
        };
        let mode = self.state.mode;
        let payload = render_view(registry, mode, &self.state.selections);
        let now = chrono::Local::now().naive_local();
        match export_view(&payload, mode, &self.config.export_dir, now) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} ({} sheets, {} rows)",
                report.path.display(),
                report.sheets,
                report.rows
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn init_logging(config: &DashboardConfig) -> anyhow::Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("{err}"))
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = DashboardConfig::from_env();
    let logging = init_logging(&config);

    let mut app = App::new(config);
    if let Err(err) = logging {
        app.state.push_log(format!("[WARN] Logging disabled: {err:#}"));
    }
    info!(path = %app.config.report_path.display(), "dashboard started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = app.config.tick_rate;
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)])
        .split(chunks[1]);

    let nav = Paragraph::new(navigation_text(app.state.mode))
        .block(Block::default().title("Navigation").borders(Borders::ALL));
    frame.render_widget(nav, body[0]);

    let main_block = Block::default()
        .title(app.state.mode.heading())
        .borders(Borders::ALL);
    let main_area = main_block.inner(body[1]);
    frame.render_widget(main_block, body[1]);

    match (&app.registry, &app.load_error) {
        (Some(registry), _) => {
            let payload = render_view(registry, app.state.mode, &app.state.selections);
            render_payload(frame, main_area, &app.state, &payload);
        }
        (None, err) => {
            let msg = err.as_deref().unwrap_or("Workbook not loaded");
            let text = Paragraph::new(format!("Failed to load workbook: {msg}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(text, main_area);
        }
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    frame.render_widget(Paragraph::new(footer_text(app.state.mode)), chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let line1 = format!("  WFU SOCCER - COACH DASHBOARD | {}", app.state.mode.label());
    let line2 = format!("  {}", app.config.report_path.display());
    format!("{line1}\n{line2}")
}

fn navigation_text(mode: ViewMode) -> String {
    ViewMode::ALL
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let prefix = if *m == mode { "> " } else { "  " };
            format!("{prefix}{} {}", idx + 1, m.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::CoachOverview => "1-4/Tab View | j/k Scroll | f Focus panel | e Export | ? Help | q Quit",
        ViewMode::CompareTwoGames => {
            "[/] Game 1 | {/} Game 2 | j/k Metric | Space Toggle | r Reset | e Export | ? Help | q Quit"
        }
        ViewMode::Trends => "1-4/Tab View | [/] Metric | e Export | ? Help | q Quit",
        ViewMode::AllSheets => "1-4/Tab View | [/] Sheet | j/k Scroll | e Export | ? Help | q Quit",
    }
}

fn render_payload(frame: &mut Frame, area: Rect, state: &AppState, payload: &ViewPayload<'_>) {
    match payload {
        ViewPayload::Overview { kpis, notes } => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            let (kpi_scroll, notes_scroll) = match state.overview_focus {
                OverviewFocus::Kpis => (state.scroll, 0),
                OverviewFocus::Notes => (0, state.scroll),
            };
            render_panel(frame, cols[0], kpis, kpi_scroll);
            render_panel(frame, cols[1], notes, notes_scroll);
        }
        ViewPayload::Compare {
            games,
            metric_options,
            comparison,
        } => render_compare(frame, area, state, games, metric_options, comparison),
        ViewPayload::Trend {
            metric_options,
            series,
        } => render_trend(frame, area, metric_options, series),
        ViewPayload::Sheets { sheet_names, table } => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(area);
            let position = sheet_names
                .iter()
                .position(|n| n == table.name())
                .map(|idx| idx + 1)
                .unwrap_or(0);
            let selector = format!(
                "Sheet: {}  ({}/{})  [/] to change",
                table.name(),
                position,
                sheet_names.len()
            );
            frame.render_widget(Paragraph::new(selector), rows[0]);
            render_data_table(frame, rows[1], table, state.scroll, None);
        }
        ViewPayload::Warning { message, .. } => render_warning(frame, area, message),
    }
}

fn render_panel(frame: &mut Frame, area: Rect, panel: &Panel<'_>, scroll: u16) {
    match panel {
        Panel::Table { title, table } => render_data_table(frame, area, table, scroll, Some(*title)),
        Panel::Warning { title, message } => {
            let block = Block::default().title(*title).borders(Borders::ALL);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_warning(frame, inner, message);
        }
    }
}

fn render_warning(frame: &mut Frame, area: Rect, message: &str) {
    let warning = Paragraph::new(format!("! {message}"))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true });
    frame.render_widget(warning, area);
}

fn render_data_table(
    frame: &mut Frame,
    area: Rect,
    table: &sheet::Table,
    scroll: u16,
    title: Option<&str>,
) {
    let widths = column_widths(
        table.columns().iter().map(String::as_str),
        table.rows().iter().map(|row| row.iter().map(|c| c.to_string()).collect()),
    );
    let header = Row::new(table.columns().iter().map(|c| Cell::from(c.clone())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = table
        .rows()
        .iter()
        .skip(scroll as usize)
        .map(|row| Row::new(row.iter().map(|c| Cell::from(c.to_string()))));

    let mut block = Block::default().borders(Borders::ALL);
    if let Some(title) = title {
        block = block.title(format!("{title} ({} rows)", table.row_count()));
    }
    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(widget, area);
}

fn column_widths<'a>(
    headers: impl Iterator<Item = &'a str>,
    rows: impl Iterator<Item = Vec<String>>,
) -> Vec<Constraint> {
    const MIN_WIDTH: usize = 4;
    const MAX_WIDTH: usize = 28;

    let mut widths: Vec<usize> = headers.map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    widths
        .into_iter()
        .map(|w| Constraint::Length(w.clamp(MIN_WIDTH, MAX_WIDTH) as u16))
        .collect()
}

fn render_compare(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    games: &[String],
    metric_options: &[String],
    comparison: &wfu_coach_dashboard::compare::Comparison,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let selectors = format!(
        "Game 1: {}   [/]\nGame 2: {}   {{/}}\n{} games available",
        comparison.game1,
        comparison.game2,
        games.len()
    );
    frame.render_widget(Paragraph::new(selectors), rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(rows[1]);

    let selected: Vec<&str> = comparison.rows.iter().map(|r| r.metric.as_str()).collect();
    let picker = Paragraph::new(metric_picker_text(
        metric_options,
        &selected,
        state.metric_cursor,
        cols[0].height.saturating_sub(2) as usize,
    ))
    .block(Block::default().title("Metrics").borders(Borders::ALL));
    frame.render_widget(picker, cols[0]);

    let body: Vec<Vec<String>> = comparison
        .rows
        .iter()
        .map(|row| {
            vec![
                row.metric.clone(),
                row.game1.to_string(),
                row.game2.to_string(),
                row.difference
                    .map(format_number)
                    .unwrap_or_else(|| "n/a".to_string()),
            ]
        })
        .collect();
    let widths = column_widths(COMPARISON_HEADERS.iter().copied(), body.clone().into_iter());
    let header = Row::new(COMPARISON_HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table_rows = body.into_iter().map(|cells| {
        let diff_style = match cells[3].parse::<f64>() {
            Ok(v) if v > 0.0 => Style::default().fg(Color::Green),
            Ok(v) if v < 0.0 => Style::default().fg(Color::Red),
            _ => Style::default(),
        };
        let mut cells: Vec<Cell> = cells.into_iter().map(Cell::from).collect();
        if let Some(last) = cells.pop() {
            cells.push(last.style(diff_style));
        }
        Row::new(cells)
    });
    let table = Table::new(table_rows, widths)
        .header(header)
        .column_spacing(2)
        .block(Block::default().title("Comparison").borders(Borders::ALL));
    frame.render_widget(table, cols[1]);
}

fn metric_picker_text(options: &[String], selected: &[&str], cursor: usize, visible: usize) -> String {
    if options.is_empty() {
        return "No numeric columns".to_string();
    }
    let (start, end) = visible_range(cursor, options.len(), visible.max(1));
    options[start..end]
        .iter()
        .enumerate()
        .map(|(offset, name)| {
            let idx = start + offset;
            let pointer = if idx == cursor { ">" } else { " " };
            let mark = match selected.iter().position(|s| *s == name.as_str()) {
                Some(order) => format!("[{}]", order + 1),
                None => "[ ]".to_string(),
            };
            format!("{pointer}{mark} {name}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_trend(frame: &mut Frame, area: Rect, metric_options: &[String], series: &TrendSeries) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let selector = format!(
        "Metric: {}  ({} options)  [/] to change",
        series.metric,
        metric_options.len()
    );
    frame.render_widget(Paragraph::new(selector), rows[0]);

    let (Some((first, last)), Some((lo, hi))) = (series.date_bounds(), series.value_bounds())
    else {
        render_warning(frame, rows[1], "No dated rows with values to plot");
        return;
    };

    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .filter_map(|p| {
            let x = (p.date - first).num_seconds() as f64 / 86_400.0;
            p.value.map(|y| (x, y))
        })
        .collect();

    let x_max = ((last - first).num_seconds() as f64 / 86_400.0).max(1.0);
    let pad = ((hi - lo) * 0.1).max(0.5);
    let (y_lo, y_hi) = (lo - pad, hi + pad);

    let datasets = vec![
        Dataset::default()
            .name(series.metric.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&points),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::White))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(series.title.clone())
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Date")
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::raw(format_date(&first)),
                    Span::raw(format_date(&last)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(series.metric.clone())
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::raw(format!("{y_lo:.1}")),
                    Span::raw(format!("{:.1}", (y_lo + y_hi) / 2.0)),
                    Span::raw(format!("{y_hi:.1}")),
                ]),
        );
    frame.render_widget(chart, rows[1]);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "WFU Coach Dashboard - Help",
        "",
        "Global:",
        "  1-4 / Tab    Switch view",
        "  e            Export current view (.xlsx)",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Coach Overview / All Sheets:",
        "  j/k or ↑/↓   Scroll rows",
        "  f            Switch panel (overview)",
        "  [ / ]        Previous/next sheet",
        "",
        "Compare Two Games:",
        "  [ / ]        Game 1",
        "  { / }        Game 2",
        "  j/k, Space   Move cursor, toggle metric",
        "  r            Reset metrics to defaults",
        "",
        "Trends:",
        "  [ / ]        Previous/next metric",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
