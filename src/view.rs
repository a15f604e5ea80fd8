use serde::Serialize;
use tracing::warn;

use crate::compare::{self, Comparison};
use crate::error::{DashboardError, Result};
use crate::registry::{SheetRole, TableRegistry};
use crate::table::Table;
use crate::trend::{self, TrendSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewMode {
    #[default]
    CoachOverview,
    CompareTwoGames,
    Trends,
    AllSheets,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::CoachOverview,
        ViewMode::CompareTwoGames,
        ViewMode::Trends,
        ViewMode::AllSheets,
    ];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::CoachOverview => "Coach Overview",
            ViewMode::CompareTwoGames => "Compare Two Games",
            ViewMode::Trends => "Trends",
            ViewMode::AllSheets => "All Sheets",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            ViewMode::CoachOverview => "Coach Overview",
            ViewMode::CompareTwoGames => "Compare Two Games",
            ViewMode::Trends => "Trends Over Time",
            ViewMode::AllSheets => "All Sheets (Raw Data)",
        }
    }

    /// Short name used for file names and command-line flags.
    pub fn slug(self) -> &'static str {
        match self {
            ViewMode::CoachOverview => "overview",
            ViewMode::CompareTwoGames => "compare",
            ViewMode::Trends => "trends",
            ViewMode::AllSheets => "sheets",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.slug().eq_ignore_ascii_case(raw) || mode.label().eq_ignore_ascii_case(raw))
    }

    pub fn next(self) -> Self {
        match self {
            ViewMode::CoachOverview => ViewMode::CompareTwoGames,
            ViewMode::CompareTwoGames => ViewMode::Trends,
            ViewMode::Trends => ViewMode::AllSheets,
            ViewMode::AllSheets => ViewMode::CoachOverview,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

/// Current user choices. `None` means "use the view's default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selections {
    pub game1: Option<String>,
    pub game2: Option<String>,
    pub metrics: Option<Vec<String>>,
    pub trend_metric: Option<String>,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel<'a> {
    Table { title: &'static str, table: &'a Table },
    Warning { title: &'static str, message: String },
}

impl<'a> Panel<'a> {
    fn for_role(registry: &'a TableRegistry, role: SheetRole, title: &'static str) -> Self {
        match registry.by_role(role) {
            Some(table) => Panel::Table { title, table },
            None => Panel::Warning {
                title,
                message: role.missing_warning(),
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Table { title, .. } | Panel::Warning { title, .. } => *title,
        }
    }
}

/// Everything a front end needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewPayload<'a> {
    Overview {
        kpis: Panel<'a>,
        notes: Panel<'a>,
    },
    Compare {
        games: Vec<String>,
        metric_options: Vec<String>,
        comparison: Comparison,
    },
    Trend {
        metric_options: Vec<String>,
        series: TrendSeries,
    },
    Sheets {
        sheet_names: Vec<String>,
        table: &'a Table,
    },
    Warning {
        mode: ViewMode,
        message: String,
    },
}

impl ViewPayload<'_> {
    pub fn is_warning(&self) -> bool {
        matches!(self, ViewPayload::Warning { .. })
    }
}

/// Dispatch to the handler for `mode`. Per-view failures come back as a
/// [`ViewPayload::Warning`] instead of an error.
pub fn render_view<'a>(
    registry: &'a TableRegistry,
    mode: ViewMode,
    selections: &Selections,
) -> ViewPayload<'a> {
    let result = match mode {
        ViewMode::CoachOverview => Ok(overview_view(registry)),
        ViewMode::CompareTwoGames => compare_view(registry, selections),
        ViewMode::Trends => trend_view(registry, selections),
        ViewMode::AllSheets => sheets_view(registry, selections),
    };
    match result {
        Ok(payload) => payload,
        Err(err) => {
            warn!(view = mode.slug(), error = %err, "view rendered as warning");
            ViewPayload::Warning {
                mode,
                message: err.to_string(),
            }
        }
    }
}

pub fn overview_view(registry: &TableRegistry) -> ViewPayload<'_> {
    ViewPayload::Overview {
        kpis: Panel::for_role(registry, SheetRole::CoachView, "Season KPIs"),
        notes: Panel::for_role(registry, SheetRole::TargetsNotes, "Targets & Notes"),
    }
}

pub fn compare_view<'a>(
    registry: &'a TableRegistry,
    selections: &Selections,
) -> Result<ViewPayload<'a>> {
    let table = match_summary(registry)?;
    let games = compare::game_labels(table)?;
    let comparison = compare::compare_games(
        table,
        selections.game1.as_deref(),
        selections.game2.as_deref(),
        selections.metrics.as_deref(),
    )?;
    Ok(ViewPayload::Compare {
        games,
        metric_options: owned(compare::metric_columns(table)),
        comparison,
    })
}

pub fn trend_view<'a>(
    registry: &'a TableRegistry,
    selections: &Selections,
) -> Result<ViewPayload<'a>> {
    let table = match_summary(registry)?;
    let series = trend::trend_series(table, selections.trend_metric.as_deref())?;
    Ok(ViewPayload::Trend {
        metric_options: owned(compare::metric_columns(table)),
        series,
    })
}

pub fn sheets_view<'a>(
    registry: &'a TableRegistry,
    selections: &Selections,
) -> Result<ViewPayload<'a>> {
    let sheet_names = owned(registry.sheet_names());
    let table = match selections.sheet.as_deref() {
        Some(name) => registry.by_name(name)?,
        None => registry
            .tables()
            .first()
            .ok_or_else(|| DashboardError::NotFound {
                name: "(workbook has no sheets)".to_string(),
            })?,
    };
    Ok(ViewPayload::Sheets { sheet_names, table })
}

fn match_summary(registry: &TableRegistry) -> Result<&Table> {
    registry
        .by_role(SheetRole::MatchSummary)
        .ok_or_else(|| DashboardError::Schema(SheetRole::MatchSummary.missing_warning()))
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}
