use std::collections::VecDeque;

use crate::view::{Selections, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSlot {
    First,
    Second,
}

impl GameSlot {
    fn default_index(self) -> usize {
        match self {
            GameSlot::First => 0,
            GameSlot::Second => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewFocus {
    Kpis,
    Notes,
}

/// Interactive state of the terminal front end.
///
/// Only user choices live here. Tables and everything derived from them are
/// recomputed from the registry on each draw.
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: ViewMode,
    pub selections: Selections,
    pub metric_cursor: usize,
    pub overview_focus: OverviewFocus,
    pub scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: ViewMode::default(),
            selections: Selections::default(),
            metric_cursor: 0,
            overview_focus: OverviewFocus::Kpis,
            scroll: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.scroll = 0;
        }
    }

    pub fn cycle_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    pub fn toggle_overview_focus(&mut self) {
        self.overview_focus = match self.overview_focus {
            OverviewFocus::Kpis => OverviewFocus::Notes,
            OverviewFocus::Notes => OverviewFocus::Kpis,
        };
        self.scroll = 0;
    }

    /// Move a game selector through the distinct labels of `games`. Repeated
    /// labels all resolve to their first row, so each is visited once.
    pub fn cycle_game(&mut self, slot: GameSlot, games: &[String], forward: bool) {
        let mut distinct: Vec<&str> = Vec::with_capacity(games.len());
        for game in games {
            if !distinct.contains(&game.as_str()) {
                distinct.push(game);
            }
        }
        let Some(fallback) = games.get(slot.default_index().min(games.len().saturating_sub(1)))
        else {
            return;
        };
        let current = match slot {
            GameSlot::First => self.selections.game1.as_deref(),
            GameSlot::Second => self.selections.game2.as_deref(),
        }
        .unwrap_or(fallback);
        let idx = distinct.iter().position(|g| *g == current).unwrap_or(0);
        let next = step(idx, distinct.len(), forward);
        let label = Some(distinct[next].to_string());
        match slot {
            GameSlot::First => self.selections.game1 = label,
            GameSlot::Second => self.selections.game2 = label,
        }
    }

    pub fn move_metric_cursor(&mut self, options: usize, forward: bool) {
        if options == 0 {
            self.metric_cursor = 0;
            return;
        }
        self.metric_cursor = step(self.metric_cursor.min(options - 1), options, forward);
    }

    /// Toggle the metric under the cursor. `current` is the list currently in
    /// effect (the defaults until the user picks something); newly selected
    /// metrics are appended so the output follows the selection order.
    pub fn toggle_metric(&mut self, options: &[String], current: &[String]) {
        let Some(metric) = options.get(self.metric_cursor) else {
            return;
        };
        let mut selected = self
            .selections
            .metrics
            .clone()
            .unwrap_or_else(|| current.to_vec());
        if let Some(pos) = selected.iter().position(|m| m == metric) {
            selected.remove(pos);
        } else {
            selected.push(metric.clone());
        }
        self.selections.metrics = Some(selected);
    }

    pub fn reset_metrics(&mut self) {
        self.selections.metrics = None;
    }

    pub fn cycle_trend_metric(&mut self, options: &[String], forward: bool) {
        self.selections.trend_metric = cycle_named(options, self.selections.trend_metric.as_deref(), forward);
    }

    pub fn cycle_sheet(&mut self, names: &[String], forward: bool) {
        self.selections.sheet = cycle_named(names, self.selections.sheet.as_deref(), forward);
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self, max_scroll: u16) {
        self.scroll = self.scroll.saturating_add(1).min(max_scroll);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

fn step(idx: usize, len: usize, forward: bool) -> usize {
    if forward {
        (idx + 1) % len
    } else if idx == 0 {
        len - 1
    } else {
        idx - 1
    }
}

/// Next name after `current`; an unset selection counts as the first entry.
fn cycle_named(options: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let idx = current
        .and_then(|name| options.iter().position(|o| o == name))
        .unwrap_or(0);
    Some(options[step(idx, options.len(), forward)].clone())
}
