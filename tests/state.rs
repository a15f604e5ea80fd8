use wfu_coach_dashboard::state::{AppState, GameSlot, OverviewFocus};
use wfu_coach_dashboard::view::ViewMode;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn cycling_games_starts_from_the_default_slot() {
    let games = names(&["a", "b", "c"]);
    let mut state = AppState::new();

    state.cycle_game(GameSlot::First, &games, true);
    assert_eq!(state.selections.game1.as_deref(), Some("b"));

    state.cycle_game(GameSlot::Second, &games, true);
    assert_eq!(state.selections.game2.as_deref(), Some("c"));

    state.cycle_game(GameSlot::Second, &games, true);
    assert_eq!(state.selections.game2.as_deref(), Some("a"));

    state.cycle_game(GameSlot::Second, &games, false);
    assert_eq!(state.selections.game2.as_deref(), Some("c"));
}

#[test]
fn cycling_over_no_games_is_a_no_op() {
    let mut state = AppState::new();
    state.cycle_game(GameSlot::First, &[], true);
    assert_eq!(state.selections.game1, None);
}

#[test]
fn toggling_metrics_starts_from_the_defaults() {
    let options = names(&["Goals", "Shots", "xG", "Corners"]);
    let defaults = names(&["Goals", "Shots", "xG"]);
    let mut state = AppState::new();

    state.move_metric_cursor(options.len(), false);
    assert_eq!(state.metric_cursor, 3);
    state.toggle_metric(&options, &defaults);
    assert_eq!(
        state.selections.metrics,
        Some(names(&["Goals", "Shots", "xG", "Corners"]))
    );

    state.move_metric_cursor(options.len(), true);
    state.toggle_metric(&options, &defaults);
    assert_eq!(
        state.selections.metrics,
        Some(names(&["Shots", "xG", "Corners"]))
    );

    state.reset_metrics();
    assert_eq!(state.selections.metrics, None);
}

#[test]
fn trend_metric_and_sheet_cycle_with_wraparound() {
    let metrics = names(&["Goals", "Shots"]);
    let sheets = names(&["Match Summary (Analyst Data)", "Targets & Notes"]);
    let mut state = AppState::new();

    state.cycle_trend_metric(&metrics, true);
    assert_eq!(state.selections.trend_metric.as_deref(), Some("Shots"));
    state.cycle_trend_metric(&metrics, true);
    assert_eq!(state.selections.trend_metric.as_deref(), Some("Goals"));

    state.scroll = 4;
    state.cycle_sheet(&sheets, false);
    assert_eq!(state.selections.sheet.as_deref(), Some("Targets & Notes"));
    assert_eq!(state.scroll, 0);
}

#[test]
fn mode_changes_reset_scroll() {
    let mut state = AppState::new();
    assert_eq!(state.mode, ViewMode::CoachOverview);

    state.scroll_down(3);
    state.scroll_down(3);
    assert_eq!(state.scroll, 2);

    state.cycle_mode();
    assert_eq!(state.mode, ViewMode::CompareTwoGames);
    assert_eq!(state.scroll, 0);

    state.scroll_up();
    assert_eq!(state.scroll, 0);

    state.toggle_overview_focus();
    assert_eq!(state.overview_focus, OverviewFocus::Notes);
}

#[test]
fn log_is_bounded() {
    let mut state = AppState::new();
    for idx in 0..250 {
        state.push_log(format!("line {idx}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
}

#[test]
fn repeated_labels_do_not_trap_the_game_selector() {
    let games = names(&["A", "A", "B"]);
    let mut state = AppState::new();
    state.selections.game1 = Some("A".to_string());

    let mut seen = Vec::new();
    for _ in 0..4 {
        state.cycle_game(GameSlot::First, &games, true);
        seen.extend(state.selections.game1.clone());
    }
    assert_eq!(seen, names(&["B", "A", "B", "A"]));

    state.cycle_game(GameSlot::First, &games, false);
    assert_eq!(state.selections.game1.as_deref(), Some("B"));
}
