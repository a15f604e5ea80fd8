use wfu_coach_dashboard::registry::TableRegistry;
use wfu_coach_dashboard::sample;
use wfu_coach_dashboard::table::CellValue;
use wfu_coach_dashboard::view::{Panel, Selections, ViewMode, ViewPayload, render_view};

#[test]
fn overview_shows_both_sheets_untouched() {
    let registry = sample::sample_registry();

    let payload = render_view(&registry, ViewMode::CoachOverview, &Selections::default());
    let ViewPayload::Overview { kpis, notes } = payload else {
        panic!("expected overview, got {payload:?}");
    };
    assert_eq!(kpis.title(), "Season KPIs");
    assert_eq!(notes.title(), "Targets & Notes");
    assert_eq!(
        notes,
        Panel::Table {
            title: "Targets & Notes",
            table: &sample::sample_targets_notes(),
        }
    );
}

#[test]
fn missing_coach_view_degrades_to_a_warning_panel() {
    let registry = TableRegistry::new(vec![
        sample::sample_match_summary(),
        sample::sample_targets_notes(),
    ]);

    let payload = render_view(&registry, ViewMode::CoachOverview, &Selections::default());
    assert!(!payload.is_warning());
    let ViewPayload::Overview { kpis, notes } = payload else {
        panic!("expected overview, got {payload:?}");
    };
    assert_eq!(
        kpis,
        Panel::Warning {
            title: "Season KPIs",
            message: "Dashboard (Coach View) sheet not found".to_string(),
        }
    );
    assert!(matches!(notes, Panel::Table { .. }));
}

#[test]
fn compare_without_match_summary_is_a_warning() {
    let registry = TableRegistry::new(vec![sample::sample_coach_view()]);

    for mode in [ViewMode::CompareTwoGames, ViewMode::Trends] {
        let payload = render_view(&registry, mode, &Selections::default());
        assert_eq!(
            payload,
            ViewPayload::Warning {
                mode,
                message: "Match Summary sheet not found".to_string(),
            }
        );
    }
}

#[test]
fn compare_view_lists_games_and_metric_options() {
    let registry = sample::sample_registry();
    let selections = Selections {
        game1: Some("2024-10-11 vs Pitt (W)".to_string()),
        game2: Some("2024-08-22 vs Duke (H)".to_string()),
        ..Selections::default()
    };

    // Venue is not part of the label, so the second game does not exist.
    let payload = render_view(&registry, ViewMode::CompareTwoGames, &selections);
    assert_eq!(
        payload,
        ViewPayload::Warning {
            mode: ViewMode::CompareTwoGames,
            message: "Game not found: 2024-08-22 vs Duke (H)".to_string(),
        }
    );

    let selections = Selections {
        game2: Some("2024-08-22 vs Duke (W)".to_string()),
        ..selections
    };
    let payload = render_view(&registry, ViewMode::CompareTwoGames, &selections);
    let ViewPayload::Compare {
        games,
        metric_options,
        comparison,
    } = payload
    else {
        panic!("expected comparison, got {payload:?}");
    };
    assert_eq!(games.len(), 8);
    assert_eq!(metric_options.len(), 8);
    assert_eq!(comparison.game1, "2024-10-11 vs Pitt (W)");
    assert_eq!(comparison.rows[0].difference, Some(-1.0));
}

#[test]
fn trend_view_defaults_to_the_first_numeric_column() {
    let registry = sample::sample_registry();

    let payload = render_view(&registry, ViewMode::Trends, &Selections::default());
    let ViewPayload::Trend { series, .. } = payload else {
        panic!("expected trend, got {payload:?}");
    };
    assert_eq!(series.metric, "Goals");
    assert_eq!(series.points.len(), 7);
}

#[test]
fn sheets_view_picks_first_sheet_by_default() {
    let registry = sample::sample_registry();

    let payload = render_view(&registry, ViewMode::AllSheets, &Selections::default());
    let ViewPayload::Sheets { sheet_names, table } = payload else {
        panic!("expected sheets, got {payload:?}");
    };
    assert_eq!(sheet_names.len(), 3);
    assert_eq!(table.name(), "Match Summary (Analyst Data)");

    let selections = Selections {
        sheet: Some("Targets & Notes".to_string()),
        ..Selections::default()
    };
    let payload = render_view(&registry, ViewMode::AllSheets, &selections);
    assert!(matches!(
        payload,
        ViewPayload::Sheets { table, .. } if table.name() == "Targets & Notes"
    ));
}

#[test]
fn unknown_sheet_is_a_warning() {
    let registry = sample::sample_registry();
    let selections = Selections {
        sheet: Some("Scouting".to_string()),
        ..Selections::default()
    };

    let payload = render_view(&registry, ViewMode::AllSheets, &selections);
    assert_eq!(
        payload,
        ViewPayload::Warning {
            mode: ViewMode::AllSheets,
            message: "Sheet not found: Scouting".to_string(),
        }
    );
}

#[test]
fn empty_registry_still_renders_every_view() {
    let registry = TableRegistry::default();

    for mode in ViewMode::ALL {
        let payload = render_view(&registry, mode, &Selections::default());
        match mode {
            ViewMode::CoachOverview => assert!(!payload.is_warning()),
            _ => assert!(payload.is_warning(), "{mode:?} should warn"),
        }
    }
}

#[test]
fn payload_serializes_with_view_tag() {
    let registry = sample::sample_registry();

    let payload = render_view(&registry, ViewMode::CompareTwoGames, &Selections::default());
    let json = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(json["view"], "compare");
    assert_eq!(json["comparison"]["rows"][0]["metric"], "Goals");
    assert_eq!(json["comparison"]["rows"][0]["difference"], -2.0);

    let payload = render_view(&registry, ViewMode::CoachOverview, &Selections::default());
    let json = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(json["kpis"]["kind"], "table");
}

#[test]
fn view_modes_cycle_and_parse() {
    assert_eq!(ViewMode::default(), ViewMode::CoachOverview);
    assert_eq!(ViewMode::AllSheets.next(), ViewMode::CoachOverview);
    for mode in ViewMode::ALL {
        assert_eq!(ViewMode::from_slug(mode.slug()), Some(mode));
    }
    assert_eq!(ViewMode::from_slug("scouting"), None);
}

#[test]
fn metric_options_leave_out_the_date_column() {
    let table = wfu_coach_dashboard::table::Table::new(
        "Match Summary (Analyst Data)",
        ["Date", "Opponent", "Result", "Goals"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![
            vec![
                CellValue::Number(45536.0),
                CellValue::Text("Duke".to_string()),
                CellValue::Text("W".to_string()),
                CellValue::Number(3.0),
            ],
            vec![
                CellValue::Number(45543.0),
                CellValue::Text("UNC".to_string()),
                CellValue::Text("L".to_string()),
                CellValue::Number(1.0),
            ],
        ],
    );
    let registry = TableRegistry::new(vec![table]);

    for mode in [ViewMode::CompareTwoGames, ViewMode::Trends] {
        let payload = render_view(&registry, mode, &Selections::default());
        let options = match payload {
            ViewPayload::Compare { metric_options, .. } => metric_options,
            ViewPayload::Trend { metric_options, .. } => metric_options,
            other => panic!("unexpected payload {other:?}"),
        };
        assert_eq!(options, vec!["Goals"]);
    }
}
