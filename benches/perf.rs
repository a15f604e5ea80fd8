use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use wfu_coach_dashboard::compare::{compare_games, game_labels};
use wfu_coach_dashboard::sample::{day, sample_match_summary};
use wfu_coach_dashboard::table::{CellValue, Table};
use wfu_coach_dashboard::trend::trend_series;
use wfu_coach_dashboard::view::{Selections, ViewMode, render_view};

fn season_table(games: usize) -> Table {
    let base = sample_match_summary();
    let columns = base.columns().to_vec();
    let start = day(2020, 1, 1).expect("valid day");
    let rows = (0..games)
        .map(|idx| {
            let mut row = base.rows()[idx % base.row_count()].clone();
            row[0] = CellValue::Date(start + chrono::Duration::days(idx as i64 * 3));
            row
        })
        .collect();
    Table::new("Match Summary (Analyst Data)", columns, rows)
}

fn bench_game_labels(c: &mut Criterion) {
    let table = season_table(500);
    c.bench_function("game_labels_500", |b| {
        b.iter(|| {
            let labels = game_labels(black_box(&table)).unwrap();
            black_box(labels.len());
        })
    });
}

fn bench_compare(c: &mut Criterion) {
    let table = season_table(500);
    let labels = game_labels(&table).unwrap();
    let (first, last) = (labels[0].clone(), labels[labels.len() - 1].clone());
    c.bench_function("compare_games_500", |b| {
        b.iter(|| {
            let cmp = compare_games(
                black_box(&table),
                Some(first.as_str()),
                Some(last.as_str()),
                None,
            )
            .unwrap();
            black_box(cmp.rows.len());
        })
    });
}

fn bench_trend(c: &mut Criterion) {
    let table = season_table(500);
    c.bench_function("trend_series_500", |b| {
        b.iter(|| {
            let series = trend_series(black_box(&table), Some("xG")).unwrap();
            black_box(series.points.len());
        })
    });
}

fn bench_render_views(c: &mut Criterion) {
    let registry = wfu_coach_dashboard::sample::sample_registry();
    let selections = Selections::default();
    c.bench_function("render_all_views", |b| {
        b.iter(|| {
            for mode in ViewMode::ALL {
                let payload = render_view(black_box(&registry), mode, &selections);
                black_box(payload.is_warning());
            }
        })
    });
}

criterion_group!(
    benches,
    bench_game_labels,
    bench_compare,
    bench_trend,
    bench_render_views
);
criterion_main!(benches);
