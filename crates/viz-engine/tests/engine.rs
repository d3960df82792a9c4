//! End-to-end tests for grouping, counting, and selection resolution.

use chrono::NaiveDate;
use std::sync::Arc;
use viz_engine::{count_chart, resolve_selection};
use viz_engine::GroupByRegistry;
use viz_model::{
    ChartRole, ChartSettings, DimensionBinding, Event, GroupByKind, GroupByOption, GroupByParams,
    RawValue, SelectionItem, Subject, TimestampType,
};

#[derive(Clone)]
struct Reading {
    measurement: String,
    value: Option<f64>,
    sample_date: Option<NaiveDate>,
}

fn subject_code(event: &Event<Reading>) -> RawValue {
    RawValue::Str(event.subject().subject_code.clone())
}
fn measurement(event: &Event<Reading>) -> RawValue {
    RawValue::Str(event.record().measurement.clone())
}
fn value(event: &Event<Reading>) -> RawValue {
    RawValue::from_opt_float(event.record().value)
}
fn sample_date(event: &Event<Reading>) -> RawValue {
    RawValue::from_opt_date(event.record().sample_date)
}

fn registry() -> GroupByRegistry<Reading> {
    GroupByRegistry::new("readings")
        .register(GroupByOption::new(
            "SUBJECT",
            GroupByKind::Categorical,
            subject_code,
        ))
        .register(GroupByOption::new(
            "MEASUREMENT",
            GroupByKind::Categorical,
            measurement,
        ))
        .register(GroupByOption::new("VALUE", GroupByKind::Numeric, value))
        .register(GroupByOption::new(
            "SAMPLE_DATE",
            GroupByKind::Temporal,
            sample_date,
        ))
}

fn first_dose() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn subject(id: &str) -> Arc<Subject> {
    Arc::new(Subject::new(id, id, "STUDY01").with_first_treatment_date(first_dose()))
}

fn reading(
    id: &str,
    subject: &Arc<Subject>,
    measurement: &str,
    value: Option<f64>,
    day_offset: Option<i64>,
) -> Event<Reading> {
    Event::new(
        id,
        Arc::clone(subject),
        Reading {
            measurement: measurement.to_string(),
            value,
            sample_date: day_offset.map(|d| first_dose() + chrono::Duration::days(d)),
        },
    )
}

#[test]
fn days_since_first_dose_binning_buckets_of_five() {
    let s1 = subject("S1");
    let events = vec![
        reading("e1", &s1, "ALT", Some(1.0), Some(31)),
        reading("e2", &s1, "ALT", Some(1.0), Some(60)),
        reading("e3", &s1, "ALT", Some(1.0), Some(91)),
    ];
    let refs: Vec<&Event<Reading>> = events.iter().collect();

    let settings = ChartSettings::builder()
        .with(
            ChartRole::XAxis,
            DimensionBinding::new("SAMPLE_DATE").with_params(
                GroupByParams::new()
                    .with_bin_size(5.0)
                    .with_timestamp_type(TimestampType::DaysSinceFirstDose),
            ),
        )
        .build();

    let series = count_chart(&refs, &settings, &registry()).expect("count chart");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].name, "All");
    let entries: Vec<(&str, usize)> = series[0]
        .entries
        .iter()
        .map(|e| (e.category.as_str(), e.count))
        .collect();
    assert_eq!(
        entries,
        vec![("30 - 34", 1), ("60 - 64", 1), ("90 - 94", 1)]
    );
}

#[test]
fn bin_size_one_yields_singleton_categories() {
    let s1 = subject("S1");
    let events: Vec<Event<Reading>> = (31..=91)
        .map(|v| reading(&format!("e{v}"), &s1, "ALT", Some(v as f64), None))
        .collect();
    let refs: Vec<&Event<Reading>> = events.iter().collect();

    let settings = ChartSettings::builder()
        .with(
            ChartRole::XAxis,
            DimensionBinding::new("VALUE").with_params(GroupByParams::new().with_bin_size(1.0)),
        )
        .build();

    let series = count_chart(&refs, &settings, &registry()).expect("count chart");
    assert_eq!(series[0].entries.len(), 61);
    assert!(series[0].entries.iter().all(|e| e.count == 1));
    assert_eq!(series[0].entries.first().unwrap().category, "31");
    assert_eq!(series[0].entries.last().unwrap().category, "91");
}

#[test]
fn selecting_two_subjects_returns_their_events_with_full_totals() {
    let subjects: Vec<Arc<Subject>> = ["S1", "S2", "S3", "S4"].iter().map(|s| subject(s)).collect();
    // 9 events across 4 subjects; S1 and S2 own 5 of them.
    let events = vec![
        reading("e1", &subjects[0], "ALT", Some(1.0), Some(1)),
        reading("e2", &subjects[0], "ALT", Some(2.0), Some(2)),
        reading("e3", &subjects[1], "ALT", Some(3.0), Some(3)),
        reading("e4", &subjects[1], "AST", Some(4.0), Some(4)),
        reading("e5", &subjects[1], "AST", Some(5.0), Some(5)),
        reading("e6", &subjects[2], "ALT", Some(6.0), Some(6)),
        reading("e7", &subjects[2], "AST", Some(7.0), Some(7)),
        reading("e8", &subjects[3], "ALT", Some(8.0), Some(8)),
        reading("e9", &subjects[3], "AST", Some(9.0), Some(9)),
    ];
    let refs: Vec<&Event<Reading>> = events.iter().collect();

    let settings = ChartSettings::builder()
        .with_option(ChartRole::XAxis, "SUBJECT")
        .build();
    let items = vec![
        SelectionItem::x_category("S1"),
        SelectionItem::x_category("S2"),
    ];

    let detail = resolve_selection(&refs, &settings, &registry(), &items).expect("resolve");
    assert_eq!(
        detail.event_ids.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["e1", "e2", "e3", "e4", "e5"]
    );
    assert_eq!(
        detail.subject_ids.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["S1", "S2"]
    );
    assert_eq!(detail.total_events, 9);
    assert_eq!(detail.total_subjects, 4);
}

#[test]
fn range_selection_matches_bucket_ranks() {
    let s1 = subject("S1");
    let events = vec![
        reading("e1", &s1, "ALT", Some(31.0), None),
        reading("e2", &s1, "ALT", Some(60.0), None),
        reading("e3", &s1, "ALT", Some(91.0), None),
    ];
    let refs: Vec<&Event<Reading>> = events.iter().collect();

    let settings = ChartSettings::builder()
        .with(
            ChartRole::XAxis,
            DimensionBinding::new("VALUE").with_params(GroupByParams::new().with_bin_size(5.0)),
        )
        .build();

    let detail = resolve_selection(
        &refs,
        &settings,
        &registry(),
        &[SelectionItem::x_range(30.0, 64.0)],
    )
    .expect("resolve");
    assert_eq!(detail.event_count(), 2);
    assert!(detail.event_ids.contains("e1"));
    assert!(detail.event_ids.contains("e2"));
}

#[test]
fn stale_coordinate_resolves_empty_with_totals() {
    let s1 = subject("S1");
    let events = vec![reading("e1", &s1, "ALT", Some(1.0), Some(1))];
    let refs: Vec<&Event<Reading>> = events.iter().collect();

    let settings = ChartSettings::builder()
        .with_option(ChartRole::XAxis, "MEASUREMENT")
        .build();

    let detail = resolve_selection(
        &refs,
        &settings,
        &registry(),
        &[SelectionItem::x_category("NO_SUCH_CATEGORY")],
    )
    .expect("resolve");
    assert!(detail.event_ids.is_empty());
    assert!(detail.subject_ids.is_empty());
    assert_eq!(detail.total_events, 1);
    assert_eq!(detail.total_subjects, 1);
}

#[test]
fn null_temporal_axis_excludes_from_series_but_not_totals() {
    let s1 = subject("S1");
    let events = vec![
        reading("e1", &s1, "ALT", Some(1.0), Some(10)),
        // No sample date: drops out of the binned series.
        reading("e2", &s1, "ALT", Some(2.0), None),
    ];
    let refs: Vec<&Event<Reading>> = events.iter().collect();

    let settings = ChartSettings::builder()
        .with(
            ChartRole::XAxis,
            DimensionBinding::new("SAMPLE_DATE").with_params(
                GroupByParams::new()
                    .with_bin_size(5.0)
                    .with_timestamp_type(TimestampType::DaysSinceFirstDose),
            ),
        )
        .build();

    let series = count_chart(&refs, &settings, &registry()).expect("count chart");
    let total: usize = series[0].entries.iter().map(|e| e.count).sum();
    assert_eq!(total, 1);

    let detail = resolve_selection(
        &refs,
        &settings,
        &registry(),
        &[SelectionItem::x_category("10 - 14")],
    )
    .expect("resolve");
    assert_eq!(detail.event_count(), 1);
    assert_eq!(detail.total_events, 2, "totals still count the dateless event");
}

#[test]
fn color_by_splits_series_and_aligns_categories() {
    let s1 = subject("S1");
    let s2 = subject("S2");
    let events = vec![
        reading("e1", &s1, "ALT", Some(1.0), None),
        reading("e2", &s1, "AST", Some(2.0), None),
        reading("e3", &s2, "ALT", Some(3.0), None),
    ];
    let refs: Vec<&Event<Reading>> = events.iter().collect();

    let settings = ChartSettings::builder()
        .with_option(ChartRole::XAxis, "SUBJECT")
        .with_option(ChartRole::ColorBy, "MEASUREMENT")
        .build();

    let series = count_chart(&refs, &settings, &registry()).expect("count chart");
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].name, "ALT");
    assert_eq!(series[1].name, "AST");
    // Both series carry entries for both subjects, zero-filled where empty.
    for s in &series {
        assert_eq!(s.entries.len(), 2);
    }
    let ast_s2 = &series[1].entries[1];
    assert_eq!(ast_s2.category, "S2");
    assert_eq!(ast_s2.count, 0);
}
