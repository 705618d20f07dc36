use chrono::{NaiveDate, Weekday};
use task_planner::{
    GraphContext, InputError, Planner, TaskRecord, WorkCalendar, WorkCalendarConfig, project_timeline,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn find_next_available_skips_weekends_and_holidays() {
    let config = WorkCalendarConfig::new(
        [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        [d(2025, 1, 7)],
        8.0,
    );
    let cal = WorkCalendar::from_config(&config).unwrap();

    // Fri 2025-01-03 + 2 working days, Tuesday is a holiday
    assert_eq!(cal.find_next_available(d(2025, 1, 3), 2), Some(d(2025, 1, 8)));
    assert!(!cal.is_available(d(2025, 1, 4)));
}

#[test]
fn config_json_round_trip_keeps_weekday_order() {
    let json = r#"{"working_days": ["Thu", "Mon"], "holidays": ["2025-02-03"], "hours_per_day": 7.5}"#;
    let config: WorkCalendarConfig = serde_json::from_str(json).unwrap();
    let cal = WorkCalendar::from_config(&config).unwrap();

    let normalized = cal.to_config();
    assert_eq!(normalized.working_days(), &[Weekday::Mon, Weekday::Thu]);
    assert_eq!(normalized.holidays(), &[d(2025, 2, 3)]);
    assert_eq!(cal.hours_per_day(), 7.5);
}

#[test]
fn zero_hours_per_day_is_rejected() {
    let config = WorkCalendarConfig::new([Weekday::Mon], Vec::<NaiveDate>::new(), 0.0);
    assert!(WorkCalendar::from_config(&config).is_err());
}

#[test]
fn timeline_places_cpm_offsets_on_working_days() {
    let context = GraphContext::new(vec![
        TaskRecord::new(1, "design").with_hours(16.0),
        TaskRecord::new(2, "build").depending_on([1]).with_hours(12.0),
        TaskRecord::new(3, "note").with_hours(0.0),
    ])
    .unwrap();
    let run = Planner::new(&context).run().unwrap();

    // Thursday start, default Mon-Fri with 8h days
    let timeline = project_timeline(&run.cpm, d(2025, 1, 2), &WorkCalendar::default()).unwrap();
    let by_id = |id: u64| timeline.iter().find(|t| t.id == id).unwrap();

    let design = by_id(1);
    assert_eq!((design.start_date, design.finish_date), (d(2025, 1, 2), d(2025, 1, 3)));
    assert!(design.is_critical);

    let build = by_id(2);
    assert_eq!((build.start_date, build.finish_date), (d(2025, 1, 6), d(2025, 1, 7)));

    let note = by_id(3);
    assert_eq!((note.start_date, note.finish_date), (d(2025, 1, 2), d(2025, 1, 2)));
    assert!(!note.is_critical);
}

#[test]
fn huge_estimate_fails_instead_of_overflowing_the_calendar() {
    let context = GraphContext::new(vec![
        TaskRecord::new(1, "forever").with_hours(1.0e9),
        TaskRecord::new(2, "after").depending_on([1]).with_hours(8.0),
    ])
    .unwrap();
    let run = Planner::new(&context).run().unwrap();

    let err = project_timeline(&run.cpm, d(2025, 1, 6), &WorkCalendar::default()).unwrap_err();
    let InputError::CalendarOverflow { start, .. } = err else {
        panic!("expected calendar overflow, got {err:?}");
    };
    assert_eq!(start, d(2025, 1, 6));
}
