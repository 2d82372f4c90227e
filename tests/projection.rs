#![forbid(unsafe_code)]
use chrono::NaiveDate;
use permanence::{
    project_schedule, Availability, AvailabilityId, ClockTime, Dataset, DayOfWeek, FixedClock,
    Machine, MachineId, ProjectOptions, ProjectionError, ScheduleProjector, ScheduleSource,
    ScheduleTarget, Specialty, SpecialtyId, SpecialtyName, Worker, WorkerId,
};

fn t(raw: &str) -> ClockTime {
    raw.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekly(id: u32, worker: u32, day: DayOfWeek, start: &str, end: &str) -> Availability {
    Availability::weekly(AvailabilityId(id), WorkerId(worker), day, t(start), t(end))
}

/// Ada (1) lundi 09:00–13:00 sur l'imprimante 3D.
fn monday_dataset() -> Dataset {
    Dataset {
        workers: vec![Worker::new(WorkerId(1), "Ada", "Lovelace")],
        machines: vec![Machine {
            id: MachineId(1),
            name: "3D Printer".into(),
        }],
        specialties: vec![Specialty {
            id: SpecialtyId(1),
            worker_id: WorkerId(1),
            machine_id: MachineId(1),
        }],
        availability: vec![weekly(1, 1, DayOfWeek::MONDAY, "09:00", "13:00")],
    }
}

#[test]
fn monday_scenario() {
    let data = monday_dataset();
    let specialties: Vec<SpecialtyName> = data.specialty_names().collect();
    let entries = project_schedule(
        ScheduleTarget::Day(DayOfWeek::new(2).unwrap()),
        &data.workers,
        &data.availability,
        &specialties,
        ProjectOptions::default(),
    );

    assert_eq!(entries.len(), 1);
    let e = &entries[0];
    assert_eq!(e.worker_id, WorkerId(1));
    assert_eq!(e.first_name, "Ada");
    assert_eq!(e.specialties, "3D Printer");
    assert_eq!(e.start_time_display, "9:00 AM");
    assert_eq!(e.end_time_display, "1:00 PM");
    assert_eq!(e.day_of_week, DayOfWeek::MONDAY);
}

#[test]
fn day_filter_returns_exactly_that_days_rows() {
    let workers = vec![
        Worker::new(WorkerId(1), "Ada", "Lovelace"),
        Worker::new(WorkerId(2), "Grace", "Hopper"),
    ];
    let rows = vec![
        weekly(1, 1, DayOfWeek::MONDAY, "09:00", "12:00"),
        weekly(2, 2, DayOfWeek::MONDAY, "13:00", "17:00"),
        weekly(3, 2, DayOfWeek::WEDNESDAY, "09:00", "12:00"),
        weekly(4, 1, DayOfWeek::SATURDAY, "10:00", "14:00"),
    ];

    for day in DayOfWeek::ALL {
        let entries = project_schedule(
            ScheduleTarget::Day(day),
            &workers,
            &rows,
            &[],
            ProjectOptions::default(),
        );
        let mut got: Vec<u32> = entries.iter().map(|e| e.worker_id.get()).collect();
        let mut expected: Vec<u32> = rows
            .iter()
            .filter(|r| r.rule.applies_on_day(day))
            .map(|r| r.worker_id.get())
            .collect();
        got.sort_unstable();
        expected.sort_unstable();
        assert_eq!(got, expected, "day {day}");
    }
}

#[test]
fn sorted_by_start_then_first_name() {
    let workers = vec![
        Worker::new(WorkerId(1), "Alice", "Zed"),
        Worker::new(WorkerId(2), "Bob", "Young"),
        Worker::new(WorkerId(3), "carol", "Abbott"),
    ];
    let rows = vec![
        weekly(1, 3, DayOfWeek::TUESDAY, "09:00", "12:00"),
        weekly(2, 1, DayOfWeek::TUESDAY, "09:00", "11:00"),
        weekly(3, 2, DayOfWeek::TUESDAY, "08:00", "10:00"),
    ];
    let entries = project_schedule(
        ScheduleTarget::Day(DayOfWeek::TUESDAY),
        &workers,
        &rows,
        &[],
        ProjectOptions::default(),
    );
    let names: Vec<&str> = entries.iter().map(|e| e.first_name.as_str()).collect();
    assert_eq!(names, ["Bob", "Alice", "carol"]);
}

#[test]
fn specialties_distinct_sorted_and_empty_when_none() {
    let workers = vec![
        Worker::new(WorkerId(1), "Ada", "Lovelace"),
        Worker::new(WorkerId(2), "Grace", "Hopper"),
    ];
    let rows = vec![
        weekly(1, 1, DayOfWeek::FRIDAY, "09:00", "12:00"),
        weekly(2, 2, DayOfWeek::FRIDAY, "10:00", "12:00"),
    ];
    let specialties = vec![
        SpecialtyName::new(WorkerId(1), "Laser Cutter"),
        SpecialtyName::new(WorkerId(1), "3D Printer"),
        SpecialtyName::new(WorkerId(1), "Laser Cutter"),
    ];
    let entries = project_schedule(
        ScheduleTarget::Day(DayOfWeek::FRIDAY),
        &workers,
        &rows,
        &specialties,
        ProjectOptions::default(),
    );
    assert_eq!(entries[0].specialties, "3D Printer, Laser Cutter");
    assert_eq!(entries[1].specialties, "");
}

#[test]
fn duplicates_kept_unless_deduped() {
    let workers = vec![Worker::new(WorkerId(1), "Ada", "Lovelace")];
    let rows = vec![
        weekly(1, 1, DayOfWeek::MONDAY, "09:00", "12:00"),
        weekly(2, 1, DayOfWeek::MONDAY, "09:00", "12:00"),
        weekly(3, 1, DayOfWeek::MONDAY, "11:00", "15:00"),
    ];
    let target = ScheduleTarget::Day(DayOfWeek::MONDAY);

    let all = project_schedule(target, &workers, &rows, &[], ProjectOptions::default());
    assert_eq!(all.len(), 3);

    let deduped = project_schedule(
        target,
        &workers,
        &rows,
        &[],
        ProjectOptions {
            dedupe_identical: true,
        },
    );
    // le chevauchement 11:00–15:00 reste une entrée distincte
    assert_eq!(deduped.len(), 2);
}

#[test]
fn empty_day_and_orphan_rows() {
    let workers = vec![Worker::new(WorkerId(1), "Ada", "Lovelace")];
    let rows = vec![weekly(1, 99, DayOfWeek::THURSDAY, "09:00", "12:00")];

    let thursday = project_schedule(
        ScheduleTarget::Day(DayOfWeek::THURSDAY),
        &workers,
        &rows,
        &[],
        ProjectOptions::default(),
    );
    assert!(thursday.is_empty());

    let sunday = project_schedule(
        ScheduleTarget::Day(DayOfWeek::SUNDAY),
        &workers,
        &[],
        &[],
        ProjectOptions::default(),
    );
    assert!(sunday.is_empty());
}

#[test]
fn ranged_rules_need_a_weekday_date() {
    let mut data = monday_dataset();
    data.availability = vec![Availability::ranged(
        AvailabilityId(7),
        WorkerId(1),
        date(2025, 10, 1),
        date(2025, 10, 31),
        t("10:00"),
        t("16:00"),
    )];
    let projector = ScheduleProjector::new(&data, FixedClock(date(2025, 10, 6)));

    let monday = projector.schedule_for_date(date(2025, 10, 6)).unwrap();
    assert_eq!(monday.len(), 1);
    assert_eq!(monday[0].start_time_display, "10:00 AM");
    assert_eq!(monday[0].end_time_display, "4:00 PM");

    assert!(projector.schedule_for_date(date(2025, 10, 4)).unwrap().is_empty());
    assert!(projector.schedule_for_date(date(2025, 11, 3)).unwrap().is_empty());
    assert!(projector.schedule_for_day(DayOfWeek::MONDAY).unwrap().is_empty());
}

#[test]
fn saturday_dashboard_shows_monday_unchanged() {
    let data = monday_dataset();
    let saturday = date(2025, 10, 11);
    let projector = ScheduleProjector::new(&data, FixedClock(saturday));

    let dashboard = projector.dashboard().unwrap();
    assert!(dashboard.substituted());
    assert_eq!(dashboard.shown, date(2025, 10, 13));
    assert_eq!(
        dashboard.entries,
        projector.schedule_for_day(DayOfWeek::MONDAY).unwrap()
    );

    let sunday = ScheduleProjector::new(&data, FixedClock(date(2025, 10, 12)));
    assert_eq!(sunday.dashboard().unwrap().shown, date(2025, 10, 13));
}

#[test]
fn weekday_dashboard_and_disabled_substitution() {
    let data = monday_dataset();
    let monday = ScheduleProjector::new(&data, FixedClock(date(2025, 10, 6)));
    let dashboard = monday.dashboard().unwrap();
    assert!(!dashboard.substituted());
    assert_eq!(dashboard.entries.len(), 1);

    let literal = ScheduleProjector::new(&data, FixedClock(date(2025, 10, 11))).with_policy(
        permanence::DashboardPolicy {
            substitute_weekend: false,
        },
    );
    let dashboard = literal.dashboard().unwrap();
    assert_eq!(dashboard.shown, date(2025, 10, 11));
    assert!(dashboard.entries.is_empty());
}

struct OfflineStore;

impl ScheduleSource for OfflineStore {
    fn list_availability_for_day(&self, _day: DayOfWeek) -> anyhow::Result<Vec<Availability>> {
        anyhow::bail!("store offline")
    }
    fn list_all_availability(&self) -> anyhow::Result<Vec<Availability>> {
        anyhow::bail!("store offline")
    }
    fn list_specialties_for_workers(&self, _ids: &[WorkerId]) -> anyhow::Result<Vec<SpecialtyName>> {
        anyhow::bail!("store offline")
    }
    fn find_workers(&self, _ids: &[WorkerId]) -> anyhow::Result<Vec<Worker>> {
        anyhow::bail!("store offline")
    }
}

#[test]
fn store_failures_surface_as_data_unavailable() {
    let projector = ScheduleProjector::new(OfflineStore, FixedClock(date(2025, 10, 6)));
    let err = projector.schedule_for_day(DayOfWeek::MONDAY).unwrap_err();
    assert!(matches!(err, ProjectionError::DataUnavailable(_)));
    assert!(err.to_string().contains("store offline"));
    assert!(matches!(
        projector.open_hours(),
        Err(ProjectionError::DataUnavailable(_))
    ));
}

#[test]
fn invalid_targets_are_rejected() {
    for raw in ["", "8", "0", "2025-13-01", "someday"] {
        let err = raw.parse::<ScheduleTarget>().unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidArgument(_)), "{raw:?}");
    }
    assert_eq!(
        "2025-10-06".parse::<ScheduleTarget>().unwrap(),
        ScheduleTarget::Date(date(2025, 10, 6))
    );
    assert_eq!(
        "monday".parse::<ScheduleTarget>().unwrap(),
        ScheduleTarget::Day(DayOfWeek::MONDAY)
    );
}
