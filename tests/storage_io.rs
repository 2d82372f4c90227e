#![forbid(unsafe_code)]
use permanence::storage::{JsonStorage, Storage};
use permanence::{io, AvailabilityRule, Dataset, DayOfWeek, WorkerId};
use std::fs;
use tempfile::tempdir;

fn write(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn import_merge_save_and_reload() {
    let dir = tempdir().unwrap();
    let workers = write(
        dir.path(),
        "workers.csv",
        "id,first_name,last_name,phone,email,is_admin,is_boss\n\
         1,Ada,Lovelace,,ada@example.org,oui,\n\
         2,Grace,Hopper,555-0100,,no,yes\n",
    );
    let machines = write(dir.path(), "machines.csv", "id,name\n1,3D Printer\n2,Laser Cutter\n");
    let specialties = write(dir.path(), "specialties.csv", "id,worker_id,machine_id\n1,1,1\n");
    let availability = write(
        dir.path(),
        "availability.csv",
        "id,worker_id,day,start,end\n\
         1,1,2,09:00,13:00\n\
         2,2,Friday,13:00:00,17:30\n\
         3,2,2025-01-06..2025-01-31,08:00,10:00\n",
    );

    let mut data = Dataset::default();
    data.merge_workers(io::import_workers_csv(&workers).unwrap());
    data.merge_machines(io::import_machines_csv(&machines).unwrap());
    data.merge_specialties(io::import_specialties_csv(&specialties).unwrap());
    data.merge_availability(io::import_availability_csv(&availability).unwrap());

    let ada = data.find_worker(WorkerId(1)).unwrap();
    assert!(ada.is_admin);
    assert_eq!(ada.email.as_deref(), Some("ada@example.org"));
    assert!(data.find_worker(WorkerId(2)).unwrap().is_boss);
    assert_eq!(
        data.availability[1].rule,
        AvailabilityRule::Weekly { day: DayOfWeek::FRIDAY }
    );
    assert_eq!(data.availability[1].start.to_string(), "13:00");
    assert!(matches!(data.availability[2].rule, AvailabilityRule::Range { .. }));

    // une ligne de même id remplace l'existante
    let renamed = write(dir.path(), "renamed.csv", "id,first_name,last_name\n2,Grace,Brewster\n");
    data.merge_workers(io::import_workers_csv(&renamed).unwrap());
    assert_eq!(data.workers.len(), 2);
    assert_eq!(data.find_worker(WorkerId(2)).unwrap().last_name, "Brewster");

    let storage = JsonStorage::open(dir.path().join("permanence.json"));
    storage.save(&data).unwrap();
    let loaded = storage.load().unwrap();
    assert_eq!(loaded.workers, data.workers);
    assert_eq!(loaded.availability, data.availability);
}

#[test]
fn load_or_default_only_for_missing_file() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("absent.json"));
    assert!(storage.load_or_default().unwrap().workers.is_empty());

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(JsonStorage::open(&broken).load_or_default().is_err());
}

#[test]
fn malformed_times_are_rejected_at_import() {
    let dir = tempdir().unwrap();
    for (name, row) in [
        ("bad_time.csv", "1,1,2,9h00,13:00"),
        ("bad_hour.csv", "1,1,2,24:00,13:00"),
        ("reversed.csv", "1,1,2,13:00,09:00"),
        ("bad_day.csv", "1,1,8,09:00,13:00"),
    ] {
        let path = write(dir.path(), name, &format!("id,worker_id,day,start,end\n{row}\n"));
        assert!(io::import_availability_csv(&path).is_err(), "{name}");
    }
}

#[test]
fn schedule_exports() {
    use permanence::{FixedClock, ScheduleProjector};

    let dir = tempdir().unwrap();
    let availability = write(dir.path(), "a.csv", "id,worker_id,day,start,end\n1,1,Monday,09:00,13:00\n");
    let workers = write(dir.path(), "w.csv", "id,first_name,last_name\n1,Ada,Lovelace\n");
    let mut data = Dataset::default();
    data.merge_workers(io::import_workers_csv(&workers).unwrap());
    data.merge_availability(io::import_availability_csv(&availability).unwrap());

    let today = chrono::NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
    let entries = ScheduleProjector::new(&data, FixedClock(today))
        .schedule_for_day(DayOfWeek::MONDAY)
        .unwrap();

    let csv_path = dir.path().join("out.csv");
    io::export_schedule_csv(&csv_path, &entries).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        csv,
        "worker_id,first_name,last_name,specialties,day,start,end\n1,Ada,Lovelace,,Monday,9:00 AM,1:00 PM\n"
    );

    let json_path = dir.path().join("out.json");
    io::export_schedule_json(&json_path, &entries).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[0]["start_time_display"], "9:00 AM");
    assert_eq!(json[0]["day_of_week"], 2);
    assert_eq!(json[0]["start"], "09:00");
}
