use crate::model::{
    Availability, AvailabilityId, AvailabilityRule, ClockTime, Machine, MachineId,
    Specialty, SpecialtyId, Worker, WorkerId,
};
use crate::projector::DutyEntry;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import des membres : header `id,first_name,last_name[,phone][,email][,is_admin][,is_boss]`
pub fn import_workers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Worker>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: WorkerId = field(&rec, 0, "id")?.parse().context("invalid worker id")?;
        let first = field(&rec, 1, "first_name")?;
        let last = field(&rec, 2, "last_name")?;
        if first.is_empty() || last.is_empty() {
            bail!("invalid worker row {id} (empty name)");
        }
        let mut worker = Worker::new(id, first, last);
        worker.phone = optional(&rec, 3);
        worker.email = optional(&rec, 4);
        if let Some(flag) = optional(&rec, 5) {
            worker.is_admin = parse_bool(&flag)
                .with_context(|| format!("invalid is_admin value for worker {id}"))?;
        }
        if let Some(flag) = optional(&rec, 6) {
            worker.is_boss = parse_bool(&flag)
                .with_context(|| format!("invalid is_boss value for worker {id}"))?;
        }
        out.push(worker);
    }
    Ok(out)
}

/// Import des machines : header `id,name`
pub fn import_machines_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Machine>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: MachineId = field(&rec, 0, "id")?.parse().context("invalid machine id")?;
        let name = field(&rec, 1, "name")?;
        if name.is_empty() {
            bail!("invalid machine row {id} (empty name)");
        }
        out.push(Machine {
            id,
            name: name.to_string(),
        });
    }
    Ok(out)
}

/// Import des spécialités : header `id,worker_id,machine_id`
pub fn import_specialties_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Specialty>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        out.push(Specialty {
            id: field(&rec, 0, "id")?
                .parse::<SpecialtyId>()
                .context("invalid specialty id")?,
            worker_id: field(&rec, 1, "worker_id")?
                .parse::<WorkerId>()
                .context("invalid worker id")?,
            machine_id: field(&rec, 2, "machine_id")?
                .parse::<MachineId>()
                .context("invalid machine id")?,
        });
    }
    Ok(out)
}

/// Import des disponibilités : header `id,worker_id,day,start,end`.
///
/// `day` est un jour de semaine (`2`, `Monday`) ou une plage de dates
/// `YYYY-MM-DD..YYYY-MM-DD` (ou `a/b`). Les heures sont validées ici, la
/// projection les suppose bien formées.
pub fn import_availability_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Availability>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: AvailabilityId = field(&rec, 0, "id")?
            .parse()
            .context("invalid availability id")?;
        let worker_id: WorkerId = field(&rec, 1, "worker_id")?
            .parse()
            .context("invalid worker id")?;
        let rule: AvailabilityRule = field(&rec, 2, "day")?
            .parse()
            .with_context(|| format!("invalid day for availability {id}"))?;
        let start: ClockTime = field(&rec, 3, "start")?.parse()?;
        let end: ClockTime = field(&rec, 4, "end")?.parse()?;
        if end <= start {
            bail!("availability {id}: end {end} must be after start {start}");
        }
        out.push(Availability {
            id,
            worker_id,
            rule,
            start,
            end,
        });
    }
    Ok(out)
}

fn field<'r>(rec: &'r StringRecord, idx: usize, name: &str) -> anyhow::Result<&'r str> {
    Ok(rec
        .get(idx)
        .with_context(|| format!("missing {name}"))?
        .trim())
}

fn optional(rec: &StringRecord, idx: usize) -> Option<String> {
    rec.get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export CSV d'un planning : header `worker_id,first_name,last_name,specialties,day,start,end`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, entries: &[DutyEntry]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "worker_id",
        "first_name",
        "last_name",
        "specialties",
        "day",
        "start",
        "end",
    ])?;
    for e in entries {
        let worker_id = e.worker_id.to_string();
        w.write_record([
            worker_id.as_str(),
            e.first_name.as_str(),
            e.last_name.as_str(),
            e.specialties.as_str(),
            e.day_of_week.name(),
            e.start_time_display.as_str(),
            e.end_time_display.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON d'un planning (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, entries: &[DutyEntry]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(entries)?;
    fs::write(path, s)?;
    Ok(())
}
