use super::format::format_time;
use super::{DutyEntry, ProjectOptions, ScheduleTarget};
use crate::model::{Availability, ClockTime, SpecialtyName, Worker, WorkerId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Projette les disponibilités sur la cible : qui est de permanence, avec quelles
/// spécialités, triés par (début, prénom).
///
/// Les heures sont supposées bien formées : `ClockTime` n'existe qu'après
/// validation à la saisie (`ClockTime::from_str`, import CSV, `Directory`).
/// Aucune ligne ne donne une liste vide, pas une erreur. Les créneaux qui se
/// chevauchent ne sont pas fusionnés ; un même membre peut apparaître plusieurs fois.
pub fn project_schedule(
    target: ScheduleTarget,
    workers: &[Worker],
    availability: &[Availability],
    specialties: &[SpecialtyName],
    opts: ProjectOptions,
) -> Vec<DutyEntry> {
    let day = target.day_of_week();
    let machines = machines_by_worker(specialties);
    let mut seen: HashSet<(WorkerId, ClockTime, ClockTime)> = HashSet::new();
    let mut out = Vec::new();

    for slot in availability.iter().filter(|a| target.matches(&a.rule)) {
        if opts.dedupe_identical && !seen.insert((slot.worker_id, slot.start, slot.end)) {
            continue;
        }
        // jointure interne : une disponibilité sans membre n'est pas affichée
        let Some(worker) = workers.iter().find(|w| w.id == slot.worker_id) else {
            debug!(worker = %slot.worker_id, availability = %slot.id, "availability without worker skipped");
            continue;
        };
        let joined = machines
            .get(&worker.id)
            .map(|names| names.iter().copied().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();

        out.push(DutyEntry {
            worker_id: worker.id,
            first_name: worker.first_name.clone(),
            last_name: worker.last_name.clone(),
            specialties: joined,
            start_time_display: format_time(slot.start),
            end_time_display: format_time(slot.end),
            day_of_week: day,
            start: slot.start,
            end: slot.end,
        });
    }

    out.sort_by(duty_order);
    out
}

fn machines_by_worker(specialties: &[SpecialtyName]) -> BTreeMap<WorkerId, BTreeSet<&str>> {
    let mut map: BTreeMap<WorkerId, BTreeSet<&str>> = BTreeMap::new();
    for s in specialties {
        map.entry(s.worker_id)
            .or_default()
            .insert(s.machine_name.as_str());
    }
    map
}

// Prénom comparé sans la casse, comme la collation de la base d'origine.
fn duty_order(a: &DutyEntry, b: &DutyEntry) -> Ordering {
    a.start.cmp(&b.start).then_with(|| {
        a.first_name
            .to_lowercase()
            .cmp(&b.first_name.to_lowercase())
            .then_with(|| a.first_name.cmp(&b.first_name))
    })
}
