use super::format::format_time;
use super::OpenHours;
use crate::model::{Availability, ClockTime, DayOfWeek};
use std::collections::BTreeMap;

/// Horaires d'ouverture par jour : premier début et dernière fin, tous membres confondus.
///
/// Les sept jours sont présents ; un jour sans disponibilité vaut `Closed`.
/// Seules les règles hebdomadaires comptent, une plage n'ayant pas de jour fixe.
pub fn open_hours_by_weekday(availability: &[Availability]) -> BTreeMap<DayOfWeek, OpenHours> {
    let mut bounds: BTreeMap<DayOfWeek, (ClockTime, ClockTime)> = BTreeMap::new();

    for slot in availability {
        let Some(day) = slot.rule.weekly_day() else {
            continue;
        };
        bounds
            .entry(day)
            .and_modify(|(open, close)| {
                *open = (*open).min(slot.start);
                *close = (*close).max(slot.end);
            })
            .or_insert((slot.start, slot.end));
    }

    DayOfWeek::ALL
        .into_iter()
        .map(|day| {
            let hours = match bounds.get(&day) {
                Some(&(open, close)) => OpenHours {
                    open: format_time(open),
                    close: format_time(close),
                },
                None => OpenHours::closed(),
            };
            (day, hours)
        })
        .collect()
}
