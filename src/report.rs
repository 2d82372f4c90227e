use crate::model::DayOfWeek;
use crate::projector::{Dashboard, DutyEntry, OpenHours};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Permet de customiser le rendu d'un planning (texte, HTML, etc.).
pub trait ScheduleRenderer {
    fn render_schedule(&self, title: &str, entries: &[DutyEntry]) -> String;
    fn render_hours(&self, hours: &BTreeMap<DayOfWeek, OpenHours>) -> String;
}

/// Rendu texte brut, une ligne par créneau.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSchedule;

impl ScheduleRenderer for TextSchedule {
    fn render_schedule(&self, title: &str, entries: &[DutyEntry]) -> String {
        let mut out = format!("{title}\n");
        if entries.is_empty() {
            out.push_str("  no one scheduled\n");
            return out;
        }
        for e in entries {
            let specialties = if e.specialties.is_empty() {
                "-"
            } else {
                e.specialties.as_str()
            };
            let _ = writeln!(
                out,
                "  {:>8} - {:<8} | {} {} | {}",
                e.start_time_display, e.end_time_display, e.first_name, e.last_name, specialties
            );
        }
        out
    }

    fn render_hours(&self, hours: &BTreeMap<DayOfWeek, OpenHours>) -> String {
        let mut out = String::new();
        for (day, h) in hours {
            if h.is_closed() {
                let _ = writeln!(out, "{:<9}  {}", day.name(), h.open);
            } else {
                let _ = writeln!(out, "{:<9}  {} - {}", day.name(), h.open, h.close);
            }
        }
        out
    }
}

/// Titre du tableau de bord, avec la mention de substitution le week-end.
pub fn dashboard_title(dashboard: &Dashboard) -> String {
    let day = DayOfWeek::of(dashboard.shown);
    if dashboard.substituted() {
        format!(
            "{day} {} (weekend {}: showing next Monday)",
            dashboard.shown, dashboard.requested
        )
    } else {
        format!("{day} {}", dashboard.shown)
    }
}
