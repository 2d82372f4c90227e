use crate::model::ClockTime;

/// Affichage 12 h : 0 → 12 AM, 1–11 AM, 12 → 12 PM, 13–23 → h−12 PM.
/// Les minutes sont conservées sur deux chiffres.
pub fn format_time(time: ClockTime) -> String {
    time.time().format("%-I:%M %p").to_string()
}

pub fn format_window(start: ClockTime, end: ClockTime) -> String {
    format!("{} - {}", format_time(start), format_time(end))
}
