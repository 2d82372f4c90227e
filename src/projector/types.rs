use crate::model::{AvailabilityRule, ClockTime, DayOfWeek, ParseError, WorkerId};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Options de projection
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectOptions {
    /// Retire les lignes identiques (même membre, même créneau) au lieu de les répéter.
    pub dedupe_identical: bool,
}

/// Politique d'affichage du tableau de bord.
#[derive(Debug, Clone, Copy)]
pub struct DashboardPolicy {
    /// Le samedi et le dimanche, afficher le planning du lundi suivant.
    pub substitute_weekend: bool,
}

impl Default for DashboardPolicy {
    fn default() -> Self {
        Self {
            substitute_weekend: true,
        }
    }
}

impl DashboardPolicy {
    /// Date réellement affichée pour `today`.
    pub fn display_date(&self, today: NaiveDate) -> Result<NaiveDate, ProjectionError> {
        if !self.substitute_weekend {
            return Ok(today);
        }
        let skip = match DayOfWeek::of(today) {
            DayOfWeek::SATURDAY => 2,
            DayOfWeek::SUNDAY => 1,
            _ => 0,
        };
        today
            .checked_add_days(Days::new(skip))
            .ok_or_else(|| ProjectionError::InvalidArgument(format!("date overflow after {today}")))
    }
}

/// Cible d'une projection : une date précise, ou un jour de semaine explicite.
///
/// Seule une date permet d'appliquer les règles par plage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleTarget {
    Date(NaiveDate),
    Day(DayOfWeek),
}

impl ScheduleTarget {
    pub fn day_of_week(self) -> DayOfWeek {
        match self {
            ScheduleTarget::Date(date) => DayOfWeek::of(date),
            ScheduleTarget::Day(day) => day,
        }
    }

    pub fn date(self) -> Option<NaiveDate> {
        match self {
            ScheduleTarget::Date(date) => Some(date),
            ScheduleTarget::Day(_) => None,
        }
    }

    pub fn matches(self, rule: &AvailabilityRule) -> bool {
        match self {
            ScheduleTarget::Date(date) => rule.applies_on(date),
            ScheduleTarget::Day(day) => rule.applies_on_day(day),
        }
    }
}

/// `YYYY-MM-DD`, sinon un jour de semaine (numéro 1–7 ou nom).
impl FromStr for ScheduleTarget {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ProjectionError::InvalidArgument("missing target date".to_string()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(ScheduleTarget::Date(date));
        }
        let day: DayOfWeek = raw.parse()?;
        Ok(ScheduleTarget::Day(day))
    }
}

/// Une ligne du planning projeté.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyEntry {
    pub worker_id: WorkerId,
    pub first_name: String,
    pub last_name: String,
    /// Noms de machines distincts, triés, séparés par `", "` ; vide si aucun.
    pub specialties: String,
    pub start_time_display: String,
    pub end_time_display: String,
    pub day_of_week: DayOfWeek,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Horaires d'ouverture d'un jour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenHours {
    pub open: String,
    pub close: String,
}

impl OpenHours {
    pub const CLOSED: &'static str = "Closed";

    pub fn closed() -> Self {
        Self {
            open: Self::CLOSED.to_string(),
            close: String::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.open == Self::CLOSED
    }
}

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("schedule data unavailable: {0:#}")]
    DataUnavailable(#[source] anyhow::Error),
}

impl From<ParseError> for ProjectionError {
    fn from(e: ParseError) -> Self {
        ProjectionError::InvalidArgument(e.to_string())
    }
}
