use crate::access::AccessError;
use crate::model::{
    AvailabilityId, AvailabilityRule, ClockTime, MachineId, ParseError, SpecialtyId, Worker,
    WorkerId,
};
use std::str::FromStr;
use thiserror::Error;

/// Ligne de la liste des membres : spécialités agrégées et nombre de disponibilités.
#[derive(Debug, Clone)]
pub struct WorkerSummary {
    pub worker: Worker,
    pub specialties: String,
    pub availability_count: usize,
}

/// Créneau à enregistrer pour un membre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub rule: AvailabilityRule,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl SlotSpec {
    pub fn new(rule: AvailabilityRule, start: ClockTime, end: ClockTime) -> Self {
        Self { rule, start, end }
    }
}

/// `Tuesday@09:00-12:00` ou `2025-01-06..2025-01-31@09:00-12:00`.
/// L'ordre des heures est vérifié par le répertoire, pas ici.
impl FromStr for SlotSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || ParseError::Slot(raw.to_string());
        let (rule, window) = raw.rsplit_once('@').ok_or_else(invalid)?;
        let (start, end) = window.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            rule: rule.parse()?,
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("unknown worker: {0}")]
    UnknownWorker(WorkerId),
    #[error("unknown machine: {0}")]
    UnknownMachine(MachineId),
    #[error("unknown availability: {0}")]
    UnknownAvailability(AvailabilityId),
    #[error("unknown specialty: {0}")]
    UnknownSpecialty(SpecialtyId),
    #[error("worker {0} already has specialty on machine {1}")]
    DuplicateSpecialty(WorkerId, MachineId),
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("invalid date range: end date before start date")]
    InvalidDateRange,
    #[error("worker name cannot be empty")]
    EmptyName,
}
