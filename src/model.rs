use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Erreurs de saisie (frontière d'entrée des données).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid time {0:?}: expected HH:MM")]
    Time(String),
    #[error("day of week out of range: {0} (expected 1=Sunday..7=Saturday)")]
    DayOfWeek(u8),
    #[error("invalid day of week: {0:?}")]
    DayName(String),
    #[error("invalid date range {0:?}: expected YYYY-MM-DD..YYYY-MM-DD")]
    DateRange(String),
    #[error("invalid slot {0:?}: expected DAY@HH:MM-HH:MM")]
    Slot(String),
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

numeric_id!(
    /// Identifiant d'un membre de l'équipe (WorkerID)
    WorkerId
);
numeric_id!(
    /// Identifiant d'une machine (MachineID)
    MachineId
);
numeric_id!(SpecialtyId);
numeric_id!(AvailabilityId);

/// Jour de la semaine, convention des données persistées : 1 = dimanche … 7 = samedi.
///
/// C'est la seule convention interne ; toute conversion depuis `chrono`
/// passe par [`DayOfWeek::of`] ou `From<Weekday>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

impl DayOfWeek {
    pub const SUNDAY: Self = Self(1);
    pub const MONDAY: Self = Self(2);
    pub const TUESDAY: Self = Self(3);
    pub const WEDNESDAY: Self = Self(4);
    pub const THURSDAY: Self = Self(5);
    pub const FRIDAY: Self = Self(6);
    pub const SATURDAY: Self = Self(7);

    pub const ALL: [Self; 7] = [
        Self::SUNDAY,
        Self::MONDAY,
        Self::TUESDAY,
        Self::WEDNESDAY,
        Self::THURSDAY,
        Self::FRIDAY,
        Self::SATURDAY,
    ];

    pub fn new(n: u8) -> Result<Self, ParseError> {
        if (1..=7).contains(&n) {
            Ok(Self(n))
        } else {
            Err(ParseError::DayOfWeek(n))
        }
    }

    /// Jour de la semaine d'une date du calendrier.
    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        DAY_NAMES[usize::from(self.0 - 1)]
    }

    pub fn is_weekend(self) -> bool {
        self == Self::SATURDAY || self == Self::SUNDAY
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        // number_from_sunday() ∈ 1..=7
        Self(w.number_from_sunday() as u8)
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(d: DayOfWeek) -> Self {
        match d.0 {
            1 => Weekday::Sun,
            2 => Weekday::Mon,
            3 => Weekday::Tue,
            4 => Weekday::Wed,
            5 => Weekday::Thu,
            6 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = ParseError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(d: DayOfWeek) -> Self {
        d.0
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepte le numéro (`"2"`) ou le nom anglais, complet ou abrégé (`"mon"`, `"Monday"`).
impl FromStr for DayOfWeek {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::new(n);
        }
        let lower = s.to_ascii_lowercase();
        if lower.len() >= 3 {
            let found = DAY_NAMES
                .iter()
                .position(|name| name.to_ascii_lowercase().starts_with(&lower));
            if let Some(idx) = found {
                return Ok(Self(idx as u8 + 1));
            }
        }
        Err(ParseError::DayName(s.to_string()))
    }
}

/// Heure murale 24 h telle que stockée (`HH:MM`), à la minute près.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(self) -> NaiveTime {
        self.0
    }
}

/// `HH:MM`, avec un suffixe `:SS` toléré (rendu MySQL `TIME`) et ignoré.
impl FromStr for ClockTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|_| ParseError::Time(raw.to_string()))?;
        Self::new(parsed.hour(), parsed.minute()).ok_or_else(|| ParseError::Time(raw.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> Self {
        t.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Membre de l'équipe. Le hash du mot de passe reste chez le service d'authentification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_boss: bool,
}

impl Worker {
    pub fn new<F: Into<String>, L: Into<String>>(id: WorkerId, first_name: F, last_name: L) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            email: None,
            is_admin: false,
            is_boss: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
}

/// Qualification d'un membre sur une machine (table de jointure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: SpecialtyId,
    pub worker_id: WorkerId,
    pub machine_id: MachineId,
}

/// Spécialité déjà jointe au nom de la machine, telle que consommée par la projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyName {
    pub worker_id: WorkerId,
    pub machine_name: String,
}

impl SpecialtyName {
    pub fn new<S: Into<String>>(worker_id: WorkerId, machine_name: S) -> Self {
        Self {
            worker_id,
            machine_name: machine_name.into(),
        }
    }
}

/// Forme d'une règle de disponibilité.
///
/// `Weekly` est la forme principale. `Range` est l'ancienne forme : elle ne vaut
/// que pour les jours ouvrés (lundi–vendredi) compris dans `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvailabilityRule {
    Weekly { day: DayOfWeek },
    Range { from: NaiveDate, to: NaiveDate },
}

impl AvailabilityRule {
    pub fn weekly_day(&self) -> Option<DayOfWeek> {
        match *self {
            AvailabilityRule::Weekly { day } => Some(day),
            AvailabilityRule::Range { .. } => None,
        }
    }

    /// Vrai pour une règle hebdomadaire sur `day`. Une plage n'est pas
    /// rattachée à un jour de semaine sans date.
    pub fn applies_on_day(&self, day: DayOfWeek) -> bool {
        self.weekly_day() == Some(day)
    }

    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match *self {
            AvailabilityRule::Weekly { day } => day == DayOfWeek::of(date),
            AvailabilityRule::Range { from, to } => {
                from <= date && date <= to && !DayOfWeek::of(date).is_weekend()
            }
        }
    }
}

/// Un jour de semaine (`2`, `Monday`) ou une plage `YYYY-MM-DD..YYYY-MM-DD` (`a/b` accepté).
impl FromStr for AvailabilityRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let Some((from_raw, to_raw)) = raw.split_once("..").or_else(|| raw.split_once('/')) else {
            let day: DayOfWeek = raw.parse()?;
            return Ok(AvailabilityRule::Weekly { day });
        };
        let invalid = || ParseError::DateRange(raw.to_string());
        let from = NaiveDate::parse_from_str(from_raw.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
        let to = NaiveDate::parse_from_str(to_raw.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
        if to < from {
            return Err(invalid());
        }
        Ok(AvailabilityRule::Range { from, to })
    }
}

impl fmt::Display for AvailabilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityRule::Weekly { day } => write!(f, "{day}"),
            AvailabilityRule::Range { from, to } => write!(f, "{from}..{to} (Mon-Fri)"),
        }
    }
}

/// Disponibilité d'un membre : une règle et un créneau horaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub id: AvailabilityId,
    pub worker_id: WorkerId,
    #[serde(flatten)]
    pub rule: AvailabilityRule,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl Availability {
    pub fn weekly(
        id: AvailabilityId,
        worker_id: WorkerId,
        day: DayOfWeek,
        start: ClockTime,
        end: ClockTime,
    ) -> Self {
        Self {
            id,
            worker_id,
            rule: AvailabilityRule::Weekly { day },
            start,
            end,
        }
    }

    pub fn ranged(
        id: AvailabilityId,
        worker_id: WorkerId,
        from: NaiveDate,
        to: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> Self {
        Self {
            id,
            worker_id,
            rule: AvailabilityRule::Range { from, to },
            start,
            end,
        }
    }
}

/// Jeu de données complet (équivalent des tables Worker, Machine,
/// WorkerSpecialty et WorkerAvailability).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dataset {
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub specialties: Vec<Specialty>,
    #[serde(default)]
    pub availability: Vec<Availability>,
}

impl Dataset {
    pub fn find_worker(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }
    pub fn find_machine(&self, id: MachineId) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }
    pub fn find_availability(&self, id: AvailabilityId) -> Option<&Availability> {
        self.availability.iter().find(|a| a.id == id)
    }
    pub fn find_specialty(&self, id: SpecialtyId) -> Option<&Specialty> {
        self.specialties.iter().find(|s| s.id == id)
    }

    /// Jointure spécialité → nom de machine ; les lignes orphelines sont ignorées.
    pub fn specialty_names(&self) -> impl Iterator<Item = SpecialtyName> + '_ {
        self.specialties.iter().filter_map(|s| {
            self.find_machine(s.machine_id)
                .map(|m| SpecialtyName::new(s.worker_id, m.name.clone()))
        })
    }

    pub fn next_worker_id(&self) -> WorkerId {
        WorkerId(self.workers.iter().map(|w| w.id.0).max().unwrap_or(0) + 1)
    }
    pub fn next_specialty_id(&self) -> SpecialtyId {
        SpecialtyId(self.specialties.iter().map(|s| s.id.0).max().unwrap_or(0) + 1)
    }
    pub fn next_availability_id(&self) -> AvailabilityId {
        AvailabilityId(self.availability.iter().map(|a| a.id.0).max().unwrap_or(0) + 1)
    }

    /// Fusionne des lignes importées : une ligne de même id remplace l'existante.
    pub fn merge_workers(&mut self, rows: Vec<Worker>) {
        upsert(&mut self.workers, rows, |w| w.id);
    }
    pub fn merge_machines(&mut self, rows: Vec<Machine>) {
        upsert(&mut self.machines, rows, |m| m.id);
    }
    pub fn merge_specialties(&mut self, rows: Vec<Specialty>) {
        upsert(&mut self.specialties, rows, |s| s.id);
    }
    pub fn merge_availability(&mut self, rows: Vec<Availability>) {
        upsert(&mut self.availability, rows, |a| a.id);
    }
}

fn upsert<T, K: PartialEq>(existing: &mut Vec<T>, rows: Vec<T>, key: impl Fn(&T) -> K) {
    for row in rows {
        match existing.iter_mut().find(|e| key(e) == key(&row)) {
            Some(slot) => *slot = row,
            None => existing.push(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_of_week_uses_sunday_one() {
        let monday = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        assert_eq!(DayOfWeek::of(monday), DayOfWeek::MONDAY);
        assert_eq!(DayOfWeek::of(monday).number(), 2);
        let sunday = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        assert_eq!(DayOfWeek::of(sunday).number(), 1);
        assert_eq!(Weekday::from(DayOfWeek::SATURDAY), Weekday::Sat);
    }

    #[test]
    fn day_of_week_parses_numbers_and_names() {
        assert_eq!("7".parse::<DayOfWeek>().unwrap(), DayOfWeek::SATURDAY);
        assert_eq!("mon".parse::<DayOfWeek>().unwrap(), DayOfWeek::MONDAY);
        assert_eq!("Thursday".parse::<DayOfWeek>().unwrap(), DayOfWeek::THURSDAY);
        assert_eq!("0".parse::<DayOfWeek>(), Err(ParseError::DayOfWeek(0)));
        assert!("mo".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn clock_time_boundary_validation() {
        assert_eq!("09:30".parse::<ClockTime>().unwrap(), ClockTime::new(9, 30).unwrap());
        assert_eq!("13:05:00".parse::<ClockTime>().unwrap().to_string(), "13:05");
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("1200".parse::<ClockTime>().is_err());
        assert!("12:30 PM".parse::<ClockTime>().is_err());
        assert!("ab:cd".parse::<ClockTime>().is_err());
    }

    #[test]
    fn ranged_rule_skips_weekends() {
        let rule = AvailabilityRule::Range {
            from: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
        };
        assert!(rule.applies_on(NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()));
        assert!(!rule.applies_on(NaiveDate::from_ymd_opt(2025, 10, 4).unwrap()));
        assert!(!rule.applies_on(NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()));
        assert!(!rule.applies_on_day(DayOfWeek::MONDAY));
    }

    #[test]
    fn rule_parses_day_or_range() {
        assert_eq!(
            "Tue".parse::<AvailabilityRule>().unwrap(),
            AvailabilityRule::Weekly { day: DayOfWeek::TUESDAY }
        );
        let range = "2025-01-06..2025-01-31".parse::<AvailabilityRule>().unwrap();
        assert_eq!(range, "2025-01-06/2025-01-31".parse::<AvailabilityRule>().unwrap());
        assert!("2025-02-01..2025-01-01".parse::<AvailabilityRule>().is_err());
    }
}
