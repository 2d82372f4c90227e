#![forbid(unsafe_code)]
//! Permanence — projection des permanences d'un makerspace.
//!
//! - Disponibilités hebdomadaires (1 = dimanche … 7 = samedi) ou par plage (jours ouvrés).
//! - Planning du jour trié par (début, prénom), heures au format 12 h.
//! - Horaires d'ouverture par jour de semaine.
//! - Stockage fichier JSON, import/export CSV ; l'authentification reste externe.

pub mod access;
pub mod clock;
pub mod directory;
pub mod io;
pub mod model;
pub mod projector;
pub mod report;
pub mod source;
pub mod storage;

pub use access::{require_admin, require_self_or_admin, AccessError, CurrentUser, Session};
pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::{Directory, DirectoryError, SlotSpec, WorkerSummary};
pub use model::{
    Availability, AvailabilityId, AvailabilityRule, ClockTime, Dataset, DayOfWeek, Machine,
    MachineId, ParseError, Specialty, SpecialtyId, SpecialtyName, Worker, WorkerId,
};
pub use projector::{
    format_time, open_hours_by_weekday, project_schedule, Dashboard, DashboardPolicy, DutyEntry,
    OpenHours, ProjectOptions, ProjectionError, ScheduleProjector, ScheduleTarget,
};
pub use report::{ScheduleRenderer, TextSchedule};
pub use source::ScheduleSource;
pub use storage::{JsonStorage, Storage};
