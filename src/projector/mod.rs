mod duty;
mod format;
mod hours;
mod types;

pub use duty::project_schedule;
pub use format::{format_time, format_window};
pub use hours::open_hours_by_weekday;
pub use types::{
    DashboardPolicy, DutyEntry, OpenHours, ProjectOptions, ProjectionError, ScheduleTarget,
};

use crate::clock::Clock;
use crate::model::{DayOfWeek, WorkerId};
use crate::source::ScheduleSource;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Planning affiché par le tableau de bord.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Jour demandé (aujourd'hui selon l'horloge)
    pub requested: NaiveDate,
    /// Jour effectivement projeté
    pub shown: NaiveDate,
    pub entries: Vec<DutyEntry>,
}

impl Dashboard {
    pub fn substituted(&self) -> bool {
        self.requested != self.shown
    }
}

/// ScheduleProjector : relie une source de données et une horloge à la projection pure.
///
/// Sans état mutable ; partageable entre requêtes concurrentes si la source
/// et l'horloge le sont.
#[derive(Debug)]
pub struct ScheduleProjector<S, C> {
    source: S,
    clock: C,
    opts: ProjectOptions,
    policy: DashboardPolicy,
}

impl<S: ScheduleSource, C: Clock> ScheduleProjector<S, C> {
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            opts: ProjectOptions::default(),
            policy: DashboardPolicy::default(),
        }
    }

    pub fn with_options(mut self, opts: ProjectOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn with_policy(mut self, policy: DashboardPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Planning de la cible, sans substitution de week-end.
    pub fn schedule(&self, target: ScheduleTarget) -> Result<Vec<DutyEntry>, ProjectionError> {
        let mut rows = self
            .source
            .list_availability_for_day(target.day_of_week())
            .map_err(ProjectionError::DataUnavailable)?;
        if let ScheduleTarget::Date(date) = target {
            rows.extend(
                self.source
                    .list_ranged_availability(date)
                    .map_err(ProjectionError::DataUnavailable)?,
            );
        }

        let mut ids: Vec<WorkerId> = rows.iter().map(|a| a.worker_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let workers = self
            .source
            .find_workers(&ids)
            .map_err(ProjectionError::DataUnavailable)?;
        let specialties = self
            .source
            .list_specialties_for_workers(&ids)
            .map_err(ProjectionError::DataUnavailable)?;

        Ok(project_schedule(target, &workers, &rows, &specialties, self.opts))
    }

    pub fn schedule_for_date(&self, date: NaiveDate) -> Result<Vec<DutyEntry>, ProjectionError> {
        self.schedule(ScheduleTarget::Date(date))
    }

    pub fn schedule_for_day(&self, day: DayOfWeek) -> Result<Vec<DutyEntry>, ProjectionError> {
        self.schedule(ScheduleTarget::Day(day))
    }

    /// Vue par défaut : aujourd'hui, ou le lundi suivant le week-end selon la politique.
    pub fn dashboard(&self) -> Result<Dashboard, ProjectionError> {
        let requested = self.clock.today();
        let shown = self.policy.display_date(requested)?;
        if shown != requested {
            debug!(%requested, %shown, "weekend dashboard shows next monday");
        }
        let entries = self.schedule_for_date(shown)?;
        Ok(Dashboard {
            requested,
            shown,
            entries,
        })
    }

    pub fn open_hours(&self) -> Result<BTreeMap<DayOfWeek, OpenHours>, ProjectionError> {
        let all = self
            .source
            .list_all_availability()
            .map_err(ProjectionError::DataUnavailable)?;
        Ok(open_hours_by_weekday(&all))
    }
}
