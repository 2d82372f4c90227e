use crate::model::{Availability, Dataset, DayOfWeek, SpecialtyName, Worker, WorkerId};
use chrono::NaiveDate;

/// Interface de lecture consommée par la projection.
///
/// Les erreurs remontent telles quelles ; la projection ne réessaie jamais.
pub trait ScheduleSource {
    /// Disponibilités hebdomadaires du jour `day`.
    fn list_availability_for_day(&self, day: DayOfWeek) -> anyhow::Result<Vec<Availability>>;

    /// Disponibilités par plage couvrant `date` (ancienne forme).
    fn list_ranged_availability(&self, _date: NaiveDate) -> anyhow::Result<Vec<Availability>> {
        Ok(Vec::new())
    }

    fn list_all_availability(&self) -> anyhow::Result<Vec<Availability>>;

    /// Paires (membre, nom de machine) pour les membres demandés.
    fn list_specialties_for_workers(&self, ids: &[WorkerId]) -> anyhow::Result<Vec<SpecialtyName>>;

    fn find_workers(&self, ids: &[WorkerId]) -> anyhow::Result<Vec<Worker>>;
}

impl<T: ScheduleSource + ?Sized> ScheduleSource for &T {
    fn list_availability_for_day(&self, day: DayOfWeek) -> anyhow::Result<Vec<Availability>> {
        (**self).list_availability_for_day(day)
    }
    fn list_ranged_availability(&self, date: NaiveDate) -> anyhow::Result<Vec<Availability>> {
        (**self).list_ranged_availability(date)
    }
    fn list_all_availability(&self) -> anyhow::Result<Vec<Availability>> {
        (**self).list_all_availability()
    }
    fn list_specialties_for_workers(&self, ids: &[WorkerId]) -> anyhow::Result<Vec<SpecialtyName>> {
        (**self).list_specialties_for_workers(ids)
    }
    fn find_workers(&self, ids: &[WorkerId]) -> anyhow::Result<Vec<Worker>> {
        (**self).find_workers(ids)
    }
}

impl ScheduleSource for Dataset {
    fn list_availability_for_day(&self, day: DayOfWeek) -> anyhow::Result<Vec<Availability>> {
        Ok(self
            .availability
            .iter()
            .filter(|a| a.rule.applies_on_day(day))
            .cloned()
            .collect())
    }

    fn list_ranged_availability(&self, date: NaiveDate) -> anyhow::Result<Vec<Availability>> {
        Ok(self
            .availability
            .iter()
            .filter(|a| a.rule.weekly_day().is_none() && a.rule.applies_on(date))
            .cloned()
            .collect())
    }

    fn list_all_availability(&self) -> anyhow::Result<Vec<Availability>> {
        Ok(self.availability.clone())
    }

    fn list_specialties_for_workers(&self, ids: &[WorkerId]) -> anyhow::Result<Vec<SpecialtyName>> {
        Ok(self
            .specialty_names()
            .filter(|s| ids.contains(&s.worker_id))
            .collect())
    }

    fn find_workers(&self, ids: &[WorkerId]) -> anyhow::Result<Vec<Worker>> {
        Ok(self
            .workers
            .iter()
            .filter(|w| ids.contains(&w.id))
            .cloned()
            .collect())
    }
}
