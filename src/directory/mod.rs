mod mutate;
mod types;

pub use types::{DirectoryError, SlotSpec, WorkerSummary};

use crate::access::Session;
use crate::model::{Availability, AvailabilityId, Dataset, MachineId, SpecialtyId, Worker, WorkerId};
use std::collections::BTreeSet;

/// Directory : gestion des membres, de leurs spécialités et disponibilités.
///
/// Les lectures sont libres ; les écritures passent par une [`Session`](crate::access::Session).
#[derive(Debug, Default)]
pub struct Directory {
    data: Dataset,
}

impl Directory {
    pub fn new(data: Dataset) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn into_inner(self) -> Dataset {
        self.data
    }

    /// Membres triés par (nom, prénom).
    pub fn summaries(&self) -> Vec<WorkerSummary> {
        let mut workers: Vec<_> = self.data.workers.iter().collect();
        workers.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });

        workers
            .into_iter()
            .map(|w| {
                let names: BTreeSet<String> = self
                    .data
                    .specialty_names()
                    .filter(|s| s.worker_id == w.id)
                    .map(|s| s.machine_name)
                    .collect();
                let availability_count = self
                    .data
                    .availability
                    .iter()
                    .filter(|a| a.worker_id == w.id)
                    .count();
                WorkerSummary {
                    worker: w.clone(),
                    specialties: names.into_iter().collect::<Vec<_>>().join(", "),
                    availability_count,
                }
            })
            .collect()
    }

    /// Disponibilités d'un membre triées par (règle, début) : jours de semaine
    /// d'abord, puis plages par date.
    pub fn availability_of(&self, worker: WorkerId) -> Result<Vec<Availability>, DirectoryError> {
        self.ensure_worker(worker)?;
        let mut rows: Vec<Availability> = self
            .data
            .availability
            .iter()
            .filter(|a| a.worker_id == worker)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.rule.cmp(&b.rule).then_with(|| a.start.cmp(&b.start)));
        Ok(rows)
    }

    pub fn specialties_of(&self, worker: WorkerId) -> Result<Vec<String>, DirectoryError> {
        self.ensure_worker(worker)?;
        let mut names: Vec<String> = self
            .data
            .specialty_names()
            .filter(|s| s.worker_id == worker)
            .map(|s| s.machine_name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Ajoute un membre ; son id est attribué par le répertoire.
    pub fn add_worker(&mut self, session: &dyn Session, worker: Worker) -> Result<WorkerId, DirectoryError> {
        mutate::add_worker(self, session, worker)
    }

    pub fn update_worker(
        &mut self,
        session: &dyn Session,
        id: WorkerId,
        changes: Worker,
    ) -> Result<(), DirectoryError> {
        mutate::update_worker(self, session, id, changes)
    }

    pub fn remove_worker(&mut self, session: &dyn Session, worker: WorkerId) -> Result<(), DirectoryError> {
        mutate::remove_worker(self, session, worker)
    }

    pub fn add_availability(
        &mut self,
        session: &dyn Session,
        worker: WorkerId,
        slot: SlotSpec,
    ) -> Result<AvailabilityId, DirectoryError> {
        mutate::add_availability(self, session, worker, slot)
    }

    pub fn remove_availability(
        &mut self,
        session: &dyn Session,
        id: AvailabilityId,
    ) -> Result<(), DirectoryError> {
        mutate::remove_availability(self, session, id)
    }

    pub fn add_specialty(
        &mut self,
        session: &dyn Session,
        worker: WorkerId,
        machine: MachineId,
    ) -> Result<SpecialtyId, DirectoryError> {
        mutate::add_specialty(self, session, worker, machine)
    }

    pub fn remove_specialty(&mut self, session: &dyn Session, id: SpecialtyId) -> Result<(), DirectoryError> {
        mutate::remove_specialty(self, session, id)
    }

    pub fn replace_schedule(
        &mut self,
        session: &dyn Session,
        worker: WorkerId,
        machines: &[MachineId],
        slots: &[SlotSpec],
    ) -> Result<(), DirectoryError> {
        mutate::replace_schedule(self, session, worker, machines, slots)
    }

    fn ensure_worker(&self, worker: WorkerId) -> Result<(), DirectoryError> {
        self.data
            .find_worker(worker)
            .map(|_| ())
            .ok_or(DirectoryError::UnknownWorker(worker))
    }
}
