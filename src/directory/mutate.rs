use super::{Directory, DirectoryError, SlotSpec};
use crate::access::{require_admin, require_self_or_admin, Session};
use crate::model::{
    Availability, AvailabilityId, AvailabilityRule, MachineId, Specialty, SpecialtyId, Worker,
    WorkerId,
};
use tracing::info;

pub(super) fn add_worker(
    dir: &mut Directory,
    session: &dyn Session,
    mut worker: Worker,
) -> Result<WorkerId, DirectoryError> {
    require_admin(session)?;
    if worker.first_name.trim().is_empty() || worker.last_name.trim().is_empty() {
        return Err(DirectoryError::EmptyName);
    }
    worker.id = dir.data.next_worker_id();
    let id = worker.id;
    dir.data.workers.push(worker);
    info!(worker = %id, "worker added");
    Ok(id)
}

/// Met à jour nom, téléphone, email et statut de responsable.
/// L'id et le drapeau admin du membre existant sont conservés.
pub(super) fn update_worker(
    dir: &mut Directory,
    session: &dyn Session,
    id: WorkerId,
    changes: Worker,
) -> Result<(), DirectoryError> {
    require_admin(session)?;
    if changes.first_name.trim().is_empty() || changes.last_name.trim().is_empty() {
        return Err(DirectoryError::EmptyName);
    }
    let worker = dir
        .data
        .workers
        .iter_mut()
        .find(|w| w.id == id)
        .ok_or(DirectoryError::UnknownWorker(id))?;
    worker.first_name = changes.first_name;
    worker.last_name = changes.last_name;
    worker.phone = changes.phone;
    worker.email = changes.email;
    worker.is_boss = changes.is_boss;
    info!(worker = %id, "worker updated");
    Ok(())
}

/// Supprime le membre et, en cascade, ses spécialités et disponibilités.
pub(super) fn remove_worker(
    dir: &mut Directory,
    session: &dyn Session,
    worker: WorkerId,
) -> Result<(), DirectoryError> {
    require_admin(session)?;
    dir.ensure_worker(worker)?;
    dir.data.workers.retain(|w| w.id != worker);
    dir.data.specialties.retain(|s| s.worker_id != worker);
    dir.data.availability.retain(|a| a.worker_id != worker);
    info!(worker = %worker, "worker removed");
    Ok(())
}

pub(super) fn add_availability(
    dir: &mut Directory,
    session: &dyn Session,
    worker: WorkerId,
    slot: SlotSpec,
) -> Result<AvailabilityId, DirectoryError> {
    require_self_or_admin(session, worker)?;
    dir.ensure_worker(worker)?;
    validate_slot(&slot)?;
    let id = dir.data.next_availability_id();
    dir.data.availability.push(to_row(id, worker, slot));
    info!(worker = %worker, availability = %id, rule = %slot.rule, "availability added");
    Ok(id)
}

pub(super) fn remove_availability(
    dir: &mut Directory,
    session: &dyn Session,
    id: AvailabilityId,
) -> Result<(), DirectoryError> {
    let owner = dir
        .data
        .find_availability(id)
        .map(|a| a.worker_id)
        .ok_or(DirectoryError::UnknownAvailability(id))?;
    require_self_or_admin(session, owner)?;
    dir.data.availability.retain(|a| a.id != id);
    info!(worker = %owner, availability = %id, "availability removed");
    Ok(())
}

pub(super) fn add_specialty(
    dir: &mut Directory,
    session: &dyn Session,
    worker: WorkerId,
    machine: MachineId,
) -> Result<SpecialtyId, DirectoryError> {
    require_admin(session)?;
    dir.ensure_worker(worker)?;
    if dir.data.find_machine(machine).is_none() {
        return Err(DirectoryError::UnknownMachine(machine));
    }
    if dir
        .data
        .specialties
        .iter()
        .any(|s| s.worker_id == worker && s.machine_id == machine)
    {
        return Err(DirectoryError::DuplicateSpecialty(worker, machine));
    }
    let id = dir.data.next_specialty_id();
    dir.data.specialties.push(Specialty {
        id,
        worker_id: worker,
        machine_id: machine,
    });
    info!(worker = %worker, machine = %machine, "specialty added");
    Ok(id)
}

pub(super) fn remove_specialty(
    dir: &mut Directory,
    session: &dyn Session,
    id: SpecialtyId,
) -> Result<(), DirectoryError> {
    require_admin(session)?;
    if dir.data.find_specialty(id).is_none() {
        return Err(DirectoryError::UnknownSpecialty(id));
    }
    dir.data.specialties.retain(|s| s.id != id);
    info!(specialty = %id, "specialty removed");
    Ok(())
}

/// Remplace spécialités et disponibilités d'un membre (supprimer puis réinsérer).
///
/// Tout est validé avant la première modification : en cas d'erreur les
/// données restent intactes.
pub(super) fn replace_schedule(
    dir: &mut Directory,
    session: &dyn Session,
    worker: WorkerId,
    machines: &[MachineId],
    slots: &[SlotSpec],
) -> Result<(), DirectoryError> {
    require_self_or_admin(session, worker)?;
    dir.ensure_worker(worker)?;
    if let Some(missing) = machines.iter().find(|m| dir.data.find_machine(**m).is_none()) {
        return Err(DirectoryError::UnknownMachine(*missing));
    }
    for slot in slots {
        validate_slot(slot)?;
    }

    let mut unique: Vec<MachineId> = machines.to_vec();
    unique.sort_unstable();
    unique.dedup();

    dir.data.specialties.retain(|s| s.worker_id != worker);
    dir.data.availability.retain(|a| a.worker_id != worker);

    for machine in unique {
        let id = dir.data.next_specialty_id();
        dir.data.specialties.push(Specialty {
            id,
            worker_id: worker,
            machine_id: machine,
        });
    }
    for slot in slots {
        let id = dir.data.next_availability_id();
        dir.data.availability.push(to_row(id, worker, *slot));
    }
    info!(worker = %worker, slots = slots.len(), "schedule replaced");
    Ok(())
}

fn validate_slot(slot: &SlotSpec) -> Result<(), DirectoryError> {
    if slot.end <= slot.start {
        return Err(DirectoryError::InvalidTimeRange);
    }
    if let AvailabilityRule::Range { from, to } = slot.rule {
        if to < from {
            return Err(DirectoryError::InvalidDateRange);
        }
    }
    Ok(())
}

fn to_row(id: AvailabilityId, worker: WorkerId, slot: SlotSpec) -> Availability {
    Availability {
        id,
        worker_id: worker,
        rule: slot.rule,
        start: slot.start,
        end: slot.end,
    }
}
