use crate::model::{Dataset, WorkerId};
use thiserror::Error;

/// Utilisateur courant tel que vu par le service de session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentUser {
    Anonymous,
    Authenticated { id: WorkerId, is_admin: bool },
}

impl CurrentUser {
    /// Relit le drapeau admin dans les données à chaque requête ; un id inconnu
    /// retombe sur `Anonymous`.
    pub fn refresh(dataset: &Dataset, id: Option<WorkerId>) -> Self {
        id.and_then(|id| dataset.find_worker(id))
            .map(|w| CurrentUser::Authenticated {
                id: w.id,
                is_admin: w.is_admin,
            })
            .unwrap_or(CurrentUser::Anonymous)
    }
}

/// Capacité fournie par le service d'authentification externe.
pub trait Session {
    fn current_user(&self) -> CurrentUser;
}

impl Session for CurrentUser {
    fn current_user(&self) -> CurrentUser {
        *self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
}

pub fn require_admin(session: &dyn Session) -> Result<WorkerId, AccessError> {
    match session.current_user() {
        CurrentUser::Authenticated { id, is_admin: true } => Ok(id),
        CurrentUser::Authenticated { .. } => Err(AccessError::Forbidden("admin only")),
        CurrentUser::Anonymous => Err(AccessError::Unauthenticated),
    }
}

/// Autorise l'admin, ou le membre agissant sur ses propres données.
pub fn require_self_or_admin(session: &dyn Session, worker: WorkerId) -> Result<WorkerId, AccessError> {
    match session.current_user() {
        CurrentUser::Authenticated { id, is_admin } if is_admin || id == worker => Ok(id),
        CurrentUser::Authenticated { .. } => Err(AccessError::Forbidden("not your record")),
        CurrentUser::Anonymous => Err(AccessError::Unauthenticated),
    }
}
