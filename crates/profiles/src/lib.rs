//! Accounts and profiles: the signed-in user, worker and employer profiles,
//! and the admin audit log.

pub mod employer;
pub mod log;
pub mod user;
pub mod worker;

pub use employer::{EmployerProfile, WageType};
pub use log::{AdminLogEntry, EntityType};
pub use user::User;
pub use worker::{WorkerProfile, WorkerResume};

use nearbykaam_core::{DomainError, DomainResult};

fn require_name(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

