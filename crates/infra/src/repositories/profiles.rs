use std::sync::Arc;

use nearbykaam_profiles::{EmployerProfile, User, WorkerProfile};

use super::{RepositoryResult, load, save};
use crate::store::{KeyValueStore, keys};

/// Accounts, worker/employer profiles and the admin roster, keyed by phone.
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn user(&self, phone: &str) -> RepositoryResult<Option<User>> {
        load(self.store.as_ref(), &keys::scoped(keys::USER, phone))
    }

    pub fn save_user(&self, user: &User) -> RepositoryResult<()> {
        save(self.store.as_ref(), &keys::scoped(keys::USER, &user.phone), user)
    }

    pub fn worker(&self, phone: &str) -> RepositoryResult<Option<WorkerProfile>> {
        load(self.store.as_ref(), &keys::scoped(keys::WORKER_PROFILE, phone))
    }

    pub fn save_worker(&self, profile: &WorkerProfile) -> RepositoryResult<()> {
        save(
            self.store.as_ref(),
            &keys::scoped(keys::WORKER_PROFILE, &profile.phone),
            profile,
        )
    }

    pub fn employer(&self, phone: &str) -> RepositoryResult<Option<EmployerProfile>> {
        load(self.store.as_ref(), &keys::scoped(keys::EMPLOYER_PROFILE, phone))
    }

    pub fn save_employer(&self, profile: &EmployerProfile) -> RepositoryResult<()> {
        save(
            self.store.as_ref(),
            &keys::scoped(keys::EMPLOYER_PROFILE, &profile.phone),
            profile,
        )
    }

    /// Every registered worker profile.
    pub fn workers(&self) -> RepositoryResult<Vec<WorkerProfile>> {
        let prefix = format!("{}_", keys::WORKER_PROFILE);
        let mut out = Vec::new();
        for key in self.store.keys()? {
            if key.starts_with(&prefix) {
                if let Some(p) = load(self.store.as_ref(), &key)? {
                    out.push(p);
                }
            }
        }
        Ok(out)
    }

    pub fn managed_admins(&self) -> RepositoryResult<Vec<User>> {
        Ok(load(self.store.as_ref(), keys::MANAGED_ADMINS)?.unwrap_or_default())
    }

    /// Roster entry for `phone`, if any.
    pub fn managed_admin(&self, phone: &str) -> RepositoryResult<Option<User>> {
        Ok(self.managed_admins()?.into_iter().find(|a| a.phone == phone))
    }

    /// Insert or replace an admin by phone.
    pub fn upsert_managed_admin(&self, admin: User) -> RepositoryResult<()> {
        let mut admins = self.managed_admins()?;
        match admins.iter_mut().find(|a| a.phone == admin.phone) {
            Some(existing) => *existing = admin,
            None => admins.push(admin),
        }
        save(self.store.as_ref(), keys::MANAGED_ADMINS, &admins)
    }

    /// Display name for an admin, falling back to the phone.
    pub fn admin_name(&self, phone: &str) -> RepositoryResult<String> {
        Ok(self
            .managed_admins()?
            .into_iter()
            .find(|a| a.phone == phone)
            .and_then(|a| a.name)
            .unwrap_or_else(|| phone.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use chrono::Utc;
    use nearbykaam_auth::{Permission, Role};
    use nearbykaam_jobs::JobCategory;
    use nearbykaam_profiles::WorkerResume;

    fn repo() -> ProfileRepository {
        ProfileRepository::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn profiles_are_keyed_by_phone() {
        let r = repo();
        let mut e = EmployerProfile::empty("9876543210", Utc::now());
        e.first_name = "Suresh".into();
        r.save_employer(&e).unwrap();

        assert_eq!(r.employer("9876543210").unwrap(), Some(e));
        assert_eq!(r.employer("9123456789").unwrap(), None);
    }

    #[test]
    fn lists_workers() {
        let r = repo();
        for phone in ["9000000001", "9000000002"] {
            r.save_worker(&WorkerProfile {
                name: "W".into(),
                phone: phone.into(),
                email: None,
                job_type: JobCategory::Security,
                preferred_job_title: "Guard".into(),
                expected_salary: None,
                expected_salary_type: None,
                location: None,
                resume: WorkerResume::default(),
                created_at: Utc::now(),
            })
            .unwrap();
        }
        assert_eq!(r.workers().unwrap().len(), 2);
    }

    #[test]
    fn admin_roster_upserts_and_names() {
        let r = repo();
        let mut admin = User::new("9999999999", Role::Admin);
        admin.permissions = vec![Permission::FullAccess];
        r.upsert_managed_admin(admin.clone()).unwrap();
        assert_eq!(r.admin_name("9999999999").unwrap(), "9999999999");

        admin.name = Some("Super Admin".into());
        r.upsert_managed_admin(admin).unwrap();
        assert_eq!(r.managed_admins().unwrap().len(), 1);
        assert_eq!(r.admin_name("9999999999").unwrap(), "Super Admin");
    }

    #[test]
    fn roster_lookup_by_phone() {
        let r = repo();
        let mut admin = User::new("9000000005", Role::Admin);
        admin.permissions = vec![Permission::SafetyReports];
        r.upsert_managed_admin(admin.clone()).unwrap();

        assert_eq!(r.managed_admin("9000000005").unwrap(), Some(admin));
        assert_eq!(r.managed_admin("9000000006").unwrap(), None);
    }
}
