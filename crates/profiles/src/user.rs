use serde::{Deserialize, Serialize};

use nearbykaam_auth::{Permission, Principal, Role};

use crate::{EmployerProfile, WorkerProfile};

/// Account record keyed by phone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub phone: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_completed: bool,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub is_shadow_banned: bool,
    #[serde(default)]
    pub state_assignment: Vec<String>,
    #[serde(default)]
    pub city_assignment: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_profile: Option<WorkerProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_profile: Option<EmployerProfile>,
}

impl User {
    pub fn new(phone: impl Into<String>, role: Role) -> Self {
        Self {
            phone: phone.into(),
            role,
            name: None,
            profile_completed: false,
            is_blocked: false,
            is_shadow_banned: false,
            state_assignment: Vec::new(),
            city_assignment: Vec::new(),
            permissions: Vec::new(),
            worker_profile: None,
            employer_profile: None,
        }
    }

    pub fn attach_worker_profile(&mut self, profile: WorkerProfile) {
        self.name = Some(profile.name.clone());
        self.worker_profile = Some(profile);
        self.profile_completed = true;
    }

    pub fn attach_employer_profile(&mut self, profile: EmployerProfile) {
        self.name = Some(profile.first_name.clone());
        self.employer_profile = Some(profile);
        self.profile_completed = true;
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.phone.clone(), self.role).with_permissions(self.permissions.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn attaching_a_profile_completes_the_account() {
        let mut u = User::new("9876543210", Role::Employer);
        assert!(!u.profile_completed);

        let mut p = EmployerProfile::empty("9876543210", Utc::now());
        p.first_name = "Meena".into();
        u.attach_employer_profile(p);

        assert!(u.profile_completed);
        assert_eq!(u.name.as_deref(), Some("Meena"));
    }

    #[test]
    fn principal_carries_permissions() {
        let mut u = User::new("9000000000", Role::Admin);
        u.permissions = vec![Permission::SafetyReports];
        let p = u.principal();
        assert!(p.is_admin());
        assert!(p.permissions.contains(&Permission::SafetyReports));
    }
}
