use serde::{Deserialize, Serialize};

/// Admin permission.
///
/// `FullAccess` acts as a wildcard and satisfies every other permission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    FullAccess,
    JobModeration,
    EmployerVerification,
    SafetyReports,
    UserManagement,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::FullAccess => "FULL_ACCESS",
            Permission::JobModeration => "JOB_MODERATION",
            Permission::EmployerVerification => "EMPLOYER_VERIFICATION",
            Permission::SafetyReports => "SAFETY_REPORTS",
            Permission::UserManagement => "USER_MANAGEMENT",
        }
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Permission::FullAccess
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
