use std::collections::HashSet;

use thiserror::Error;

use crate::{JwtClaims, Permission, Role};

/// A resolved caller for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Normalized mobile number.
    pub phone: String,
    pub role: Role,
    pub permissions: HashSet<Permission>,
}

impl Principal {
    pub fn new(phone: impl Into<String>, role: Role) -> Self {
        Self {
            phone: phone.into(),
            role,
            permissions: HashSet::new(),
        }
    }

    pub fn with_permissions(mut self, perms: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(perms);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&JwtClaims> for Principal {
    fn from(claims: &JwtClaims) -> Self {
        Principal::new(claims.sub.clone(), claims.role)
            .with_permissions(claims.permissions.iter().copied())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires role '{0}'")]
    WrongRole(Role),

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),

    /// Admin token whose account is missing from the roster or blocked.
    #[error("forbidden: admin account is not active")]
    InactiveAdmin,
}

/// Require an admin principal holding `required` (or `FULL_ACCESS`).
///
/// Pure policy check: no IO, no panics.
pub fn authorize(principal: &Principal, required: Permission) -> Result<(), AuthzError> {
    require_role(principal, Role::Admin)?;
    if principal.permissions.contains(&Permission::FullAccess)
        || principal.permissions.contains(&required)
    {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required))
    }
}

pub fn require_role(principal: &Principal, role: Role) -> Result<(), AuthzError> {
    if principal.role == role {
        Ok(())
    } else {
        Err(AuthzError::WrongRole(role))
    }
}
