//! API-side authorization guards, checked before a command is executed.

use nearbykaam_auth::{AuthzError, Permission, Role, authorize, require_role};
use nearbykaam_profiles::User;

use crate::context::PrincipalContext;

/// Admin holding `required` (or `FULL_ACCESS`).
pub fn authorize_admin(principal: &PrincipalContext, required: Permission) -> Result<(), AuthzError> {
    authorize(&principal.principal(), required)
}

pub fn require(principal: &PrincipalContext, role: Role) -> Result<(), AuthzError> {
    require_role(&principal.principal(), role)
}

/// Resolve an admin token against the stored roster.
///
/// The roster is authoritative: permissions come from the stored record, not
/// the token, and a missing or blocked entry is rejected.
pub fn resolve_admin(
    principal: &PrincipalContext,
    roster_entry: Option<User>,
) -> Result<PrincipalContext, AuthzError> {
    require(principal, Role::Admin)?;
    match roster_entry {
        Some(admin) if admin.role == Role::Admin && !admin.is_blocked => Ok(PrincipalContext::new(
            principal.phone().to_string(),
            Role::Admin,
            admin.permissions,
        )),
        _ => Err(AuthzError::InactiveAdmin),
    }
}
