use nearbykaam_auth::{JwtClaims, Permission, Principal, Role};

/// Authenticated caller for a request (identity, role, admin permissions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    phone: String,
    role: Role,
    permissions: Vec<Permission>,
}

impl PrincipalContext {
    pub fn new(phone: String, role: Role, permissions: Vec<Permission>) -> Self {
        Self {
            phone,
            role,
            permissions,
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.phone.clone(), self.role).with_permissions(self.permissions.iter().copied())
    }
}

impl From<JwtClaims> for PrincipalContext {
    fn from(claims: JwtClaims) -> Self {
        Self::new(claims.sub, claims.role, claims.permissions)
    }
}
