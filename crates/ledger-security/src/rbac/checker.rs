//! Permission checks on an authenticated principal.

use ledger_core::{LedgerError, LedgerResult, Permission, Principal, PrincipalId};

/// Extension trait turning permission checks into `Forbidden` errors.
pub trait PrincipalExt {
    /// Requires a specific permission.
    fn require_permission(&self, permission: Permission) -> LedgerResult<()>;

    /// Requires the principal to own the row or to be an admin.
    fn require_owner_or_admin(&self, owner: PrincipalId) -> LedgerResult<()>;
}

impl PrincipalExt for Principal {
    fn require_permission(&self, permission: Permission) -> LedgerResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(LedgerError::Forbidden(format!(
                "Permission denied: {} is not allowed for role {}",
                permission, self.role
            )))
        }
    }

    fn require_owner_or_admin(&self, owner: PrincipalId) -> LedgerResult<()> {
        if self.owns_or_admin(owner) {
            Ok(())
        } else {
            Err(LedgerError::Forbidden(
                "You don't have permission to access this resource".to_string(),
            ))
        }
    }
}
