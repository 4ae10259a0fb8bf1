//! Access-control policies evaluated per request.
//!
//! A policy is a pure predicate over the kind of operation, the optional
//! authenticated principal, and (for object-level checks) the owner of the
//! target row. Handlers call [`enforce`] / [`enforce_object`] so that a
//! missing principal yields `Unauthorized` and an insufficient one yields
//! `Forbidden`.

use crate::error::CoreError;
use crate::roles::is_admin;
use crate::types::DbId;

/// Whether a request only reads state or mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    /// Classify an HTTP method name. `GET`, `HEAD` and `OPTIONS` are reads.
    pub fn from_method(method: &str) -> Self {
        match method {
            "GET" | "HEAD" | "OPTIONS" => Operation::Read,
            _ => Operation::Write,
        }
    }
}

/// The authenticated requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub role: String,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        is_admin(&self.role)
    }
}

pub trait PermissionPolicy {
    /// Request-level check, before any row is loaded.
    fn has_permission(&self, op: Operation, principal: Option<&Principal>) -> bool;

    /// Object-level check against the owner of the target row.
    fn has_object_permission(
        &self,
        op: Operation,
        principal: Option<&Principal>,
        owner_id: DbId,
    ) -> bool {
        let _ = owner_id;
        self.has_permission(op, principal)
    }
}

/// Read open to everyone; writes only by the owner or an admin.
#[derive(Debug, Clone, Copy)]
pub struct OwnerOrAdmin;

impl PermissionPolicy for OwnerOrAdmin {
    fn has_permission(&self, op: Operation, principal: Option<&Principal>) -> bool {
        op == Operation::Read || principal.is_some()
    }

    fn has_object_permission(
        &self,
        op: Operation,
        principal: Option<&Principal>,
        owner_id: DbId,
    ) -> bool {
        if op == Operation::Read {
            return true;
        }
        principal.is_some_and(|p| p.user_id == owner_id || p.is_admin())
    }
}

/// Read open to everyone; writes by any authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedForWrite;

impl PermissionPolicy for AuthenticatedForWrite {
    fn has_permission(&self, op: Operation, principal: Option<&Principal>) -> bool {
        op == Operation::Read || principal.is_some()
    }
}

/// Every operation requires the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminOnly;

impl PermissionPolicy for AdminOnly {
    fn has_permission(&self, _op: Operation, principal: Option<&Principal>) -> bool {
        principal.is_some_and(Principal::is_admin)
    }
}

/// Apply the request-level check of `policy`.
pub fn enforce<P: PermissionPolicy>(
    policy: &P,
    op: Operation,
    principal: Option<&Principal>,
) -> Result<(), CoreError> {
    if policy.has_permission(op, principal) {
        return Ok(());
    }
    Err(denial(principal))
}

/// Apply both the request-level and object-level checks of `policy`.
pub fn enforce_object<P: PermissionPolicy>(
    policy: &P,
    op: Operation,
    principal: Option<&Principal>,
    owner_id: DbId,
) -> Result<(), CoreError> {
    enforce(policy, op, principal)?;
    if policy.has_object_permission(op, principal, owner_id) {
        return Ok(());
    }
    Err(denial(principal))
}

fn denial(principal: Option<&Principal>) -> CoreError {
    match principal {
        None => CoreError::Unauthorized("Authentication credentials were not provided".into()),
        Some(_) => {
            CoreError::Forbidden("You do not have permission to perform this action".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_USER};

    fn user(id: DbId) -> Principal {
        Principal {
            user_id: id,
            role: ROLE_USER.to_string(),
        }
    }

    fn admin(id: DbId) -> Principal {
        Principal {
            user_id: id,
            role: ROLE_ADMIN.to_string(),
        }
    }

    #[test]
    fn method_classification() {
        assert_eq!(Operation::from_method("GET"), Operation::Read);
        assert_eq!(Operation::from_method("HEAD"), Operation::Read);
        assert_eq!(Operation::from_method("OPTIONS"), Operation::Read);
        assert_eq!(Operation::from_method("PATCH"), Operation::Write);
        assert_eq!(Operation::from_method("DELETE"), Operation::Write);
    }

    #[test]
    fn owner_or_admin_reads_are_public() {
        assert!(OwnerOrAdmin.has_permission(Operation::Read, None));
        assert!(OwnerOrAdmin.has_object_permission(Operation::Read, None, 7));
    }

    #[test]
    fn owner_or_admin_write_rules() {
        let owner = user(7);
        let stranger = user(8);
        let root = admin(1);

        assert!(!OwnerOrAdmin.has_permission(Operation::Write, None));
        assert!(OwnerOrAdmin.has_object_permission(Operation::Write, Some(&owner), 7));
        assert!(!OwnerOrAdmin.has_object_permission(Operation::Write, Some(&stranger), 7));
        assert!(OwnerOrAdmin.has_object_permission(Operation::Write, Some(&root), 7));
    }

    #[test]
    fn authenticated_for_write_rules() {
        assert!(AuthenticatedForWrite.has_permission(Operation::Read, None));
        assert!(!AuthenticatedForWrite.has_permission(Operation::Write, None));
        assert!(AuthenticatedForWrite.has_permission(Operation::Write, Some(&user(3))));
        // No object-level restriction.
        assert!(AuthenticatedForWrite.has_object_permission(
            Operation::Write,
            Some(&user(3)),
            99
        ));
    }

    #[test]
    fn admin_only_rules() {
        assert!(!AdminOnly.has_permission(Operation::Read, None));
        assert!(!AdminOnly.has_permission(Operation::Read, Some(&user(2))));
        assert!(AdminOnly.has_permission(Operation::Write, Some(&admin(1))));
        assert!(AdminOnly.has_object_permission(Operation::Write, Some(&admin(1)), 2));
    }

    #[test]
    fn enforce_distinguishes_anonymous_from_forbidden() {
        assert_matches!(
            enforce(&AdminOnly, Operation::Read, None),
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            enforce(&AdminOnly, Operation::Read, Some(&user(2))),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            enforce_object(&OwnerOrAdmin, Operation::Write, Some(&user(2)), 5),
            Err(CoreError::Forbidden(_))
        );
        assert!(enforce_object(&OwnerOrAdmin, Operation::Write, Some(&user(5)), 5).is_ok());
    }
}
