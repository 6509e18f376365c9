//! Access control.
//!
//! Every handler that touches a protected resource asks [`check`] first,
//! passing the request's [`Identity`] explicitly. Admins may do anything;
//! workers may only touch their own entries and their own invoice.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Identity, Role};

/// Something a request wants to read or change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A daily entry (view or edit), owned by `owner_id`.
    Entry {
        /// The worker who owns the entry.
        owner_id: i64,
    },
    /// The admin-only comment field of an entry.
    EntryComment,
    /// The user list and user create/update operations.
    UserDirectory,
    /// An invoice (preview, JSON or PDF) for `worker_id`.
    Invoice {
        /// The worker being invoiced.
        worker_id: i64,
    },
}

/// The outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed.
    Allow,
    /// The request must be rejected; carries the reason.
    Deny(&'static str),
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decides whether `identity` may access `resource`.
///
/// # Example
///
/// ```
/// use courier_ledger::access::{check, Decision, Resource};
/// use courier_ledger::models::{Identity, Role};
///
/// let worker = Identity { user_id: 2, role: Role::Worker };
/// assert_eq!(check(&worker, Resource::Entry { owner_id: 2 }), Decision::Allow);
/// assert!(!check(&worker, Resource::Entry { owner_id: 3 }).is_allowed());
/// ```
pub fn check(identity: &Identity, resource: Resource) -> Decision {
    if identity.role == Role::Admin {
        return Decision::Allow;
    }

    match resource {
        Resource::Entry { owner_id } if owner_id == identity.user_id => Decision::Allow,
        Resource::Entry { .. } => Decision::Deny("entry belongs to another worker"),
        Resource::Invoice { worker_id } if worker_id == identity.user_id => Decision::Allow,
        Resource::Invoice { .. } => Decision::Deny("invoice belongs to another worker"),
        Resource::EntryComment => Decision::Deny("only administrators may comment"),
        Resource::UserDirectory => Decision::Deny("only administrators may manage users"),
    }
}

/// Like [`check`], but turns a denial into [`LedgerError::Forbidden`].
pub fn require(identity: &Identity, resource: Resource) -> LedgerResult<()> {
    match check(identity, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::warn!(
                user_id = identity.user_id,
                role = %identity.role,
                ?resource,
                reason,
                "Access denied"
            );
            Err(LedgerError::forbidden(reason))
        }
    }
}
