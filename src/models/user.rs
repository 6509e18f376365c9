//! User model and related types.
//!
//! This module defines the [`User`] account, its [`Role`], and the
//! request-scoped [`Identity`] that handlers pass into access checks.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The role a user holds in the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages users and rates, comments on and edits any entry.
    Admin,
    /// Contract worker recording their own daily package counts.
    #[default]
    Worker,
}

impl Role {
    /// Returns the stored/wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Worker => "worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "worker" => Ok(Role::Worker),
            other => Err(LedgerError::validation(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// A ledger account.
///
/// # Example
///
/// ```
/// use courier_ledger::models::{Role, User};
/// use rust_decimal::Decimal;
///
/// let user = User {
///     id: 1,
///     name: "Ana Torres".to_string(),
///     email: "ana@example.com".to_string(),
///     password_hash: String::new(),
///     role: Role::Worker,
///     price_per_pkg: Decimal::new(150, 2),
///     super_rate: Decimal::new(115, 3),
/// };
/// assert!(!user.is_admin());
/// assert_eq!(user.identity().user_id, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Database identifier.
    pub id: i64,
    /// Display name, also used in invoice filenames.
    pub name: String,
    /// Unique login email, stored lowercased.
    pub email: String,
    /// bcrypt hash of the password.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Access role.
    pub role: Role,
    /// Amount paid per delivered package.
    pub price_per_pkg: Decimal,
    /// Superannuation rate as a fraction (0.115 = 11.5%).
    pub super_rate: Decimal,
}

impl User {
    /// Returns true if the user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns the request-scoped identity for this user.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// Who is making a request.
///
/// Built fresh for every request from the session and the stored user, then
/// handed explicitly to access checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The authenticated user's id.
    pub user_id: i64,
    /// The authenticated user's role at request time.
    pub role: Role,
}

/// Fields for creating a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email, already normalized.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Access role.
    pub role: Role,
    /// Amount paid per package.
    pub price_per_pkg: Decimal,
    /// Superannuation rate as a fraction.
    pub super_rate: Decimal,
}

/// Fields an administrator may change on an existing user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserRates {
    /// Access role.
    pub role: Role,
    /// Amount paid per package.
    pub price_per_pkg: Decimal,
    /// Superannuation rate as a fraction.
    pub super_rate: Decimal,
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
