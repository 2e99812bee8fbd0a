//! Authenticated principals and their roles.

use crate::PrincipalId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Sees and manages the whole ledger.
    Admin,
    /// Manages their own transactions.
    #[default]
    User,
    /// Sees their own transactions and analytics, cannot write.
    ReadOnly,
}

impl Role {
    /// Returns true if the role sees every principal's rows.
    #[must_use]
    pub const fn sees_whole_ledger(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns all available roles.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Admin, Self::User, Self::ReadOnly]
    }

    /// Parses a role from its wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            "read-only" | "read_only" | "readonly" => Some(Self::ReadOnly),
            _ => None,
        }
    }

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::ReadOnly => "read-only",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission types for RBAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    TransactionRead,
    TransactionWrite,
    AnalyticsRead,
}

impl Permission {
    /// Checks if the given role has this permission.
    #[must_use]
    pub const fn is_allowed_for(&self, role: Role) -> bool {
        match self {
            Self::TransactionRead | Self::AnalyticsRead => true,
            Self::TransactionWrite => matches!(role, Role::Admin | Role::User),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransactionRead => write!(f, "transaction:read"),
            Self::TransactionWrite => write!(f, "transaction:write"),
            Self::AnalyticsRead => write!(f, "analytics:read"),
        }
    }
}

/// The authenticated identity making a request.
///
/// Produced by the token verifier and immutable for the lifetime of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: PrincipalId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true if this principal holds the permission.
    #[must_use]
    pub const fn can(&self, permission: Permission) -> bool {
        permission.is_allowed_for(self.role)
    }

    /// Returns true if this principal may touch a row owned by `owner`.
    #[must_use]
    pub fn owns_or_admin(&self, owner: PrincipalId) -> bool {
        self.role.sees_whole_ledger() || self.id == owner
    }
}
