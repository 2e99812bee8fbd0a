//! JWT claims structure.

use chrono::{DateTime, Utc};
use ledger_core::{Principal, PrincipalId, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a ledger access token.
///
/// The credential service signs `{ id, role, iat, exp }`. `sub`, `iss`, `aud`
/// and `jti` are optional; the principal comes from `id`, then `sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal ID as a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Subject: the principal ID as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    pub role: Role,

    /// Issued at (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration (unix seconds).
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Unique token ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Creates claims for `principal` expiring at `expires_at`.
    #[must_use]
    pub fn for_principal(
        principal: &Principal,
        issuer: Option<&str>,
        audience: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(principal.id.0),
            sub: Some(principal.id.to_string()),
            role: principal.role,
            iat: Some(Utc::now().timestamp()),
            exp: expires_at.timestamp(),
            iss: issuer.map(str::to_string),
            aud: audience.map(str::to_string),
            jti: Some(Uuid::now_v7().to_string()),
        }
    }

    /// The principal ID, from `id` or else a numeric `sub`.
    #[must_use]
    pub fn principal_id(&self) -> Option<PrincipalId> {
        self.id
            .map(PrincipalId)
            .or_else(|| self.sub.as_deref()?.parse().ok())
    }

    /// Returns the principal these claims describe, if the ID is well-formed.
    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        self.principal_id().map(|id| Principal::new(id, self.role))
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}
