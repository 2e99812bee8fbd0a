//! Bearer-token verification.

use super::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ledger_config::SecurityConfig;
use ledger_core::{LedgerError, LedgerResult, Principal};
use std::sync::Arc;
use tracing::{debug, warn};

/// Verifies HS256 bearer tokens and yields the authenticated [`Principal`].
///
/// Tokens are issued by the credential service; [`TokenVerifier::issue_token`]
/// exists for local tooling and tests and signs with the same key.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        let mut required = vec!["exp"];
        if let Some(issuer) = config.issuer() {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match config.audience() {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(required.as_slice());
        validation.leeway = config.jwt_leeway_secs;
        validation.validate_exp = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Authenticates a raw bearer token.
    pub fn authenticate(&self, token: &str) -> LedgerResult<Principal> {
        let claims = self.validate_token(token)?;
        claims
            .principal()
            .ok_or_else(|| LedgerError::InvalidToken("Token does not carry a principal ID".to_string()))
    }

    /// Authenticates an `Authorization` header value (`Bearer <token>`).
    pub fn authenticate_header(&self, header: Option<&str>) -> LedgerResult<Principal> {
        let header = header.ok_or_else(|| LedgerError::unauthorized("Missing authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LedgerError::unauthorized("Invalid authorization header format"))?;
        self.authenticate(token)
    }

    /// Decodes and validates a token.
    pub fn validate_token(&self, token: &str) -> LedgerResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => LedgerError::TokenExpired,
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                    LedgerError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => LedgerError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => {
                    LedgerError::InvalidToken("Invalid token audience".to_string())
                }
                _ => LedgerError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Signs an access token for `principal`.
    pub fn issue_token(&self, principal: &Principal) -> LedgerResult<String> {
        let lifetime = i64::try_from(self.config.jwt_access_expiration_secs).unwrap_or(i64::MAX / 2);
        let claims = Claims::for_principal(
            principal,
            self.config.issuer(),
            self.config.audience(),
            Utc::now() + Duration::seconds(lifetime),
        );
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| LedgerError::Internal(format!("Failed to sign token: {}", e)))?;

        debug!(principal = %principal.id, role = %principal.role, "Issued access token");
        Ok(token)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("issuer", &self.config.issuer())
            .field("audience", &self.config.audience())
            .finish_non_exhaustive()
    }
}
