//! OIDC session validator.
//!
//! Validates bearer JWTs issued by the external identity provider:
//!
//! 1. Fetch the provider's JWKS (`{issuer}/.well-known/jwks.json`), cached
//! 2. Verify the signature with the key named by the token's `kid`
//! 3. Validate issuer, audience and expiry
//! 4. Map `sub`, `email` and `name` to `AuthenticatedUser`
//!
//! An unknown `kid` triggers one JWKS refetch so key rotation does not lock
//! users out until the cache expires.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

const DEFAULT_JWKS_CACHE: Duration = Duration::from_secs(3600);
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the OIDC adapter.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Issuer URL. Used for JWKS discovery and `iss` validation.
    pub issuer_url: String,

    /// Expected `aud` claim.
    pub audience: String,

    /// How long to cache JWKS before refetching. Defaults to 1 hour.
    pub jwks_cache_duration: Option<Duration>,
}

impl OidcConfig {
    pub fn new(issuer_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience: audience.into(),
            jwks_cache_duration: None,
        }
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = Some(duration);
        self
    }

    fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OidcClaims {
    sub: String,
    iss: String,
    #[serde(default)]
    aud: Audience,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    ttl: Duration,
}

impl JwksCache {
    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.ttl
    }
}

/// Production `SessionValidator` backed by the provider's JWKS.
pub struct OidcSessionValidator {
    config: OidcConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl std::fmt::Debug for OidcSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish()
    }
}

impl OidcSessionValidator {
    /// Creates the validator. Keys are fetched lazily on first use.
    pub fn new(config: OidcConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        tracing::debug!(%url, "Fetching JWKS");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch JWKS");
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "JWKS endpoint returned an error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS");
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        let ttl = self.config.jwks_cache_duration.unwrap_or(DEFAULT_JWKS_CACHE);
        *self.jwks_cache.write().await = Some(JwksCache {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
            ttl,
        });

        tracing::debug!(keys = jwks.keys.len(), "Fetched JWKS");
        Ok(jwks)
    }

    /// Returns cached keys, or fetches when the cache is empty or stale.
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }
        self.fetch_jwks().await
    }

    fn validate_token(
        &self,
        token: &str,
        decoding_key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<TokenData<OidcClaims>, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer_url]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);

        decode::<OidcClaims>(token, decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::warn!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            }
        })
    }

    fn claims_to_user(&self, claims: OidcClaims) -> Result<AuthenticatedUser, AuthError> {
        if claims.iss != self.config.issuer_url || !claims.aud.contains(&self.config.audience) {
            tracing::warn!(iss = %claims.iss, "Issuer or audience mismatch");
            return Err(AuthError::InvalidToken);
        }

        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                tracing::warn!(sub = %claims.sub, "Token missing email claim");
                AuthError::InvalidToken
            })?;

        let user_id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(
            user_id,
            email,
            claims.name.or(claims.preferred_username),
        ))
    }
}

/// Picks the decoding key and algorithm for `kid` from a key set.
fn find_decoding_key(kid: &str, jwks: &JwkSet) -> Option<Result<(DecodingKey, Algorithm), AuthError>> {
    use jsonwebtoken::jwk::KeyAlgorithm;

    let jwk = jwks.find(kid)?;
    let algorithm = match jwk.common.key_algorithm {
        Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
        Some(KeyAlgorithm::RS384) => Algorithm::RS384,
        Some(KeyAlgorithm::RS512) => Algorithm::RS512,
        Some(KeyAlgorithm::ES256) => Algorithm::ES256,
        Some(KeyAlgorithm::ES384) => Algorithm::ES384,
        Some(other) => {
            tracing::warn!(?other, "Unsupported JWK algorithm");
            return Some(Err(AuthError::InvalidToken));
        }
    };

    Some(
        DecodingKey::from_jwk(jwk)
            .map(|key| (key, algorithm))
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to build decoding key");
                AuthError::InvalidToken
            }),
    )
}

#[async_trait]
impl SessionValidator for OidcSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let kid = header.kid.ok_or_else(|| {
            tracing::warn!("JWT missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks().await?;
        let found = match find_decoding_key(&kid, &jwks) {
            Some(found) => found,
            None => {
                let refreshed = self.fetch_jwks().await?;
                find_decoding_key(&kid, &refreshed).ok_or_else(|| {
                    tracing::warn!(%kid, "No matching key in JWKS");
                    AuthError::InvalidToken
                })?
            }
        };
        let (decoding_key, algorithm) = found?;

        let token_data = self.validate_token(token, &decoding_key, algorithm)?;
        self.claims_to_user(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const ISSUER: &str = "https://auth.example.com";
    const AUDIENCE: &str = "subscription-api";
    const SECRET: &[u8] = b"test-signing-secret";

    fn validator() -> OidcSessionValidator {
        OidcSessionValidator::new(OidcConfig::new(ISSUER, AUDIENCE)).unwrap()
    }

    fn claims(exp_offset: i64) -> serde_json::Value {
        serde_json::json!({
            "sub": "user-42",
            "iss": ISSUER,
            "aud": [AUDIENCE, "other"],
            "exp": chrono::Utc::now().timestamp() + exp_offset,
            "email": "ada@example.com",
            "preferred_username": "ada"
        })
    }

    fn sign(claims: &serde_json::Value) -> String {
        encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn check(token: &str) -> Result<AuthenticatedUser, AuthError> {
        let v = validator();
        let data = v.validate_token(token, &DecodingKey::from_secret(SECRET), Algorithm::HS256)?;
        v.claims_to_user(data.claims)
    }

    #[test]
    fn jwks_url_is_derived_from_issuer() {
        let config = OidcConfig::new("https://auth.example.com/", AUDIENCE);
        assert_eq!(config.jwks_url(), "https://auth.example.com/.well-known/jwks.json");
    }

    #[test]
    fn valid_token_maps_to_user() {
        let user = check(&sign(&claims(600))).unwrap();

        assert_eq!(user.id.as_str(), "user-42");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.display_name.as_deref(), Some("ada"));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        assert_eq!(check(&sign(&claims(-600))), Err(AuthError::TokenExpired));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let mut c = claims(600);
        c["aud"] = serde_json::json!("someone-else");
        assert_eq!(check(&sign(&c)), Err(AuthError::InvalidToken));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut c = claims(600);
        c["iss"] = serde_json::json!("https://evil.example.com");
        assert_eq!(check(&sign(&c)), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_without_email_is_rejected() {
        let mut c = claims(600);
        c.as_object_mut().unwrap().remove("email");
        assert_eq!(check(&sign(&c)), Err(AuthError::InvalidToken));
    }

    #[test]
    fn audience_contains_handles_all_shapes() {
        assert!(!Audience::None.contains(AUDIENCE));
        assert!(Audience::Single(AUDIENCE.into()).contains(AUDIENCE));
        assert!(Audience::Multiple(vec!["x".into(), AUDIENCE.into()]).contains(AUDIENCE));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_without_network() {
        assert_eq!(validator().validate("not-a-jwt").await, Err(AuthError::InvalidToken));
    }
}
