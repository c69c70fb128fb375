use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::auth::models::AuthenticatedUser;
use crate::error::AppError;

/// Google publishes the secure-token signing keys at this well-known endpoint.
const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Verifies a bearer credential against the identity provider.
///
/// This trait allows injecting a fake verifier in tests.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify an ID token and return the authenticated principal.
    async fn verify_id_token(&self, token: &str) -> Result<AuthenticatedUser, AppError>;
}

/// The subset of the service-account JSON file the verifier needs.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseCredentials {
    /// The Firebase project id; pins the token audience and issuer.
    pub project_id: String,
}

impl FirebaseCredentials {
    /// Load credentials from a service-account JSON file on disk.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Cannot read credentials file '{}': {}", path, e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Internal(format!("Invalid credentials file '{}': {}", path, e)))
    }
}

/// Verifies Firebase ID tokens (RS256) against Google's published JWKS.
pub struct FirebaseTokenVerifier {
    http: reqwest::Client,
    project_id: String,
}

/// Claims carried by a Firebase ID token that this server cares about.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
}

impl FirebaseTokenVerifier {
    pub fn new(credentials: FirebaseCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: credentials.project_id,
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AppError> {
        self.http
            .get(JWKS_URL)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AppError::Auth(format!("JWKS fetch failed: {}", e)))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AppError::Auth(format!("JWKS fetch failed: {}", e)))
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify_id_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header =
            decode_header(token).map_err(|e| AppError::Auth(format!("Malformed token: {}", e)))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Token header has no key id".into()))?;

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks
            .find(&kid)
            .ok_or_else(|| AppError::Auth(format!("Unknown signing key '{}'", kid)))?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| AppError::Auth(format!("Unusable signing key: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);

        let data = decode::<IdTokenClaims>(token, &key, &validation)
            .map_err(|e| AppError::Auth(format!("Token rejected: {}", e)))?;

        let email = data
            .claims
            .email
            .ok_or_else(|| AppError::Auth("Token has no email claim".into()))?;

        Ok(AuthenticatedUser {
            user_id: data.claims.sub,
            email,
        })
    }
}
