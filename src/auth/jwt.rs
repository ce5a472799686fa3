use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, Authenticator, Principal, PrincipalSource};
use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// String or array, depending on the issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    pub fn new(
        subject: impl Into<String>,
        roles: Vec<String>,
        config: &SecurityConfig,
    ) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = i64::try_from(config.jwt_expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::NotConfigured(format!(
                    "token lifetime of {} hours is out of range",
                    config.jwt_expiry_hours
                ))
            })?
            .timestamp();

        Ok(Self {
            sub: subject.into(),
            exp,
            iat: now.timestamp(),
            iss: config.jwt_issuer.clone(),
            aud: config.jwt_audience.clone().map(serde_json::Value::String),
            roles,
        })
    }
}

/// Mint an HS256 token with the configured shared secret.
pub fn issue_token(config: &SecurityConfig, subject: &str, roles: Vec<String>) -> Result<String, AuthError> {
    if config.jwt_secret.is_empty() {
        return Err(AuthError::NotConfigured("JWT secret not configured".to_string()));
    }

    let claims = Claims::new(subject, roles, config)?;
    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::NotConfigured(format!("JWT generation error: {}", e)))
}

/// Validates `Authorization: Bearer <jwt>` against the issuer's key.
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtAuthenticator {
    /// RS256 when an issuer public key is configured, otherwise HS256 with the
    /// shared secret. An empty secret leaves the authenticator unable to
    /// accept any token.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AuthError> {
        let (algorithm, decoding_key) = match &config.jwt_public_key_pem {
            Some(pem) => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::NotConfigured(format!("invalid issuer public key: {}", e)))?;
                (Algorithm::RS256, Some(key))
            }
            None if config.jwt_secret.is_empty() => (Algorithm::HS256, None),
            None => (
                Algorithm::HS256,
                Some(DecodingKey::from_secret(config.jwt_secret.as_bytes())),
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.jwt_leeway_secs;
        let mut required = vec!["exp", "sub"];
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &config.jwt_audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(required.as_slice());

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AuthError::NotConfigured("JWT secret not configured".to_string()))?;

        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Token from the Authorization header, or `None` if there is no header.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("not valid ASCII".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidHeader("must use Bearer token format".to_string()))?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidHeader("empty bearer token".to_string()));
    }
    Ok(Some(token))
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Principal>, AuthError> {
        let Some(token) = bearer_token(headers)? else {
            return Ok(None);
        };
        let claims = self.validate(token)?;

        Ok(Some(Principal {
            name: claims.sub,
            source: PrincipalSource::BearerToken,
            roles: claims.roles,
        }))
    }
}
