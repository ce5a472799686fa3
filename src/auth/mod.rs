//! Request authentication.
//!
//! Callers prove their identity either with a client certificate, whose
//! subject the TLS terminator forwards in a header, or with a bearer JWT from
//! the token issuer. Each mechanism is an [`Authenticator`]; an [`AuthChain`]
//! tries them in order and the first one that recognises the request decides.

pub mod certificate;
pub mod jwt;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::Serialize;
use thiserror::Error;

use crate::config::SecurityConfig;

pub use certificate::{common_name, CertificateAuthenticator};
pub use jwt::{issue_token, Claims, JwtAuthenticator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalSource {
    Certificate,
    BearerToken,
    /// Authentication disabled or path is public.
    Anonymous,
}

/// Authenticated identity attached to each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub name: String,
    pub source: PrincipalSource,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self {
            name: "anonymous".to_string(),
            source: PrincipalSource::Anonymous,
            roles: Vec::new(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Full authentication is required to access this resource")]
    MissingCredentials,

    #[error("Invalid Authorization header: {0}")]
    InvalidHeader(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Invalid client certificate: {0}")]
    InvalidCertificate(String),

    #[error("Authentication not configured: {0}")]
    NotConfigured(String),
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the request carries no credentials of this kind and
    /// the next authenticator should be tried. `Err` means credentials were
    /// presented and rejected.
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Principal>, AuthError>;
}

#[derive(Clone, Default)]
pub struct AuthChain {
    authenticators: Vec<Arc<dyn Authenticator>>,
}

impl AuthChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticators.push(Arc::new(authenticator));
        self
    }

    /// Certificate first (when the forwarded header is trusted), then bearer token.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AuthError> {
        let mut chain = Self::new();
        if config.trust_client_cert_header {
            chain = chain.with(CertificateAuthenticator::new(&config.client_cert_header)?);
        }
        Ok(chain.with(JwtAuthenticator::from_config(config)?))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.authenticators.iter().map(|a| a.name()).collect()
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        for authenticator in &self.authenticators {
            match authenticator.authenticate(headers).await {
                Ok(Some(principal)) => {
                    tracing::debug!(
                        authenticator = authenticator.name(),
                        principal = %principal.name,
                        "Request authenticated"
                    );
                    return Ok(principal);
                }
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(authenticator = authenticator.name(), error = %e, "Authentication failed");
                    return Err(e);
                }
            }
        }
        Err(AuthError::MissingCredentials)
    }
}

impl std::fmt::Debug for AuthChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthChain")
            .field("authenticators", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::http::HeaderValue;

    struct Fixed(Result<Option<Principal>, AuthError>);

    #[async_trait]
    impl Authenticator for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn authenticate(&self, _headers: &HeaderMap) -> Result<Option<Principal>, AuthError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn empty_chain_requires_credentials() {
        let result = AuthChain::new().authenticate(&HeaderMap::new()).await;
        assert_eq!(result, Err(AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn skips_authenticators_without_credentials() {
        let chain = AuthChain::new()
            .with(Fixed(Ok(None)))
            .with(Fixed(Ok(Some(Principal::anonymous()))));
        assert_eq!(chain.authenticate(&HeaderMap::new()).await, Ok(Principal::anonymous()));
    }

    #[tokio::test]
    async fn rejection_stops_the_chain() {
        let chain = AuthChain::new()
            .with(Fixed(Err(AuthError::InvalidToken("expired".into()))))
            .with(Fixed(Ok(Some(Principal::anonymous()))));
        assert!(matches!(
            chain.authenticate(&HeaderMap::new()).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn config_chain_prefers_certificate() {
        let config = AppConfig::development().security;
        let chain = AuthChain::from_config(&config).unwrap();
        assert_eq!(chain.names(), vec!["certificate", "jwt"]);

        let mut headers = HeaderMap::new();
        headers.insert("x-client-cert-subject", HeaderValue::from_static("CN=gateway,O=Lite"));
        let principal = chain.authenticate(&headers).await.unwrap();
        assert_eq!(principal.name, "gateway");
        assert_eq!(principal.source, PrincipalSource::Certificate);
    }
}
