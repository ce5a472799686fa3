use serde::{Deserialize, Serialize};
use std::env;

use crate::service::IdStrategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// When false every request is let through unauthenticated.
    pub auth_enabled: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// HS256 shared secret. Ignored when `jwt_public_key_pem` is set.
    pub jwt_secret: String,
    /// RS256 public key of the token issuer.
    pub jwt_public_key_pem: Option<String>,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_leeway_secs: u64,
    pub jwt_expiry_hours: u64,
    /// Header in which the TLS terminator forwards the client certificate subject DN.
    pub client_cert_header: String,
    pub trust_client_cert_header: bool,
    /// Path prefixes served without authentication.
    pub public_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub id_strategy: IdStrategy,
    pub seed_products: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("SERVER_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_AUTH_ENABLED") {
            self.security.auth_enabled = v.parse().unwrap_or(self.security.auth_enabled);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_PUBLIC_KEY_PEM") {
            self.security.jwt_public_key_pem = non_empty(v);
        }
        if let Ok(v) = env::var("SECURITY_JWT_ISSUER") {
            self.security.jwt_issuer = non_empty(v);
        }
        if let Ok(v) = env::var("SECURITY_JWT_AUDIENCE") {
            self.security.jwt_audience = non_empty(v);
        }
        if let Ok(v) = env::var("SECURITY_JWT_LEEWAY_SECS") {
            self.security.jwt_leeway_secs = v.parse().unwrap_or(self.security.jwt_leeway_secs);
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_CLIENT_CERT_HEADER") {
            self.security.client_cert_header = v.trim().to_ascii_lowercase();
        }
        if let Ok(v) = env::var("SECURITY_TRUST_CLIENT_CERT_HEADER") {
            self.security.trust_client_cert_header =
                v.parse().unwrap_or(self.security.trust_client_cert_header);
        }
        if let Ok(v) = env::var("SECURITY_PUBLIC_PATHS") {
            self.security.public_paths = split_list(&v);
        }

        // Catalog overrides
        if let Ok(v) = env::var("CATALOG_ID_STRATEGY") {
            match v.parse() {
                Ok(strategy) => self.catalog.id_strategy = strategy,
                Err(e) => tracing::warn!("Ignoring CATALOG_ID_STRATEGY: {}", e),
            }
        }
        if let Ok(v) = env::var("CATALOG_SEED_PRODUCTS") {
            self.catalog.seed_products = v.parse().unwrap_or(self.catalog.seed_products);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                auth_enabled: true,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                jwt_secret: "dev-only-product-service-secret".to_string(),
                jwt_public_key_pem: None,
                jwt_issuer: None,
                jwt_audience: None,
                jwt_leeway_secs: 60,
                jwt_expiry_hours: 24,
                client_cert_header: "x-client-cert-subject".to_string(),
                trust_client_cert_header: true,
                public_paths: default_public_paths(),
            },
            catalog: CatalogConfig {
                id_strategy: IdStrategy::Sequential,
                seed_products: true,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.host = "0.0.0.0".to_string();
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config.security.jwt_secret = String::new();
        config.security.jwt_expiry_hours = 4;
        config.security.trust_client_cert_header = false;
        config
    }

    fn production() -> Self {
        let mut config = Self::staging();
        config.environment = Environment::Production;
        config.api.enable_request_logging = false;
        config.api.max_request_size_bytes = 256 * 1024;
        config.security.cors_origins = vec!["https://app.example.com".to_string()];
        config.security.jwt_expiry_hours = 1;
        config.security.jwt_leeway_secs = 30;
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn is_public_path(&self, path: &str) -> bool {
        self.security.public_paths.iter().any(|public| {
            if public == "/" {
                path == "/"
            } else {
                path == public || path.starts_with(&format!("{}/", public.trim_end_matches('/')))
            }
        })
    }
}

fn default_public_paths() -> Vec<String> {
    vec![
        "/".to_string(),
        "/health".to_string(),
        "/api/product/api-docs".to_string(),
    ]
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(v: String) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.security.auth_enabled);
        assert!(!config.security.jwt_secret.is_empty());
        assert!(config.security.trust_client_cert_header);
        assert_eq!(config.catalog.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.security.trust_client_cert_header);
        assert!(!config.api.enable_request_logging);
    }

    #[test]
    fn public_paths_match_by_segment() {
        let config = AppConfig::development();
        assert!(config.is_public_path("/"));
        assert!(config.is_public_path("/health"));
        assert!(config.is_public_path("/api/product/api-docs"));
        assert!(!config.is_public_path("/healthz"));
        assert!(!config.is_public_path("/api/product/products"));
    }
}
