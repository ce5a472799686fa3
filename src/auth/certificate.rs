use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};

use super::{AuthError, Authenticator, Principal, PrincipalSource};

/// Authenticates callers by the client certificate the TLS terminator verified.
///
/// The terminator forwards the certificate subject DN in a header, either
/// bare (`CN=client,O=Org` or `/CN=client/O=Org`) or as an Envoy-style
/// `Subject="..."` element. The principal is the subject's Common Name.
#[derive(Debug, Clone)]
pub struct CertificateAuthenticator {
    header: HeaderName,
}

impl CertificateAuthenticator {
    pub fn new(header: &str) -> Result<Self, AuthError> {
        let header = HeaderName::from_bytes(header.trim().as_bytes()).map_err(|_| {
            AuthError::NotConfigured(format!("invalid client certificate header name '{}'", header))
        })?;
        Ok(Self { header })
    }
}

#[async_trait]
impl Authenticator for CertificateAuthenticator {
    fn name(&self) -> &'static str {
        "certificate"
    }

    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Principal>, AuthError> {
        let Some(value) = headers.get(&self.header) else {
            return Ok(None);
        };
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidCertificate("subject is not valid ASCII".to_string()))?;
        if value.trim().is_empty() {
            return Ok(None);
        }

        let dn = envoy_subject(value).unwrap_or(value);
        tracing::info!(dn = %dn, "Client certificate presented");

        let cn = common_name(dn)
            .ok_or_else(|| AuthError::InvalidCertificate(format!("no CN in subject '{}'", dn)))?;

        Ok(Some(Principal {
            name: cn.to_string(),
            source: PrincipalSource::Certificate,
            roles: Vec::new(),
        }))
    }
}

/// Common Name of a distinguished name, if it has a non-empty one.
///
/// A leading `/` selects the OpenSSL slash form; anything else is split on
/// commas only, so a comma-form CN may itself contain `/`.
pub fn common_name(dn: &str) -> Option<&str> {
    let dn = dn.trim();
    let separator = if dn.starts_with('/') { '/' } else { ',' };
    dn.split(separator)
        .filter_map(|rdn| rdn.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("CN"))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn envoy_subject(value: &str) -> Option<&str> {
    let start = value.find("Subject=\"")? + "Subject=\"".len();
    let rest = &value[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_cn_from_common_dn_forms() {
        assert_eq!(common_name("CN=gateway,OU=Edge,O=Lite"), Some("gateway"));
        assert_eq!(common_name("O=Lite, CN=inventory-service"), Some("inventory-service"));
        assert_eq!(common_name("/C=US/O=Lite/CN=client"), Some("client"));
        assert_eq!(common_name("cn=lower"), Some("lower"));
        assert_eq!(common_name("O=Lite,OU=Edge"), None);
        assert_eq!(common_name("CN="), None);
    }

    #[test]
    fn separator_follows_dn_form() {
        assert_eq!(common_name("CN=svc/prod,O=Lite"), Some("svc/prod"));
        assert_eq!(common_name("O=Lite,CN=spiffe/edge/gw"), Some("spiffe/edge/gw"));
        assert_eq!(common_name("/O=Lite, Inc/CN=client"), Some("client"));
    }

    #[tokio::test]
    async fn missing_header_defers_to_next_authenticator() {
        let auth = CertificateAuthenticator::new("x-client-cert-subject").unwrap();
        assert_eq!(auth.authenticate(&HeaderMap::new()).await, Ok(None));
    }

    #[tokio::test]
    async fn reads_envoy_forwarded_subject() {
        let auth = CertificateAuthenticator::new("x-forwarded-client-cert").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-client-cert",
            HeaderValue::from_static("Hash=abc;Subject=\"CN=edge,O=Lite\";URI=spiffe://lite/edge"),
        );
        let principal = auth.authenticate(&headers).await.unwrap().unwrap();
        assert_eq!(principal.name, "edge");
    }

    #[tokio::test]
    async fn subject_without_cn_is_rejected() {
        let auth = CertificateAuthenticator::new("x-client-cert-subject").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-client-cert-subject", HeaderValue::from_static("O=Lite"));
        assert!(matches!(
            auth.authenticate(&headers).await,
            Err(AuthError::InvalidCertificate(_))
        ));
    }
}
