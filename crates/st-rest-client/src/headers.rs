//! Request headers sent with every API call

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{RestClientError, RestClientResult};

/// Authentication methods accepted by the backend
#[derive(Debug, Clone, Default)]
pub enum AuthMethod {
    /// Token authentication (`Authorization: Token <key>`)
    Token(String),
    /// Bearer token (`Authorization: Bearer <jwt>`)
    Bearer(String),
    /// No authentication
    #[default]
    None,
}

impl AuthMethod {
    /// Apply authentication headers to a request
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> RestClientResult<()> {
        let value = match self {
            AuthMethod::Token(token) => format!("Token {}", token),
            AuthMethod::Bearer(token) => format!("Bearer {}", token),
            AuthMethod::None => return Ok(()),
        };
        headers.insert(AUTHORIZATION, header_value(&value)?);
        Ok(())
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }
}

/// Header configuration for the client
///
/// `Content-Type: application/json` is always present. Extra headers are
/// merged on top and win over the defaults when names collide.
#[derive(Debug, Clone, Default)]
pub struct HeaderConfig {
    pub auth: AuthMethod,
    pub extra: Vec<(String, String)>,
}

impl HeaderConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            auth: AuthMethod::token(token),
            extra: Vec::new(),
        }
    }

    pub fn with_bearer(token: impl Into<String>) -> Self {
        Self {
            auth: AuthMethod::bearer(token),
            extra: Vec::new(),
        }
    }

    /// Add a header merged into every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// Build the header map for one request
    pub fn headers(&self) -> RestClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        self.auth.apply_to_headers(&mut headers)?;

        for (name, value) in &self.extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RestClientError::Header(format!("{}: {}", name, e)))?;
            headers.insert(name, header_value(value)?);
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> RestClientResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RestClientError::Header(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_carry_json_content_type() {
        let headers = HeaderConfig::default().headers().unwrap();

        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn test_token_auth_headers() {
        let headers = HeaderConfig::with_token("abc123").headers().unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Token abc123");
    }

    #[test]
    fn test_bearer_auth_headers() {
        let auth = AuthMethod::bearer("jwt-token");
        let mut headers = HeaderMap::new();
        auth.apply_to_headers(&mut headers).unwrap();

        assert_eq!(headers.get("authorization").unwrap(), "Bearer jwt-token");
    }

    #[test]
    fn test_extra_headers_are_merged() {
        let headers = HeaderConfig::default()
            .with_header("X-Request-Source", "cli")
            .with_header("Content-Type", "application/json; charset=utf-8")
            .headers()
            .unwrap();

        assert_eq!(headers.get("x-request-source").unwrap(), "cli");
        assert_eq!(
            headers.get("content-type").unwrap(),
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let result = HeaderConfig::default().with_header("bad header", "x").headers();
        assert!(matches!(result, Err(RestClientError::Header(_))));
    }
}
