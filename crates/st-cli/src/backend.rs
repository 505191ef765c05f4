//! Backend selection for the CLI

use anyhow::{Context, Result};
use clap::Args;
use st_client_api::ClientApi;
use st_rest_client::{HeaderConfig, RestClient, DEFAULT_BASE_URL};
use st_rest_client_mock::MockClient;
use tracing::debug;

/// Where requests go and which headers they carry
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Base address of the Smart Todo API
    #[arg(
        long,
        global = true,
        env = "SMART_TODO_API_URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// API token sent as `Authorization: Token <TOKEN>`
    #[arg(long, global = true, env = "SMART_TODO_API_TOKEN")]
    pub token: Option<String>,

    /// JWT sent as `Authorization: Bearer <TOKEN>`
    #[arg(long, global = true, env = "SMART_TODO_BEARER_TOKEN")]
    pub bearer_token: Option<String>,

    /// Extra header added to every request
    #[arg(long = "header", value_name = "NAME=VALUE", global = true)]
    pub headers: Vec<String>,

    /// Use the in-memory demo data instead of a server
    #[arg(long, global = true)]
    pub mock: bool,
}

impl BackendArgs {
    /// Header configuration described by the flags
    pub fn header_config(&self) -> Result<HeaderConfig> {
        if self.token.is_some() && self.bearer_token.is_some() {
            anyhow::bail!("Cannot specify both --token and --bearer-token");
        }

        let mut config = if let Some(token) = &self.token {
            HeaderConfig::with_token(token)
        } else if let Some(token) = &self.bearer_token {
            HeaderConfig::with_bearer(token)
        } else {
            HeaderConfig::default()
        };

        for header in &self.headers {
            let (name, value) = header
                .split_once('=')
                .with_context(|| format!("Invalid --header '{}', expected NAME=VALUE", header))?;
            config = config.with_header(name.trim(), value.trim());
        }

        Ok(config)
    }

    /// Build the client the flags ask for
    pub fn connect(&self) -> Result<Box<dyn ClientApi>> {
        if self.mock {
            debug!("using in-memory demo data");
            return Ok(Box::new(MockClient::with_demo_data()));
        }

        let client = RestClient::from_url(&self.base_url, self.header_config()?)
            .with_context(|| format!("Failed to create REST client for {}", self.base_url))?;
        debug!(base_url = %client.base_url(), "using REST backend");
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BackendArgs {
        BackendArgs {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            bearer_token: None,
            headers: Vec::new(),
            mock: false,
        }
    }

    #[test]
    fn test_token_and_bearer_are_exclusive() {
        let mut args = args();
        args.token = Some("a".into());
        args.bearer_token = Some("b".into());
        assert!(args.header_config().is_err());
    }

    #[test]
    fn test_header_flags_are_parsed() {
        let mut args = args();
        args.headers = vec!["X-Client = cli".into()];
        let headers = args.header_config().unwrap().headers().unwrap();
        assert_eq!(headers.get("x-client").unwrap(), "cli");

        args.headers = vec!["missing-separator".into()];
        assert!(args.header_config().is_err());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let mut args = args();
        args.base_url = "not a url".into();
        assert!(args.connect().is_err());
    }
}
