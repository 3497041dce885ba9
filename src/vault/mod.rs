pub mod kv;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, instrument};
use url::Url;

/// Fatal startup failure: the secret provider could not supply the service
/// secret. The binary maps this to a non-zero exit before the listener binds.
#[derive(Debug)]
pub struct SecretProviderUnavailable(String);

impl SecretProviderUnavailable {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl fmt::Display for SecretProviderUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secret provider unavailable: {}", self.0)
    }
}

impl std::error::Error for SecretProviderUnavailable {}

/// Derive scheme://host:port from the Vault login URL and append an endpoint
/// path.
#[instrument]
pub fn endpoint_url(vault_url: &str, endpoint: &str) -> Result<String> {
    let url = Url::parse(vault_url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {}", scheme)),
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{endpoint}");

    debug!("endpoint URL: {}", endpoint);

    Ok(endpoint_url)
}

/// Login to Vault using AppRole
/// Create a secret ID with:
/// vault write -f auth/approle/role/registro/secret-id
#[instrument(skip(secret_id))]
pub async fn approle_login(vault_url: &str, secret_id: &str, role_id: &str) -> Result<(String, u64)> {
    let client = Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .build()?;

    // Create a JSON payload for AppRole login
    let login_payload = json!({
        "role_id": role_id,
        "secret_id": secret_id
    });

    debug!("login URL: {}, role ID: {}", vault_url, role_id);

    let response = client.post(vault_url).json(&login_payload).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let json_response: Value = response.json().await?;

        return Err(anyhow!(
            "{} - {}, {}",
            vault_url,
            status,
            json_response["errors"][0].as_str().unwrap_or("")
        ));
    }

    // Parse the JSON response
    let json_response: Value = response.json().await?;
    let token = json_response["auth"]["client_token"]
        .as_str()
        .ok_or_else(|| anyhow!("Error parsing JSON response: no client_token found"))?;
    let lease_duration = json_response["auth"]["lease_duration"]
        .as_u64()
        .unwrap_or(1800);

    Ok((token.to_string(), lease_duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_with_port() {
        let url = endpoint_url(
            "https://vault.tld:8200/v1/auth/approle/login",
            "/v1/secret/data/registro/config",
        )
        .expect("url should parse");
        assert_eq!(url, "https://vault.tld:8200/v1/secret/data/registro/config");
    }

    #[test]
    fn test_endpoint_url_default_ports() {
        let url = endpoint_url("https://vault.tld/v1/auth/approle/login", "/v1/sys/health")
            .expect("url should parse");
        assert_eq!(url, "https://vault.tld:443/v1/sys/health");

        let url = endpoint_url("http://vault.tld/v1/auth/approle/login", "/v1/sys/health")
            .expect("url should parse");
        assert_eq!(url, "http://vault.tld:80/v1/sys/health");
    }

    #[test]
    fn test_endpoint_url_unsupported_scheme() {
        assert!(endpoint_url("unix:///tmp/agent.sock", "/v1/sys/health").is_err());
    }

    #[test]
    fn test_secret_provider_unavailable_display() {
        let err = SecretProviderUnavailable::new("connection refused");
        assert_eq!(
            err.to_string(),
            "secret provider unavailable: connection refused"
        );
    }
}
