use crate::{cli::globals::GlobalArgs, vault};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{info_span, instrument, Instrument};

const SECRET_KEY_FIELD: &str = "secret_key";
const PORT_FIELD: &str = "port";

/// Secret payload read at startup: the login secret plus an optional port
/// override.
#[derive(Debug)]
pub struct ServiceSecret {
    pub secret_key: String,
    pub port: Option<u16>,
}

#[instrument(skip(globals))]
/// # Errors
/// Returns an error if the Vault request fails, the secret is missing, or the
/// payload is invalid.
pub async fn read_service_secret(
    globals: &GlobalArgs,
    kv_mount: &str,
    kv_path: &str,
) -> Result<ServiceSecret> {
    let client = Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .build()?;
    let path = format!("/v1/{kv_mount}/data/{kv_path}");
    let url = vault::endpoint_url(&globals.vault_url, &path)?;

    let span = info_span!(
        "vault.kv.read",
        http.method = "GET",
        url = %url
    );
    let response = client
        .get(&url)
        .header("X-Vault-Token", globals.vault_token.expose_secret())
        .send()
        .instrument(span)
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("vault kv read failed: {status} {body}"));
    }

    let json: Value = response.json().await?;
    parse_service_secret(&json)
}

// KV v2 nests the entry under data.data.
fn parse_service_secret(json: &Value) -> Result<ServiceSecret> {
    let data = json
        .get("data")
        .and_then(|data| data.get("data"))
        .context("no data in vault response")?;

    let secret_key = data
        .get(SECRET_KEY_FIELD)
        .and_then(Value::as_str)
        .context("secret_key missing from vault response")?
        .to_string();

    let port = match data.get(PORT_FIELD) {
        Some(value) => {
            let raw = value
                .as_u64()
                .with_context(|| format!("{PORT_FIELD} is not an integer"))?;
            Some(u16::try_from(raw).with_context(|| format!("{PORT_FIELD} {raw} out of range"))?)
        }
        None => None,
    };

    Ok(ServiceSecret { secret_key, port })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_secret_with_port() {
        let json = json!({
            "data": {
                "data": {
                    "secret_key": "supersecret",
                    "port": 8443
                }
            }
        });

        let secret = parse_service_secret(&json).expect("payload should parse");
        assert_eq!(secret.secret_key, "supersecret");
        assert_eq!(secret.port, Some(8443));
    }

    #[test]
    fn test_parse_secret_without_port() {
        let json = json!({
            "data": {
                "data": {
                    "secret_key": "supersecret"
                }
            }
        });

        let secret = parse_service_secret(&json).expect("payload should parse");
        assert_eq!(secret.secret_key, "supersecret");
        assert_eq!(secret.port, None);
    }

    #[test]
    fn test_parse_secret_missing_key() {
        let json = json!({
            "data": {
                "data": {
                    "port": 8443
                }
            }
        });

        assert!(parse_service_secret(&json).is_err());
    }

    #[test]
    fn test_parse_secret_port_out_of_range() {
        let json = json!({
            "data": {
                "data": {
                    "secret_key": "supersecret",
                    "port": 70000
                }
            }
        });

        assert!(parse_service_secret(&json).is_err());
    }

    #[test]
    fn test_parse_secret_no_data() {
        let json = json!({ "errors": [] });
        assert!(parse_service_secret(&json).is_err());
    }
}
