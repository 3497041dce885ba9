use crate::{
    api::{self, registry::Registry},
    cli::globals::GlobalArgs,
    vault::{self, SecretProviderUnavailable},
};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug)]
pub struct Args {
    pub port: Option<u16>,
    pub secret_key: Option<String>,
    pub vault_url: Option<String>,
    pub vault_role_id: Option<String>,
    pub vault_secret_id: Option<String>,
    pub vault_kv_mount: String,
    pub vault_kv_path: String,
}

/// Execute the server action.
/// # Errors
/// Returns `SecretProviderUnavailable` if no secret can be loaded, or an
/// error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let mut globals = GlobalArgs::new(args.vault_url.clone().unwrap_or_default());

    let (secret_key, port_override) = load_secret(&args, &mut globals).await?;
    globals.set_secret_key(SecretString::from(secret_key));

    // Explicit flag or env beats the provider override, which beats the default.
    let port = args.port.or(port_override).unwrap_or(DEFAULT_PORT);

    let registry = Registry::default();

    api::new(port, registry, globals).await
}

/// Resolve the login secret and optional port override, either directly from
/// the arguments or from the Vault KV entry after an AppRole login.
async fn load_secret(args: &Args, globals: &mut GlobalArgs) -> Result<(String, Option<u16>)> {
    if args.vault_url.is_some() {
        let role_id = args.vault_role_id.as_deref().ok_or_else(|| {
            SecretProviderUnavailable::new("missing Vault role id for AppRole login")
        })?;
        let secret_id = args.vault_secret_id.as_deref().ok_or_else(|| {
            SecretProviderUnavailable::new("missing Vault secret id for AppRole login")
        })?;

        let (token, _lease_duration) = vault::approle_login(&globals.vault_url, secret_id, role_id)
            .await
            .map_err(|err| SecretProviderUnavailable::new(format!("AppRole login failed: {err}")))?;

        globals.set_token(SecretString::from(token));

        let payload = vault::kv::read_service_secret(
            globals,
            &args.vault_kv_mount,
            &args.vault_kv_path,
        )
        .await
        .map_err(|err| SecretProviderUnavailable::new(format!("secret read failed: {err}")))?;

        info!("Secret key loaded from Vault");

        return Ok((payload.secret_key, payload.port));
    }

    if let Some(secret_key) = &args.secret_key {
        return Ok((secret_key.clone(), None));
    }

    Err(SecretProviderUnavailable::new(
        "no secret source configured: set --secret-key or --vault-url",
    )
    .into())
}
