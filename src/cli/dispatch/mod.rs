use crate::cli::{
    actions::{server::Args, Action},
    commands,
};
use anyhow::Result;
use clap::parser::ValueSource;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    commands::validate(matches).map_err(|e| anyhow::anyhow!(e))?;

    // A defaulted --port is "no explicit port", leaving room for the secret
    // provider's port override.
    let port = match matches.value_source("port") {
        Some(ValueSource::DefaultValue) | None => None,
        Some(_) => matches.get_one::<u16>("port").copied(),
    };

    Ok(Action::Server(Args {
        port,
        secret_key: matches.get_one::<String>("secret-key").cloned(),
        vault_url: matches.get_one::<String>("vault-url").cloned(),
        vault_role_id: matches.get_one::<String>("vault-role-id").cloned(),
        vault_secret_id: matches.get_one::<String>("vault-secret-id").cloned(),
        vault_kv_mount: matches
            .get_one::<String>("vault-kv-mount")
            .cloned()
            .unwrap_or_else(|| "secret".to_string()),
        vault_kv_path: matches
            .get_one::<String>("vault-kv-path")
            .cloned()
            .unwrap_or_else(|| "registro/config".to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cleared_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(
            [
                ("REGISTRO_PORT", None::<&str>),
                ("REGISTRO_SECRET_KEY", None),
                ("REGISTRO_VAULT_URL", None),
                ("REGISTRO_VAULT_ROLE_ID", None),
                ("REGISTRO_VAULT_SECRET_ID", None),
            ],
            f,
        )
    }

    #[test]
    fn test_handler_secret_key_only() {
        with_cleared_env(|| {
            let matches = commands::new()
                .get_matches_from(vec!["registro", "--secret-key", "supersecret"]);
            let action = handler(&matches).expect("handler should succeed");

            let Action::Server(args) = action;
            assert_eq!(args.port, None);
            assert_eq!(args.secret_key.as_deref(), Some("supersecret"));
            assert_eq!(args.vault_url, None);
            assert_eq!(args.vault_kv_mount, "secret");
            assert_eq!(args.vault_kv_path, "registro/config");
        });
    }

    #[test]
    fn test_handler_explicit_port() {
        with_cleared_env(|| {
            let matches = commands::new().get_matches_from(vec![
                "registro",
                "--port",
                "8080",
                "--secret-key",
                "supersecret",
            ]);
            let action = handler(&matches).expect("handler should succeed");

            let Action::Server(args) = action;
            assert_eq!(args.port, Some(8080));
        });
    }

    #[test]
    fn test_handler_vault_args() {
        with_cleared_env(|| {
            let matches = commands::new().get_matches_from(vec![
                "registro",
                "--vault-url",
                "https://vault.tld:8200/v1/auth/approle/login",
                "--vault-role-id",
                "role-id",
                "--vault-secret-id",
                "secret-id",
                "--vault-kv-path",
                "registro/prod",
            ]);
            let action = handler(&matches).expect("handler should succeed");

            let Action::Server(args) = action;
            assert_eq!(
                args.vault_url.as_deref(),
                Some("https://vault.tld:8200/v1/auth/approle/login")
            );
            assert_eq!(args.vault_role_id.as_deref(), Some("role-id"));
            assert_eq!(args.vault_secret_id.as_deref(), Some("secret-id"));
            assert_eq!(args.vault_kv_path, "registro/prod");
        });
    }

    #[test]
    fn test_handler_missing_secret_source() {
        with_cleared_env(|| {
            let matches = commands::new().get_matches_from(vec!["registro"]);
            assert!(handler(&matches).is_err());
        });
    }
}
