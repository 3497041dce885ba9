use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

/// Check cross-argument requirements the parser cannot express on its own.
///
/// # Errors
/// Returns an error string if Vault is configured without its auth arguments,
/// or if neither a secret key nor a Vault URL is present.
pub fn validate(matches: &clap::ArgMatches) -> Result<(), String> {
    if matches.contains_id("vault-url") {
        if !matches.contains_id("vault-role-id") {
            return Err(
                "Missing required argument: --vault-role-id (required with --vault-url)"
                    .to_string(),
            );
        }
        if !matches.contains_id("vault-secret-id") {
            return Err(
                "Missing required argument: --vault-secret-id (required with --vault-url)"
                    .to_string(),
            );
        }
        return Ok(());
    }

    if !matches.contains_id("secret-key") {
        return Err("Missing required argument: --secret-key or --vault-url".to_string());
    }

    Ok(())
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    Command::new("registro")
        .about("User Registry Service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("3000")
                .env("REGISTRO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("secret-key")
                .short('s')
                .long("secret-key")
                .help("Secret echoed into login responses, used when no Vault URL is configured")
                .env("REGISTRO_SECRET_KEY"),
        )
        .arg(
            Arg::new("vault-url")
                .long("vault-url")
                .help("Vault approle login URL, example: https://vault.tld:8200/v1/auth/<approle>/login")
                .env("REGISTRO_VAULT_URL"),
        )
        .arg(
            Arg::new("vault-role-id")
                .long("vault-role-id")
                .help("Vault role id")
                .env("REGISTRO_VAULT_ROLE_ID"),
        )
        .arg(
            Arg::new("vault-secret-id")
                .long("vault-secret-id")
                .help("Vault secret id")
                .env("REGISTRO_VAULT_SECRET_ID"),
        )
        .arg(
            Arg::new("vault-kv-mount")
                .long("vault-kv-mount")
                .help("Vault KV v2 mount holding the service secret")
                .default_value("secret")
                .env("REGISTRO_VAULT_KV_MOUNT"),
        )
        .arg(
            Arg::new("vault-kv-path")
                .long("vault-kv-path")
                .help("Path of the service secret inside the KV mount")
                .default_value("registro/config")
                .env("REGISTRO_VAULT_KV_PATH"),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("REGISTRO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
