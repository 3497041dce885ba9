//! # Registro (User Registry Service)
//!
//! `registro` keeps an in-memory registry of user records keyed by email and
//! exposes signup, login, and user management over HTTP. There is no durable
//! storage: the registry starts empty and is gone when the process exits.
//!
//! ## Registry Model
//!
//! - Emails are the unique key; a record's presence in the registry is the
//!   only authority for "user exists".
//! - `created_at` is set once at signup and never changes; a password update
//!   replaces the password in place and nothing else.
//! - Passwords are stored and compared as plain text. This mirrors the demo
//!   clients this service exists for and is deliberate; do not point it at
//!   real credentials.
//!
//! ## Secret Provider
//!
//! At startup the service loads a secret string, either directly from
//! `--secret-key` or from a Vault KV entry after an AppRole login. The secret
//! is echoed into login responses. A failed fetch is fatal: the process logs
//! the error and exits non-zero before the listener binds.

pub mod api;
pub mod cli;
pub mod vault;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
