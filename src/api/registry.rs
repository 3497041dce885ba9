//! In-memory user registry.
//!
//! A record's presence in the registry is the only authority for "user
//! exists". The store is process-scoped: it starts empty and is discarded on
//! exit. Handlers share one instance through an axum `Extension`, and the
//! single mutex keeps each operation atomic under the multi-threaded runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use utoipa::ToSchema;

#[derive(Debug, Clone)]
struct UserRecord {
    email: String,
    name: Option<String>,
    password: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn public(&self) -> PublicUser {
        PublicUser {
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// A user record without its password.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub name: Option<String>,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegistryStats {
    #[serde(rename = "totalUsers")]
    pub total_users: usize,
    /// `created_at` of the most recently inserted record still present.
    #[serde(rename = "lastSignup")]
    pub last_signup: Option<DateTime<Utc>>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyExists,
    InvalidCredentials,
    NotFound,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "user already exists"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::NotFound => write!(f, "user not found"),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    // Insertion order, drives list() and last_signup
    order: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<Inner>>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new record with `created_at` set to now.
    ///
    /// # Errors
    /// Returns `AlreadyExists` if the email is already registered; the
    /// registry is left untouched.
    pub fn create(
        &self,
        email: &str,
        name: Option<String>,
        password: &str,
    ) -> Result<(), RegistryError> {
        let mut inner = self.lock();

        if inner.users.contains_key(email) {
            return Err(RegistryError::AlreadyExists);
        }

        inner.users.insert(
            email.to_string(),
            UserRecord {
                email: email.to_string(),
                name,
                password: password.to_string(),
                created_at: Utc::now(),
            },
        );
        inner.order.push(email.to_string());

        Ok(())
    }

    /// Compare the stored password byte for byte, no hashing.
    ///
    /// # Errors
    /// Returns `InvalidCredentials` when the user is unknown or the password
    /// does not match; the two cases are indistinguishable to the caller.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<PublicUser, RegistryError> {
        let inner = self.lock();

        match inner.users.get(email) {
            Some(record) if record.password == password => Ok(record.public()),
            _ => Err(RegistryError::InvalidCredentials),
        }
    }

    /// Public views of every record, in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<PublicUser> {
        let inner = self.lock();

        inner
            .order
            .iter()
            .filter_map(|email| inner.users.get(email))
            .map(UserRecord::public)
            .collect()
    }

    /// # Errors
    /// Returns `NotFound` if no record exists for the email.
    pub fn get(&self, email: &str) -> Result<PublicUser, RegistryError> {
        let inner = self.lock();

        inner
            .users
            .get(email)
            .map(UserRecord::public)
            .ok_or(RegistryError::NotFound)
    }

    /// Replace the password in place; `created_at` stays untouched.
    ///
    /// # Errors
    /// Returns `NotFound` if no record exists for the email.
    pub fn update_password(&self, email: &str, new_password: &str) -> Result<(), RegistryError> {
        let mut inner = self.lock();

        match inner.users.get_mut(email) {
            Some(record) => {
                record.password = new_password.to_string();
                Ok(())
            }
            None => Err(RegistryError::NotFound),
        }
    }

    /// # Errors
    /// Returns `NotFound` if no record exists for the email.
    pub fn delete(&self, email: &str) -> Result<(), RegistryError> {
        let mut inner = self.lock();

        if inner.users.remove(email).is_none() {
            return Err(RegistryError::NotFound);
        }
        inner.order.retain(|entry| entry != email);

        Ok(())
    }

    /// Computed over the current contents.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let inner = self.lock();

        let last_signup = inner
            .order
            .last()
            .and_then(|email| inner.users.get(email))
            .map(|record| record.created_at);

        RegistryStats {
            total_users: inner.users.len(),
            last_signup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_duplicate() {
        let registry = Registry::default();

        assert!(registry.create("a@x.com", None, "pw1").is_ok());
        assert_eq!(
            registry.create("a@x.com", Some("Alice".to_string()), "pw2"),
            Err(RegistryError::AlreadyExists)
        );

        // The conflicting create must not have mutated the record
        assert!(registry.authenticate("a@x.com", "pw1").is_ok());
        assert_eq!(registry.stats().total_users, 1);
    }

    #[test]
    fn test_authenticate_exact_match_only() {
        let registry = Registry::default();
        registry
            .create("a@x.com", None, "Secret")
            .expect("create should succeed");

        assert!(registry.authenticate("a@x.com", "Secret").is_ok());
        assert_eq!(
            registry.authenticate("a@x.com", "secret"),
            Err(RegistryError::InvalidCredentials)
        );
        assert_eq!(
            registry.authenticate("a@x.com", "Secret "),
            Err(RegistryError::InvalidCredentials)
        );
        assert_eq!(
            registry.authenticate("nobody@x.com", "Secret"),
            Err(RegistryError::InvalidCredentials)
        );
    }

    #[test]
    fn test_delete_then_get() {
        let registry = Registry::default();
        registry
            .create("a@x.com", None, "pw1")
            .expect("create should succeed");

        assert!(registry.delete("a@x.com").is_ok());
        assert_eq!(registry.get("a@x.com"), Err(RegistryError::NotFound));
        assert_eq!(registry.delete("a@x.com"), Err(RegistryError::NotFound));
    }

    #[test]
    fn test_update_password_switches_credentials() {
        let registry = Registry::default();
        registry
            .create("a@x.com", None, "pw1")
            .expect("create should succeed");
        let created_at = registry.get("a@x.com").expect("record exists").created_at;

        assert!(registry.update_password("a@x.com", "pw2").is_ok());
        assert_eq!(
            registry.authenticate("a@x.com", "pw1"),
            Err(RegistryError::InvalidCredentials)
        );
        assert!(registry.authenticate("a@x.com", "pw2").is_ok());

        // created_at never changes after creation
        assert_eq!(
            registry.get("a@x.com").expect("record exists").created_at,
            created_at
        );
    }

    #[test]
    fn test_update_password_unknown_user() {
        let registry = Registry::default();
        assert_eq!(
            registry.update_password("nobody@x.com", "pw"),
            Err(RegistryError::NotFound)
        );
    }

    #[test]
    fn test_list_is_insertion_ordered() {
        let registry = Registry::default();
        registry
            .create("a@x.com", Some("Alice".to_string()), "pw1")
            .expect("create should succeed");
        registry
            .create("b@x.com", None, "pw2")
            .expect("create should succeed");
        registry
            .create("c@x.com", None, "pw3")
            .expect("create should succeed");

        let emails: Vec<String> = registry.list().into_iter().map(|user| user.email).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn test_list_never_exposes_password() {
        let registry = Registry::default();
        registry
            .create("a@x.com", None, "pw1")
            .expect("create should succeed");

        let serialized =
            serde_json::to_string(&registry.list()).expect("list should serialize");
        assert!(!serialized.contains("password"));
        assert!(!serialized.contains("pw1"));
    }

    #[test]
    fn test_stats_empty() {
        let registry = Registry::default();
        let stats = registry.stats();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.last_signup, None);
    }

    #[test]
    fn test_stats_tracks_latest_insert() {
        let registry = Registry::default();
        registry
            .create("a@x.com", None, "pw1")
            .expect("create should succeed");
        registry
            .create("b@x.com", None, "pw2")
            .expect("create should succeed");

        let second = registry.get("b@x.com").expect("record exists");
        let stats = registry.stats();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.last_signup, Some(second.created_at));
    }

    #[test]
    fn test_stats_after_deleting_latest() {
        let registry = Registry::default();
        registry
            .create("a@x.com", None, "pw1")
            .expect("create should succeed");
        registry
            .create("b@x.com", None, "pw2")
            .expect("create should succeed");
        registry.delete("b@x.com").expect("delete should succeed");

        let first = registry.get("a@x.com").expect("record exists");
        let stats = registry.stats();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.last_signup, Some(first.created_at));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = Registry::default();
        let clone = registry.clone();

        registry
            .create("a@x.com", None, "pw1")
            .expect("create should succeed");
        assert!(clone.get("a@x.com").is_ok());
    }
}
