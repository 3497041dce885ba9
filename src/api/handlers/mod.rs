pub mod health;
pub use self::health::health;

pub mod signup;
pub use self::signup::signup;

pub mod login;
pub use self::login::login;

pub mod users;
pub use self::users::{delete_user, get_user, list_users, update_password};

pub mod stats;
pub use self::stats::stats;

// common types and functions for the handlers
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON reply body shared by every endpoint that answers with a message.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_present() {
        assert!(is_present("a@x.com"));
        assert!(!is_present(""));
        assert!(!is_present("   "));
        assert!(!is_present("\t\n"));
    }

    #[test]
    fn test_api_message_serializes() {
        let message = ApiMessage::new("Signup successful");
        let json = serde_json::to_string(&message).expect("message should serialize");
        assert_eq!(json, r#"{"message":"Signup successful"}"#);
    }
}
