use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

/// One entry in the session transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Map coordinates for a resolved address
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Property as shown in the listing pane and on the map.
/// The whole set is replaced when a recommendation refresh lands;
/// entries are never merged with the previous set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayedProperty {
    pub id: String,
    pub name: String,
    pub description: String,
    pub match_score: f64,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Authenticated user for the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub access_token: String,
    pub is_guest: bool,
    pub guest_id: Option<String>,
}

impl UserAccount {
    /// Account for a registered login. Username and display name are derived
    /// from the email local part.
    pub fn registered(email: &str, user_id: i64, access_token: String) -> Self {
        let username = email
            .split_once('@')
            .map(|(local, _)| local)
            .unwrap_or(email)
            .to_string();
        let full_name = capitalize(&username);
        Self {
            user_id,
            email: email.to_string(),
            username,
            full_name,
            access_token,
            is_guest: false,
            guest_id: None,
        }
    }

    /// Anonymous guest account with the fixed guest identity.
    pub fn guest(user_id: i64, guest_id: Option<String>, access_token: String) -> Self {
        Self {
            user_id,
            email: "guest@propbot.com".to_string(),
            username: "guest".to_string(),
            full_name: "Guest User".to_string(),
            access_token,
            is_guest: true,
            guest_id,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_account_derives_names_from_email() {
        let account = UserAccount::registered("alice@example.com", 7, "tok".to_string());
        assert_eq!(account.username, "alice");
        assert_eq!(account.full_name, "Alice");
        assert!(!account.is_guest);
        assert!(account.guest_id.is_none());
    }

    #[test]
    fn guest_account_uses_fixed_identity() {
        let account = UserAccount::guest(3, Some("g-123".to_string()), "tok".to_string());
        assert_eq!(account.email, "guest@propbot.com");
        assert_eq!(account.full_name, "Guest User");
        assert!(account.is_guest);
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(Role::System.to_string(), "system");
    }
}
