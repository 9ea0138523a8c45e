use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EntityModel, Result};

/// The registration state of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    Registered,
    Active,
    Locked,
}

/// A user of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_modified: Option<String>,
    pub slug: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub state: UserState,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.state == UserState::Active
    }

    pub fn is_locked(&self) -> bool {
        self.state == UserState::Locked
    }
}

impl EntityModel for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Parses a user from the server's JSON representation.
pub fn parse_user(raw: Value) -> Result<User> {
    Ok(serde_json::from_value(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_the_wire_representation() {
        let user = parse_user(json!({
            "id": "u-1",
            "version": 3,
            "slug": "jane-doe",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "state": "active"
        }))
        .unwrap();

        assert_eq!(user.id, "u-1");
        assert!(user.is_active());
        assert_eq!(user.avatar_url, None);
    }
}
