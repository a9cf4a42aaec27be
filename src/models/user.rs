use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// A registered account as kept in the user registry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Registry ID, assigned as max(existing) + 1
    pub id: u32,
    pub username: String,
    pub email: String,
    /// Argon2id hash in PHC string format
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn new(id: u32, username: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            role,
        }
    }

    /// Public view of the account, without credentials
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_excludes_credentials() {
        let user = User::new(
            7,
            "ana".to_string(),
            "ana@example.com".to_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            Role::User,
        );

        let json = serde_json::to_string(&user.profile()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
