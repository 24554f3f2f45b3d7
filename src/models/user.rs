use serde::{Deserialize, Serialize};

/// Authenticated user as reported by the external identity provider.
/// Identity is verified upstream; nothing here re-checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub image_url: Option<String>,
}

impl Identity {
    /// Name shown on the participant tile.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// Claim set the hosted video service verifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamClaims {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Request body for POST /api/stream-token
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default, rename = "userId")]
    pub user_id: String,
}

/// Response body for POST /api/stream-token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        let user = Identity {
            id: "u1".to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            username: Some("ada".to_string()),
            image_url: None,
        };
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_username_then_anonymous() {
        let mut user = Identity {
            id: "u1".to_string(),
            full_name: None,
            username: Some("ada".to_string()),
            image_url: None,
        };
        assert_eq!(user.display_name(), "ada");

        user.username = None;
        assert_eq!(user.display_name(), "Anonymous");
    }
}
