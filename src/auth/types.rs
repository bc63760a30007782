use serde::{Deserialize, Serialize};

/// Role value that passes the admin gate
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub username: String,
    pub role: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Login request body. Absent fields decode as empty strings.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response structure for the login endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
}
