use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the users table. The password is stored and returned as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
}
