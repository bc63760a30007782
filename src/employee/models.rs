use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the employees table; JSON and column names are the flat lowercase forms.
///
/// Every field defaults, so partial bodies are accepted and the missing fields
/// are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    pub id: i64,
    #[serde(rename = "lastname")]
    #[sqlx(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "firstname")]
    #[sqlx(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "middlename")]
    #[sqlx(rename = "middlename")]
    pub middle_name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    #[serde(rename = "phonenumber")]
    #[sqlx(rename = "phonenumber")]
    pub phone_number: String,
    #[serde(rename = "hiredate")]
    #[sqlx(rename = "hiredate")]
    pub hire_date: String, // kept as the client sent it
    pub status: String,
    #[serde(rename = "photourl")]
    #[sqlx(rename = "photourl")]
    pub photo_url: String,
    pub notes: String,
}
