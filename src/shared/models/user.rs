use serde::{Deserialize, Serialize};

/// An entry of the read-only teammate directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    pub email: String,
    pub role: String,
    /// Initials shown in place of a picture.
    pub avatar: String,
}
