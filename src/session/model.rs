//! Canonical session record.

use serde::{Deserialize, Serialize};

/// The two signup personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Educator,
}

impl UserType {
    /// Parse a server-provided role string. Anything that is not
    /// `"educator"` is treated as a student, matching the server's own
    /// fallback.
    pub fn from_role(role: &str) -> Self {
        if role.eq_ignore_ascii_case("educator") {
            Self::Educator
        } else {
            Self::Student
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Educator => "educator",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated user, as held by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Photo key or URL; empty when the server provides none.
    #[serde(default)]
    pub photo: String,
}

/// Canonical client-held session.
///
/// Persisted as a single JSON record `{user, token, userType}` regardless
/// of which response shape produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub token: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}
