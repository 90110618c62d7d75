//! Member domain models.

use serde::{Deserialize, Serialize};

/// Public view of a roster member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: i32,
    pub name: String,
}

/// A member together with their credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccount {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub force_password_change: bool,
}

impl From<&MemberAccount> for Member {
    fn from(account: &MemberAccount) -> Self {
        Member {
            id: account.id,
            name: account.name.clone(),
        }
    }
}

/// Input model for creating or refreshing a roster member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
