//! Database models for roster members.

use diesel::prelude::*;

use alphasigma_core::members::{Member, MemberAccount};

/// Database model for users
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub force_password_change: bool,
    pub created_at: String,
}

/// Database model for inserting a user
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub force_password_change: bool,
    pub created_at: String,
}

impl From<UserDB> for MemberAccount {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            password_hash: db.password_hash,
            force_password_change: db.force_password_change,
        }
    }
}

impl From<UserDB> for Member {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
        }
    }
}
