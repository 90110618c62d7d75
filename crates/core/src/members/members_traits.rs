use crate::errors::Result;
use crate::members::members_model::{Member, MemberAccount, NewMember};
use async_trait::async_trait;

/// Trait for member repository operations
#[async_trait]
pub trait MemberRepositoryTrait: Send + Sync {
    fn list_members(&self) -> Result<Vec<Member>>;
    /// Expects an already normalized email.
    fn find_by_email(&self, email: &str) -> Result<Option<MemberAccount>>;
    fn find_by_id(&self, id: i32) -> Result<Option<MemberAccount>>;
    /// Stores a new hash and clears the forced-change flag.
    async fn update_password(&self, id: i32, password_hash: String) -> Result<()>;
    /// Inserts the member, or refreshes name and hash when the email exists.
    async fn upsert_member(&self, new_member: NewMember) -> Result<MemberAccount>;
}

/// Trait for member service operations
#[async_trait]
pub trait MemberServiceTrait: Send + Sync {
    fn list_members(&self) -> Result<Vec<Member>>;
    fn find_by_email(&self, email: &str) -> Result<Option<MemberAccount>>;
    fn find_by_id(&self, id: i32) -> Result<Option<MemberAccount>>;
    async fn update_password(&self, id: i32, password_hash: String) -> Result<()>;
    async fn upsert_member(&self, new_member: NewMember) -> Result<MemberAccount>;
}
