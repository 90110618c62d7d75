use crate::errors::{Error, Result, ValidationError};
use crate::members::members_model::{normalize_email, Member, MemberAccount, NewMember};
use crate::members::members_traits::{MemberRepositoryTrait, MemberServiceTrait};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

pub struct MemberService {
    member_repo: Arc<dyn MemberRepositoryTrait>,
}

impl MemberService {
    pub fn new(member_repo: Arc<dyn MemberRepositoryTrait>) -> Self {
        MemberService { member_repo }
    }
}

#[async_trait]
impl MemberServiceTrait for MemberService {
    fn list_members(&self) -> Result<Vec<Member>> {
        self.member_repo.list_members()
    }

    fn find_by_email(&self, email: &str) -> Result<Option<MemberAccount>> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(None);
        }
        self.member_repo.find_by_email(&email)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<MemberAccount>> {
        self.member_repo.find_by_id(id)
    }

    async fn update_password(&self, id: i32, password_hash: String) -> Result<()> {
        if password_hash.is_empty() {
            return Err(ValidationError::MissingField("password_hash".to_string()).into());
        }
        self.member_repo.update_password(id, password_hash).await
    }

    async fn upsert_member(&self, new_member: NewMember) -> Result<MemberAccount> {
        let name = new_member.name.trim().to_string();
        let email = normalize_email(&new_member.email);
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if email.is_empty() || !email.contains('@') {
            return Err(Error::invalid_input(format!(
                "Invalid email address: {}",
                new_member.email
            )));
        }

        let account = self
            .member_repo
            .upsert_member(NewMember {
                name,
                email,
                password_hash: new_member.password_hash,
            })
            .await?;
        info!("Upserted member {} ({})", account.id, account.email);
        Ok(account)
    }
}
