//! Members module - roster models, services, and traits.

mod members_model;
mod members_service;
mod members_traits;

pub use members_model::{normalize_email, Member, MemberAccount, NewMember};
pub use members_service::MemberService;
pub use members_traits::{MemberRepositoryTrait, MemberServiceTrait};
