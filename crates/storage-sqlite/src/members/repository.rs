use alphasigma_core::members::{Member, MemberAccount, MemberRepositoryTrait, NewMember};
use alphasigma_core::{Error, Result};

use super::model::{NewUserDB, UserDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::users;
use crate::schema::users::dsl;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;

pub struct MemberRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MemberRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MemberRepository { pool, writer }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    fn list_members(&self) -> Result<Vec<Member>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = dsl::users
            .order(dsl::id.asc())
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<MemberAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let row = dsl::users
            .filter(dsl::email.eq(email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(MemberAccount::from))
    }

    fn find_by_id(&self, id: i32) -> Result<Option<MemberAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let row = dsl::users
            .find(id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(MemberAccount::from))
    }

    async fn update_password(&self, id: i32, password_hash: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(dsl::users.find(id))
                    .set((
                        dsl::password_hash.eq(password_hash),
                        dsl::force_password_change.eq(false),
                    ))
                    .execute(conn)
                    .into_core()?;
                if updated == 0 {
                    return Err(Error::NotFound("User not found".to_string()));
                }
                Ok(())
            })
            .await
    }

    async fn upsert_member(&self, new_member: NewMember) -> Result<MemberAccount> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MemberAccount> {
                let row = NewUserDB {
                    name: new_member.name,
                    email: new_member.email,
                    password_hash: new_member.password_hash,
                    force_password_change: true,
                    created_at: Utc::now().to_rfc3339(),
                };

                let saved = diesel::insert_into(users::table)
                    .values(&row)
                    .on_conflict(users::email)
                    .do_update()
                    .set((
                        users::name.eq(&row.name),
                        users::password_hash.eq(&row.password_hash),
                        users::force_password_change.eq(true),
                    ))
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(MemberAccount::from(saved))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, init, run_migrations, spawn_writer};
    use tempfile::TempDir;

    fn setup() -> (TempDir, MemberRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("app.db");
        let db_path = init(path.to_str().unwrap()).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();
        let writer = spawn_writer((*pool).clone());
        (dir, MemberRepository::new(pool, writer))
    }

    fn new_member(name: &str, email: &str, hash: &str) -> NewMember {
        NewMember {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let (_dir, repo) = setup();

        let first = repo
            .upsert_member(new_member("Ada", "ada@example.com", "h1"))
            .await
            .unwrap();
        repo.update_password(first.id, "h2".to_string())
            .await
            .unwrap();
        assert!(!repo.find_by_id(first.id).unwrap().unwrap().force_password_change);

        let again = repo
            .upsert_member(new_member("Ada L.", "ada@example.com", "h3"))
            .await
            .unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.name, "Ada L.");
        assert_eq!(again.password_hash, "h3");
        assert!(again.force_password_change);
    }

    #[tokio::test]
    async fn test_list_members_ordered_by_id() {
        let (_dir, repo) = setup();
        repo.upsert_member(new_member("Grace", "grace@example.com", "h"))
            .await
            .unwrap();
        repo.upsert_member(new_member("Ada", "ada@example.com", "h"))
            .await
            .unwrap();

        let members = repo.list_members().unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Grace", "Ada"]);

        assert!(repo.find_by_email("ada@example.com").unwrap().is_some());
        assert!(repo.find_by_email("nobody@example.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_password_unknown_user() {
        let (_dir, repo) = setup();
        let err = repo.update_password(42, "h".to_string()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
