//! Loads the member roster into the database.
//!
//! ```text
//! AS_SEED_PASSWORD=... seed roster.json
//! ```
//!
//! Every member gets the same temporary password and must change it on first
//! login. Re-running the seed resets names and passwords for existing emails.

use std::path::PathBuf;
use std::sync::Arc;

use alphasigma_core::members::{MemberService, MemberServiceTrait, NewMember};
use alphasigma_server::{auth::hash_password, config::log_format_from_env, init_tracing};
use alphasigma_storage_sqlite::{db, MemberRepository};
use anyhow::Context;
use serde::Deserialize;

#[derive(Deserialize)]
struct RosterEntry {
    name: String,
    email: String,
}

fn roster_path() -> anyhow::Result<PathBuf> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AS_ROSTER_FILE").ok())
        .map(PathBuf::from)
        .context("Pass the roster file as the first argument or set AS_ROSTER_FILE")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(&log_format_from_env());

    let path = roster_path()?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read roster {}", path.display()))?;
    let roster: Vec<RosterEntry> =
        serde_json::from_str(&raw).with_context(|| format!("Invalid roster {}", path.display()))?;

    let password = std::env::var("AS_SEED_PASSWORD").context("AS_SEED_PASSWORD must be set")?;
    let password_hash = hash_password(&password)?;

    let db_path = std::env::var("AS_DB_PATH").unwrap_or_else(|_| "./db/app.db".to_string());
    let db_path = db::init(&db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());
    let members = MemberService::new(Arc::new(MemberRepository::new(pool, writer)));

    tracing::info!("Seeding {} members into {}", roster.len(), db_path);
    let mut failed = 0usize;
    for entry in roster {
        let result = members
            .upsert_member(NewMember {
                name: entry.name.clone(),
                email: entry.email.clone(),
                password_hash: password_hash.clone(),
            })
            .await;
        match result {
            Ok(account) => {
                tracing::info!("Seeded [{}] {} <{}>", account.id, account.name, account.email)
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Failed to seed {} <{}>: {}", entry.name, entry.email, e);
            }
        }
    }

    for member in members.list_members()? {
        tracing::info!("Member [{}] {}", member.id, member.name);
    }

    if failed > 0 {
        anyhow::bail!("{failed} roster entries could not be seeded");
    }
    Ok(())
}
