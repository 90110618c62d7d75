use alphasigma_core::portfolio::holdings::{Holding, HoldingDraft, HoldingRepositoryTrait};
use alphasigma_core::{Error, Result};

use super::model::{HoldingDB, NewHoldingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::holdings;
use crate::schema::holdings::dsl;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use std::sync::Arc;

fn into_domain(rows: Vec<HoldingDB>) -> Result<Vec<Holding>> {
    rows.into_iter()
        .map(|row| Holding::try_from(row).map_err(Error::from))
        .collect()
}

pub struct HoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        HoldingRepository { pool, writer }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    fn list_open_holdings(&self, user_id: i32) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = dsl::holdings
            .filter(dsl::user_id.eq(user_id))
            .filter(dsl::closed_at.is_null())
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;
        into_domain(rows)
    }

    fn list_closed_holdings(&self, user_id: i32) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = dsl::holdings
            .filter(dsl::user_id.eq(user_id))
            .filter(dsl::closed_at.is_not_null())
            .order((dsl::closed_at.desc(), dsl::id.desc()))
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;
        into_domain(rows)
    }

    fn get_holding(&self, holding_id: i32) -> Result<Option<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let row = dsl::holdings
            .find(holding_id)
            .select(HoldingDB::as_select())
            .first::<HoldingDB>(&mut conn)
            .optional()
            .into_core()?;
        row.map(|r| Holding::try_from(r).map_err(Error::from))
            .transpose()
    }

    async fn insert_holding(&self, draft: HoldingDraft) -> Result<Holding> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                let row: NewHoldingDB = draft.into();
                let saved = diesel::insert_into(holdings::table)
                    .values(&row)
                    .returning(HoldingDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Holding::try_from(saved)?)
            })
            .await
    }

    async fn delete_holding(&self, holding_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(dsl::holdings.find(holding_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn close_holding(
        &self,
        holding_id: i32,
        close_price: Decimal,
        closed_at: DateTime<Utc>,
    ) -> Result<Holding> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                // Guarded on closed_at so a concurrent close cannot overwrite the first one.
                let updated = diesel::update(
                    dsl::holdings
                        .find(holding_id)
                        .filter(dsl::closed_at.is_null()),
                )
                .set((
                    dsl::close_price.eq(Some(close_price.to_string())),
                    dsl::closed_at.eq(Some(closed_at.to_rfc3339())),
                ))
                .returning(HoldingDB::as_returning())
                .get_result(conn)
                .optional()
                .into_core()?;

                match updated {
                    Some(row) => Ok(Holding::try_from(row)?),
                    None => {
                        let exists = dsl::holdings
                            .find(holding_id)
                            .select(dsl::id)
                            .first::<i32>(conn)
                            .optional()
                            .into_core()?
                            .is_some();
                        if exists {
                            Err(Error::ConstraintViolation(
                                "Holding is already closed".to_string(),
                            ))
                        } else {
                            Err(Error::NotFound("Holding not found".to_string()))
                        }
                    }
                }
            })
            .await
    }
}
