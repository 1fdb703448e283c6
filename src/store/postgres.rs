use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde_json::Value;
use sqlx::{types::Json, Executor, Pool, Postgres, Row};
use uuid::Uuid;

use super::{Collection, RecordStore};
use crate::error::{record_not_found_error, store_write_error, Error};

type Database = Postgres;

#[derive(Debug)]
pub struct PgRecordStore {
    pool: Pool<Database>,
}

impl PgRecordStore {
    #[tracing::instrument(name = "PgRecordStore::new", skip_all)]
    pub async fn new(pool: Pool<Database>) -> Result<Self, Error> {
        // key value service
        pool.execute("CREATE TABLE IF NOT EXISTS string_sets (key VARCHAR PRIMARY KEY, data JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS flags (key VARCHAR PRIMARY KEY, value BOOLEAN NOT NULL)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS timestamps (key VARCHAR PRIMARY KEY, value TIMESTAMPTZ NOT NULL)")
            .await?;

        // route history
        pool.execute("CREATE TABLE IF NOT EXISTS saved_routes (id UUID PRIMARY KEY, created_date TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)")
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[tracing::instrument(skip(self))]
    async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM string_sets WHERE key = $1").bind(key))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(set) = result.try_get("data")?;
                Ok(set)
            }
            None => Ok(BTreeSet::new()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn set_string_set(&self, key: &str, set: &BTreeSet<String>) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO string_sets (key, data) VALUES ($1, $2) ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data",
            )
            .bind(key)
            .bind(Json(set)),
        )
        .await
        .map_err(store_write_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_flag(&self, key: &str) -> Result<bool, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT value FROM flags WHERE key = $1").bind(key))
            .await?;

        match maybe_result {
            Some(result) => Ok(result.try_get("value")?),
            None => Ok(false),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn set_flag(&self, key: &str, value: bool) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO flags (key, value) VALUES ($1, $2) ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            )
            .bind(key)
            .bind(value),
        )
        .await
        .map_err(store_write_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT value FROM timestamps WHERE key = $1").bind(key))
            .await?;

        match maybe_result {
            Some(result) => Ok(Some(result.try_get("value")?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO timestamps (key, value) VALUES ($1, $2) ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            )
            .bind(key)
            .bind(value),
        )
        .await
        .map_err(store_write_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self, data))]
    async fn insert_record(
        &self,
        collection: Collection,
        id: Uuid,
        created_date: DateTime<Utc>,
        data: Value,
    ) -> Result<(), Error> {
        let query = format!(
            "INSERT INTO {} (id, created_date, data) VALUES ($1, $2, $3)",
            collection.table()
        );

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(&query)
                .bind(&id)
                .bind(created_date)
                .bind(Json(&data)),
        )
        .await
        .map_err(store_write_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_record(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, Error> {
        let query = format!("SELECT data FROM {} WHERE id = $1", collection.table());

        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query(&query).bind(&id))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(data) = result.try_get("data")?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_records(&self, collection: Collection) -> Result<Vec<Value>, Error> {
        let query = format!(
            "SELECT data FROM {} ORDER BY created_date DESC, id DESC",
            collection.table()
        );

        let mut conn = self.pool.acquire().await?;
        let mut results = conn.fetch(sqlx::query(&query));

        let mut records = Vec::new();

        while let Some(row) = results.try_next().await? {
            let Json(data) = row.try_get("data")?;
            records.push(data);
        }

        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_record(&self, collection: Collection, id: Uuid) -> Result<(), Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", collection.table());

        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(sqlx::query(&query).bind(&id))
            .await
            .map_err(store_write_error)?;

        if result.rows_affected() == 0 {
            return Err(record_not_found_error());
        }

        Ok(())
    }
}
