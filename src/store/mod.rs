mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;

pub const ADMIN_IDENTITIES_KEY: &str = "admin_identities";
pub const ADMIN_MODE_KEY: &str = "admin_mode";
pub const ADMIN_LAST_LOGIN_KEY: &str = "admin_last_login";

/// Record collections known to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    SavedRoutes,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Self::SavedRoutes => "saved_routes",
        }
    }
}

/// Durable keyed storage behind the admin and history services.
///
/// Missing keys read as empty values. `list_records` returns records newest
/// first and `delete_record` fails with `record_not_found_error` for an
/// unknown id.
#[async_trait]
pub trait RecordStore {
    async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>, Error>;
    async fn set_string_set(&self, key: &str, set: &BTreeSet<String>) -> Result<(), Error>;

    async fn get_flag(&self, key: &str) -> Result<bool, Error>;
    async fn set_flag(&self, key: &str, value: bool) -> Result<(), Error>;

    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, Error>;
    async fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> Result<(), Error>;

    async fn insert_record(
        &self,
        collection: Collection,
        id: Uuid,
        created_date: DateTime<Utc>,
        data: Value,
    ) -> Result<(), Error>;
    async fn find_record(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, Error>;
    async fn list_records(&self, collection: Collection) -> Result<Vec<Value>, Error>;
    async fn delete_record(&self, collection: Collection, id: Uuid) -> Result<(), Error>;
}

pub type DynStore = Arc<dyn RecordStore + Send + Sync>;
