use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Collection, RecordStore};
use crate::error::{invalid_input_error, record_not_found_error, Error};

struct StoredRecord {
    id: Uuid,
    created_date: DateTime<Utc>,
    data: Value,
}

#[derive(Default)]
struct State {
    string_sets: HashMap<String, BTreeSet<String>>,
    flags: HashMap<String, bool>,
    timestamps: HashMap<String, DateTime<Utc>>,
    records: HashMap<Collection, Vec<StoredRecord>>,
}

/// Process-local record store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>, Error> {
        let state = self.state.lock().await;
        Ok(state.string_sets.get(key).cloned().unwrap_or_default())
    }

    async fn set_string_set(&self, key: &str, set: &BTreeSet<String>) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.string_sets.insert(key.into(), set.clone());
        Ok(())
    }

    async fn get_flag(&self, key: &str) -> Result<bool, Error> {
        let state = self.state.lock().await;
        Ok(state.flags.get(key).copied().unwrap_or(false))
    }

    async fn set_flag(&self, key: &str, value: bool) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.flags.insert(key.into(), value);
        Ok(())
    }

    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, Error> {
        let state = self.state.lock().await;
        Ok(state.timestamps.get(key).copied())
    }

    async fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.timestamps.insert(key.into(), value);
        Ok(())
    }

    async fn insert_record(
        &self,
        collection: Collection,
        id: Uuid,
        created_date: DateTime<Utc>,
        data: Value,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        let records = state.records.entry(collection).or_default();

        // mirrors the primary key constraint of the postgres tables
        if records.iter().any(|record| record.id == id) {
            return Err(invalid_input_error());
        }

        records.push(StoredRecord {
            id,
            created_date,
            data,
        });

        Ok(())
    }

    async fn find_record(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, Error> {
        let state = self.state.lock().await;

        let maybe_record = state
            .records
            .get(&collection)
            .and_then(|records| records.iter().find(|record| record.id == id));

        Ok(maybe_record.map(|record| record.data.clone()))
    }

    async fn list_records(&self, collection: Collection) -> Result<Vec<Value>, Error> {
        let state = self.state.lock().await;

        let mut records: Vec<&StoredRecord> = match state.records.get(&collection) {
            Some(records) => records.iter().collect(),
            None => return Ok(vec![]),
        };

        // id breaks ties so equal timestamps keep a stable order
        records.sort_by(|a, b| (b.created_date, b.id).cmp(&(a.created_date, a.id)));

        Ok(records.into_iter().map(|record| record.data.clone()).collect())
    }

    async fn delete_record(&self, collection: Collection, id: Uuid) -> Result<(), Error> {
        let mut state = self.state.lock().await;

        let records = state
            .records
            .get_mut(&collection)
            .ok_or_else(record_not_found_error)?;

        let position = records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(record_not_found_error)?;

        records.remove(position);

        Ok(())
    }
}

#[test]
fn missing_keys_read_as_empty_test() {
    use tokio_test::block_on;

    let store = MemoryStore::new();

    assert!(block_on(store.get_string_set("admins")).unwrap().is_empty());
    assert_eq!(block_on(store.get_flag("admin_mode")).unwrap(), false);
    assert_eq!(block_on(store.get_timestamp("last_login")).unwrap(), None);
}

#[test]
fn list_records_newest_first_test() {
    use chrono::Duration;
    use serde_json::json;
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let now = Utc::now();

    for (offset, name) in [(3, "oldest"), (0, "newest"), (1, "middle")] {
        block_on(store.insert_record(
            Collection::SavedRoutes,
            Uuid::new_v4(),
            now - Duration::days(offset),
            json!({ "name": name }),
        ))
        .unwrap();
    }

    let records = block_on(store.list_records(Collection::SavedRoutes)).unwrap();

    assert_eq!(
        records,
        vec![
            json!({"name": "newest"}),
            json!({"name": "middle"}),
            json!({"name": "oldest"})
        ]
    );
}

#[test]
fn list_records_equal_timestamps_test() {
    use serde_json::json;
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let now = Utc::now();

    let mut ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();

    for id in &ids {
        block_on(store.insert_record(Collection::SavedRoutes, *id, now, json!({ "id": id }))).unwrap();
    }

    let first = block_on(store.list_records(Collection::SavedRoutes)).unwrap();
    let second = block_on(store.list_records(Collection::SavedRoutes)).unwrap();
    assert_eq!(first, second);

    ids.sort();
    ids.reverse();
    let expected: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    assert_eq!(first, expected);
}

#[test]
fn delete_record_test() {
    use serde_json::json;
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let id = Uuid::new_v4();

    block_on(store.insert_record(Collection::SavedRoutes, id, Utc::now(), json!({}))).unwrap();

    block_on(store.delete_record(Collection::SavedRoutes, id)).unwrap();
    assert!(block_on(store.find_record(Collection::SavedRoutes, id))
        .unwrap()
        .is_none());

    let err = block_on(store.delete_record(Collection::SavedRoutes, id)).unwrap_err();
    assert_eq!(err.code, 102);
}
