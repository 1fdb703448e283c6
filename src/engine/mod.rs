mod admin_api;
mod history_api;

use oso::Oso;

use crate::{
    api::API,
    auth::authorizor,
    config::AdminSettings,
    error::Error,
    store::DynStore,
};

pub struct Engine {
    store: DynStore,
    admin: AdminSettings,
    authorizor: Oso,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(admin: AdminSettings, store: DynStore) -> Result<Self, Error> {
        Ok(Self {
            store,
            admin,
            authorizor: authorizor::new()?,
        })
    }
}

impl Engine {
    pub fn is_allowed<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<bool, Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        Ok(self.authorizor.is_allowed(actor, action, resource)?)
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use secrecy::SecretString;
    use serde_json::Value;
    use uuid::Uuid;

    use super::Engine;
    use crate::auth::Passphrase;
    use crate::config::AdminSettings;
    use crate::error::{database_error, store_write_error, Error};
    use crate::store::{Collection, DynStore, MemoryStore, RecordStore};

    pub const PASSPHRASE: &str = "correct horse battery staple";

    pub fn engine_with(store: DynStore, allow_anonymous: bool) -> Engine {
        let admin = AdminSettings {
            passphrase: Passphrase::new(SecretString::from(PASSPHRASE.to_string())).unwrap(),
            allow_anonymous,
        };

        Engine::new(admin, store).unwrap()
    }

    pub fn engine() -> (Engine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());

        (engine_with(store.clone(), true), store)
    }

    /// Wraps a [`MemoryStore`] and fails the writes it is told to.
    #[derive(Default)]
    pub struct FailingStore {
        pub inner: MemoryStore,
        fail_delete: Mutex<Option<Uuid>>,
        fail_flag_writes: AtomicBool,
    }

    impl FailingStore {
        pub fn fail_delete_of(&self, id: Uuid) {
            *self.fail_delete.lock().unwrap() = Some(id);
        }

        pub fn fail_flag_writes(&self) {
            self.fail_flag_writes.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>, Error> {
            self.inner.get_string_set(key).await
        }

        async fn set_string_set(&self, key: &str, set: &BTreeSet<String>) -> Result<(), Error> {
            self.inner.set_string_set(key, set).await
        }

        async fn get_flag(&self, key: &str) -> Result<bool, Error> {
            self.inner.get_flag(key).await
        }

        async fn set_flag(&self, key: &str, value: bool) -> Result<(), Error> {
            if self.fail_flag_writes.load(Ordering::SeqCst) {
                return Err(store_write_error("connection reset"));
            }

            self.inner.set_flag(key, value).await
        }

        async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, Error> {
            self.inner.get_timestamp(key).await
        }

        async fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> Result<(), Error> {
            self.inner.set_timestamp(key, value).await
        }

        async fn insert_record(
            &self,
            collection: Collection,
            id: Uuid,
            created_date: DateTime<Utc>,
            data: Value,
        ) -> Result<(), Error> {
            self.inner
                .insert_record(collection, id, created_date, data)
                .await
        }

        async fn find_record(
            &self,
            collection: Collection,
            id: Uuid,
        ) -> Result<Option<Value>, Error> {
            self.inner.find_record(collection, id).await
        }

        async fn list_records(&self, collection: Collection) -> Result<Vec<Value>, Error> {
            self.inner.list_records(collection).await
        }

        async fn delete_record(&self, collection: Collection, id: Uuid) -> Result<(), Error> {
            let fail_delete = *self.fail_delete.lock().unwrap();

            if fail_delete == Some(id) {
                return Err(database_error("connection reset"));
            }

            self.inner.delete_record(collection, id).await
        }
    }
}
