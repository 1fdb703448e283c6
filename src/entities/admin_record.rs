use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::store::{RecordStore, ADMIN_IDENTITIES_KEY, ADMIN_LAST_LOGIN_KEY, ADMIN_MODE_KEY};

/// Admin state shared by every identity on this device.
///
/// `identities` is the durable admin set, `admin_mode` the global grant that
/// is also set when an admin logs in without a signed-in identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminRecord {
    pub identities: BTreeSet<String>,
    pub admin_mode: bool,
    pub last_login: Option<DateTime<Utc>>,
}

impl AdminRecord {
    #[tracing::instrument(name = "AdminRecord::load", skip_all)]
    pub async fn load(store: &(dyn RecordStore + Send + Sync)) -> Result<Self, Error> {
        Ok(Self {
            identities: store.get_string_set(ADMIN_IDENTITIES_KEY).await?,
            admin_mode: store.get_flag(ADMIN_MODE_KEY).await?,
            last_login: store.get_timestamp(ADMIN_LAST_LOGIN_KEY).await?,
        })
    }

    pub fn has_admin(&self, identity: String) -> bool {
        self.identities.contains(&identity)
    }

    /// Returns `false` when the identity was already an admin.
    pub fn grant(&mut self, identity: String) -> bool {
        self.identities.insert(identity)
    }

    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.admin_mode = true;
        self.last_login = Some(now);
    }
}

impl PolarClass for AdminRecord {
    fn get_polar_class_builder() -> oso::ClassBuilder<AdminRecord> {
        oso::Class::builder()
            .name("AdminRecord")
            .add_attribute_getter("admin_mode", |recv: &AdminRecord| recv.admin_mode)
            .add_method("has_admin", AdminRecord::has_admin)
    }

    fn get_polar_class() -> oso::Class {
        let builder = AdminRecord::get_polar_class_builder();
        builder.build()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthResult {
    Success,
    Failure { reason: AuthFailure },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    InvalidCredential,
    IdentityRequired,
}

impl AuthResult {
    pub fn failure(reason: AuthFailure) -> Self {
        Self::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[test]
fn grant_is_idempotent_test() {
    let mut record = AdminRecord::default();

    assert!(record.grant("uid-1".into()));
    assert!(!record.grant("uid-1".into()));
    assert_eq!(record.identities.len(), 1);
    assert!(record.has_admin("uid-1".into()));
    assert!(!record.has_admin("uid-2".into()));
}

#[test]
fn activate_test() {
    let mut record = AdminRecord::default();
    let now = Utc::now();

    record.activate(now);

    assert!(record.admin_mode);
    assert_eq!(record.last_login, Some(now));
    assert!(record.identities.is_empty());
}
