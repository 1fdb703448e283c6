use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use uuid::Uuid;

use crate::auth::IdentityProvider;
use crate::entities::{
    AdminRecord, AuthResult, DeleteOutcome, HistorySummary, RouteData, SavedRoute,
};
use crate::error::Error;

#[async_trait]
pub trait AdminAPI {
    /// Grants admin to the identity the caller is signed in as, if any.
    async fn authenticate(
        &self,
        identity: &(dyn IdentityProvider + Send + Sync),
        credential: SecretString,
    ) -> Result<AuthResult, Error>;
    async fn is_admin(&self, identity: &str) -> Result<bool, Error>;
    async fn admin_record(&self) -> Result<AdminRecord, Error>;
}

#[async_trait]
pub trait HistoryAPI {
    fn summarize(&self, routes: &[SavedRoute]) -> HistorySummary;
    async fn delete_at(
        &self,
        routes: &[SavedRoute],
        indices: &BTreeSet<usize>,
    ) -> Vec<DeleteOutcome>;
    fn reconstruct(&self, route: &SavedRoute) -> RouteData;

    async fn save_route(
        &self,
        route: RouteData,
        route_name: Option<String>,
    ) -> Result<SavedRoute, Error>;
    async fn list_routes(&self) -> Result<Vec<SavedRoute>, Error>;
    async fn find_route(&self, id: Uuid) -> Result<SavedRoute, Error>;
    async fn history_summary(&self) -> Result<HistorySummary, Error>;
}

pub trait API: AdminAPI + HistoryAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
