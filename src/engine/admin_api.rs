use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;

use crate::{
    api::AdminAPI,
    auth::{IdentityProvider, User},
    entities::{AdminRecord, AuthFailure, AuthResult},
    error::Error,
    store::{ADMIN_IDENTITIES_KEY, ADMIN_LAST_LOGIN_KEY, ADMIN_MODE_KEY},
};

#[async_trait]
impl AdminAPI for Engine {
    #[tracing::instrument(skip_all)]
    async fn authenticate(
        &self,
        identity: &(dyn IdentityProvider + Send + Sync),
        credential: SecretString,
    ) -> Result<AuthResult, Error> {
        let matched = self.admin.passphrase.matches(&credential);
        drop(credential);

        if !matched {
            tracing::warn!("admin passphrase rejected");
            return Ok(AuthResult::failure(AuthFailure::InvalidCredential));
        }

        let mut record = AdminRecord::load(self.store.as_ref()).await?;

        match identity.current_identity().await {
            Some(identity) => {
                if record.grant(identity.clone()) {
                    self.store
                        .set_string_set(ADMIN_IDENTITIES_KEY, &record.identities)
                        .await?;
                    tracing::info!("granted admin to {}", identity);
                } else {
                    tracing::info!("{} is already an admin", identity);
                }
            }
            None if self.admin.allow_anonymous => {
                tracing::info!("no signed-in identity, enabling admin mode only");
            }
            None => {
                tracing::warn!("no signed-in identity and anonymous admin is disabled");
                return Ok(AuthResult::failure(AuthFailure::IdentityRequired));
            }
        }

        let now = Utc::now();
        record.activate(now);

        self.store.set_flag(ADMIN_MODE_KEY, record.admin_mode).await?;
        self.store.set_timestamp(ADMIN_LAST_LOGIN_KEY, now).await?;

        Ok(AuthResult::Success)
    }

    #[tracing::instrument(skip(self))]
    async fn is_admin(&self, identity: &str) -> Result<bool, Error> {
        let record = AdminRecord::load(self.store.as_ref()).await?;

        self.is_allowed(User::new(identity), "administer", record)
    }

    #[tracing::instrument(skip(self))]
    async fn admin_record(&self) -> Result<AdminRecord, Error> {
        AdminRecord::load(self.store.as_ref()).await
    }
}
