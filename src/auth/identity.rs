use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Supplies the stable id of the signed-in user, if any.
#[async_trait]
pub trait IdentityProvider {
    async fn current_identity(&self) -> Option<String>;
}

/// Always reports the same identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticIdentity(pub Option<String>);

impl StaticIdentity {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_identity(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Signed-in identities keyed by session token.
#[derive(Debug, Default)]
pub struct Sessions {
    tokens: RwLock<HashMap<Uuid, String>>,
}

impl Sessions {
    #[tracing::instrument(skip(self))]
    pub async fn sign_in(&self, id: String) -> Uuid {
        let token = Uuid::new_v4();
        self.tokens.write().await.insert(token, id);

        token
    }

    /// Returns false when the token was not signed in.
    #[tracing::instrument(skip_all)]
    pub async fn sign_out(&self, token: Uuid) -> bool {
        self.tokens.write().await.remove(&token).is_some()
    }

    pub async fn identity(&self, token: Uuid) -> Option<String> {
        self.tokens.read().await.get(&token).cloned()
    }
}

#[test]
fn sessions_test() {
    use tokio_test::block_on;

    let sessions = Sessions::default();

    let first = block_on(sessions.sign_in("uid-7".into()));
    let second = block_on(sessions.sign_in("uid-8".into()));
    assert_ne!(first, second);

    assert_eq!(block_on(sessions.identity(first)), Some("uid-7".into()));
    assert_eq!(block_on(sessions.identity(second)), Some("uid-8".into()));
    assert_eq!(block_on(sessions.identity(Uuid::new_v4())), None);

    assert!(block_on(sessions.sign_out(first)));
    assert!(!block_on(sessions.sign_out(first)));
    assert_eq!(block_on(sessions.identity(first)), None);
    assert_eq!(block_on(sessions.identity(second)), Some("uid-8".into()));
}
