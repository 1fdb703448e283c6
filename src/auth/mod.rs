pub mod authorizor;
mod credential;
mod identity;
mod user;

pub use credential::Passphrase;
pub use identity::{IdentityProvider, Sessions, StaticIdentity};
pub use user::User;
