use std::env::{self, VarError};
use std::net::SocketAddr;
use std::str::FromStr;

use secrecy::SecretString;

use crate::auth::Passphrase;
use crate::error::{invalid_config_error, Error};

#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: SocketAddr,
    pub admin: AdminSettings,
}

#[derive(Debug)]
pub struct AdminSettings {
    pub passphrase: Passphrase,
    /// Grants admin mode when the passphrase matches but nobody is signed in.
    pub allow_anonymous: bool,
}

impl Config {
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        let passphrase = SecretString::from(env::var("ADMIN_PASSPHRASE")?);

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            listen_addr: parse_var("LISTEN_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            admin: AdminSettings {
                passphrase: Passphrase::new(passphrase)?,
                allow_anonymous: parse_var("ALLOW_ANONYMOUS_ADMIN", true)?,
            },
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, Error> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| invalid_config_error(name)),
        Err(VarError::NotPresent) => Ok(default),
        Err(err) => Err(err.into()),
    }
}

#[test]
fn parse_var_test() {
    // names are unique to this test so parallel tests never observe them
    env::set_var("ROUTEBOOK_TEST_PORT", " 8080 ");
    env::set_var("ROUTEBOOK_TEST_FLAG", "maybe");

    assert_eq!(parse_var("ROUTEBOOK_TEST_PORT", 0u16).unwrap(), 8080);
    assert_eq!(parse_var("ROUTEBOOK_TEST_MISSING", 5u32).unwrap(), 5);
    assert_eq!(parse_var("ROUTEBOOK_TEST_FLAG", true).unwrap_err().code, 5);
}

#[test]
fn blank_admin_passphrase_test() {
    // the only test that reads these variables
    env::set_var("DATABASE_URL", "postgres://localhost/routebook");
    env::set_var("ADMIN_PASSPHRASE", "   ");

    let err = Config::from_env().unwrap_err();
    assert_eq!(err.code, 5);
    assert_eq!(err.message, "invalid configuration value for ADMIN_PASSPHRASE");
}
