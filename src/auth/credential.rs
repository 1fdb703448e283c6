use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{invalid_config_error, Error};

/// The shared admin passphrase. Never empty or whitespace only.
pub struct Passphrase(SecretString);

impl Passphrase {
    pub fn new(secret: SecretString) -> Result<Self, Error> {
        if secret.expose_secret().trim().is_empty() {
            return Err(invalid_config_error("ADMIN_PASSPHRASE"));
        }

        Ok(Self(secret))
    }

    /// An empty candidate never matches.
    pub fn matches(&self, candidate: &SecretString) -> bool {
        let candidate = candidate.expose_secret();

        !candidate.is_empty() && constant_time_compare(self.0.expose_secret(), candidate)
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn constant_time_compare_test() {
        assert!(constant_time_compare("", ""));
        assert!(constant_time_compare("open sesame", "open sesame"));
        assert!(!constant_time_compare("open sesame", "open sesamE"));
        assert!(!constant_time_compare("open sesame", "open"));
        assert!(!constant_time_compare("open", "open sesame"));
    }

    #[test]
    fn blank_passphrase_is_rejected_test() {
        for value in ["", " ", "\t\n"] {
            let err = Passphrase::new(secret(value)).unwrap_err();
            assert_eq!(err.code, 5);
        }
    }

    #[test]
    fn passphrase_matches_test() {
        let passphrase = Passphrase::new(secret("hunter2")).unwrap();

        assert!(passphrase.matches(&secret("hunter2")));
        assert!(!passphrase.matches(&secret("hunter3")));
        assert!(!passphrase.matches(&secret(" hunter2")));
        assert!(!passphrase.matches(&secret("")));
    }

    #[test]
    fn passphrase_debug_is_redacted_test() {
        let passphrase = Passphrase::new(secret("hunter2")).unwrap();

        assert!(!format!("{:?}", passphrase).contains("hunter2"));
    }
}
