//! Single-account login.
//!
//! There is exactly one valid username/password pair, taken from the
//! configuration. A successful login yields a fresh opaque session token.

use microtutor_core::{Result, TutorError};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns a new session token when both values match the configured pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        if username == self.username && password == self.password {
            Ok(Uuid::new_v4().to_string())
        } else {
            Err(TutorError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pair_issues_distinct_tokens() {
        let credentials = Credentials::new("student1", "test123");
        let first = credentials.authenticate("student1", "test123").unwrap();
        let second = credentials.authenticate("student1", "test123").unwrap();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_any_mismatch_is_rejected() {
        let credentials = Credentials::new("student1", "test123");
        for (user, pass) in [("student1", "wrong"), ("student2", "test123"), ("", "")] {
            assert!(matches!(
                credentials.authenticate(user, pass),
                Err(TutorError::InvalidCredentials)
            ));
        }
    }
}
