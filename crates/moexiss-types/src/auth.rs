//! Passport credentials and authentication outcome.

use serde::{Deserialize, Serialize};

/// Status code recorded when an attempt fails without an HTTP response.
pub const BAD_REQUEST: u16 = 400;

/// Status text recorded when the server answers but sets no passport cookie.
pub const PASSPORT_NOT_FOUND: &str = "Passport cookie not found";

/// MOEX Passport username and password.
///
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Last status of an authentication attempt.
///
/// Always populated, whether the attempt succeeded or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    /// HTTP status code, or [`BAD_REQUEST`] when no response was received.
    pub status: u16,
    /// `"OK"`, [`PASSPORT_NOT_FOUND`], the HTTP reason phrase, or an error description.
    pub message: String,
}

impl AuthResult {
    /// Creates a new result.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Result for a failure that produced no HTTP response.
    #[must_use]
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::new(BAD_REQUEST, message)
    }

    /// Returns true if the server answered with 200.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

impl std::fmt::Display for AuthResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("trader", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("trader"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_transport_failure_uses_bad_request() {
        let result = AuthResult::transport_failure("dns error");
        assert_eq!(result.status, 400);
        assert_eq!(result.message, "dns error");
        assert!(!result.is_ok());
    }
}
