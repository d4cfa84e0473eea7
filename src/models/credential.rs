//! Caller credentials and the per-request identity derived from them.
//!
//! Neither type is ever stored on a long-lived component: the orchestrator
//! builds them for one operation and passes them by reference into every
//! backend call. Their `Debug` output redacts the password.

use std::fmt;

/// A username/password pair as supplied by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// The backend login.
    pub username: String,
    /// The backend password.
    pub password: String,
}

impl Credential {
    /// Creates a credential.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated backend user for the duration of a single operation.
///
/// The RPC channel needs only `uid` and `password`; `username` is kept
/// when the caller supplied it, because the document session logs in by
/// name rather than by id.
///
/// # Example
///
/// ```
/// use colillas::models::SessionIdentity;
///
/// let identity = SessionIdentity::new(7, "s3cret").with_username("admin");
/// assert_eq!(identity.uid, 7);
/// assert_eq!(identity.username.as_deref(), Some("admin"));
/// assert!(!format!("{:?}", identity).contains("s3cret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// The backend user id.
    pub uid: i64,
    /// The backend login, when known.
    pub username: Option<String>,
    /// The backend password.
    pub password: String,
}

impl SessionIdentity {
    /// Creates an identity from a user id and password.
    pub fn new(uid: i64, password: impl Into<String>) -> Self {
        Self {
            uid,
            username: None,
            password: password.into(),
        }
    }

    /// Attaches the login name to this identity.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Returns the credential for a login handshake, if the username is known
    /// and non-empty.
    pub fn credential(&self) -> Option<Credential> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| Credential::new(name, self.password.clone()))
    }
}

impl fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("uid", &self.uid)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
