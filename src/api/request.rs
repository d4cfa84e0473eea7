//! Request types for the colillas API.
//!
//! Every endpoint takes a JSON body. Credentials travel in each body; none
//! of them outlive the request.

use serde::{Deserialize, Serialize};

use crate::models::{Credential, SessionIdentity};

/// Request body for `POST /api/v1/auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Backend login.
    pub username: String,
    /// Backend password.
    pub password: String,
}

impl LoginRequest {
    /// The credential to check.
    pub fn credential(&self) -> Credential {
        Credential::new(self.username.clone(), self.password.clone())
    }
}

/// Request body for `POST /api/v1/nomina/lotes`.
#[derive(Clone, Serialize, Deserialize)]
pub struct BatchListRequest {
    /// User id returned by the login endpoint.
    pub uid: i64,
    /// Backend password.
    pub password: String,
}

impl BatchListRequest {
    /// The identity the listing runs as.
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity::new(self.uid, self.password.clone())
    }
}

/// Request body for `POST /api/v1/nomina/print`.
#[derive(Clone, Serialize, Deserialize)]
pub struct PrintRequest {
    /// User id returned by the login endpoint.
    pub uid: i64,
    /// Backend password.
    pub password: String,
    /// The payroll batch to print.
    pub lot_id: i64,
    /// Backend login, needed to open the document session.
    pub username: String,
}

impl PrintRequest {
    /// The identity the render runs as.
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity::new(self.uid, self.password.clone()).with_username(self.username.clone())
    }
}

macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("password", &"<redacted>")
                    .finish()
            }
        }
    };
}

redacted_debug!(LoginRequest { username });
redacted_debug!(BatchListRequest { uid });
redacted_debug!(PrintRequest { uid, lot_id, username });
