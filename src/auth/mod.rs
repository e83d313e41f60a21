//! Admin authentication: password hashing, credential checks and sessions.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod session;
pub mod verifier;

pub use handlers::{login_page, login_submit, logout};
pub use middleware::{AdminContext, OptionalAdmin};
pub use session::{AdminSession, AdminSessions};
pub use verifier::{AuthVerifier, StoreAuthVerifier};
