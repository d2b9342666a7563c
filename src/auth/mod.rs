//! Authentication: password hashing, session tokens and the request extractor.

mod extractor;
pub mod password;
pub mod session;

pub use extractor::SessionAuth;
pub use session::{SESSION_COOKIE, SESSION_ISSUER};
