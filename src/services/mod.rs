//! Business logic services.

pub mod access;
pub mod account;
pub mod export;
pub mod generation;

pub use access::ProjectAccess;
pub use account::configure_routes as configure_account_routes;
pub use generation::{AnthropicClient, CompletionError, CompletionProvider};
