//! QA scenario server library.
//!
//! Projects hold a product requirements document; scenarios are generated
//! from it by an LLM and tracked through test runs.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
