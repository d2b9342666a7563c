//! API E2E test suite.
//!
//! Drives the full `/api` surface against an in-memory SQLite database.
//! Scenario generation runs against a scripted provider or a mock
//! Messages API server on an ephemeral port.
//!
//! Run with: cargo test --test api_e2e

mod mock_llm_provider;
mod test_helpers;

mod test_auth;
mod test_members;
mod test_projects;
mod test_scenarios;
mod test_test_runs;
