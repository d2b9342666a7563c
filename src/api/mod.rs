//! API endpoint modules.

pub mod generate;
pub mod health;
pub mod members;
pub mod my_scenarios;
pub mod openapi;
pub mod projects;
pub mod scenarios;
pub mod test_runs;
pub mod users;

use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Body returned after a delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
}

/// Mount every API route under `/api`, with extractor errors rendered
/// through the error envelope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .configure(configure_health_routes)
            .configure(crate::services::configure_account_routes)
            .configure(users::configure_routes)
            .configure(projects::configure_routes)
            .configure(members::configure_routes)
            .configure(scenarios::configure_routes)
            .configure(generate::configure_routes)
            .configure(my_scenarios::configure_routes)
            .configure(test_runs::configure_routes),
    );
}
