//! Shared test helpers for API E2E tests.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use qa_scenario_lib::config::{
    Config, DatabaseSettings, Environment, LlmSettings, SessionSettings, defaults,
};
use qa_scenario_lib::db::DbPool;
use qa_scenario_lib::services::CompletionProvider;
use secrecy::SecretString;
use serde_json::{Value, json};
use uuid::Uuid;

use super::mock_llm_provider::ScriptedProvider;

/// Registration domain used by every test.
pub const TEST_DOMAIN: &str = "acme.io";

/// Password accepted by the registration rules.
pub const TEST_PASSWORD: &str = "hunter2go";

/// PRD long enough to pass project validation.
pub const TEST_PRD: &str = "Users can reserve surplus meals and pick them up before closing.";

pub fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            // A single connection keeps every query on the same in-memory database
            max_connections: 1,
            min_connections: 1,
        },
        allowed_email_domain: TEST_DOMAIN.to_string(),
        session: SessionSettings {
            secret: SecretString::from("api-e2e-session-secret".to_string()),
            ttl_secs: 3600,
        },
        llm: LlmSettings {
            api_key: None,
            base_url: defaults::LLM_BASE_URL.to_string(),
            model: defaults::LLM_MODEL.to_string(),
            max_tokens: 1024,
            timeout_secs: 5,
        },
    }
}

/// Create a fresh, migrated in-memory database.
pub async fn create_test_pool() -> DbPool {
    let config = test_config();
    let pool = DbPool::new(&config)
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Create the app with the default scripted provider (no answers queued).
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    create_test_app_with_provider(pool, Arc::new(ScriptedProvider::new())).await
}

/// Create the app with a specific completion provider.
pub async fn create_test_app_with_provider(
    pool: &DbPool,
    provider: Arc<dyn CompletionProvider>,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_config()))
            .app_data(web::Data::from(provider))
            .configure(qa_scenario_lib::api::configure_api),
    )
    .await
}

/// Unique email in the test domain.
pub fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@{}",
        prefix,
        Uuid::new_v4().to_string().split('-').next().unwrap(),
        TEST_DOMAIN
    )
}

/// Send a JSON request and return the status with the parsed body.
pub async fn send<S>(
    app: &S,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = match method {
        "GET" => test::TestRequest::get(),
        "POST" => test::TestRequest::post(),
        "PUT" => test::TestRequest::put(),
        "PATCH" => test::TestRequest::patch(),
        "DELETE" => test::TestRequest::delete(),
        other => panic!("unsupported method {}", other),
    }
    .uri(uri);

    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }

    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Register an account and return its user object.
pub async fn register<S>(app: &S, email: &str, name: &str) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD,
            "confirmPassword": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, 201, "Failed to register {}: {}", email, body);
    body["data"].clone()
}

/// Log in and return the session token.
pub async fn login<S>(app: &S, email: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, 200, "Failed to log in {}: {}", email, body);
    body["data"]["token"].as_str().unwrap().to_string()
}

/// A registered, signed-in user.
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub async fn signed_in_user<S>(app: &S, prefix: &str) -> TestUser
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let email = unique_email(prefix);
    let user = register(app, &email, &format!("{} tester", prefix)).await;
    let token = login(app, &email).await;
    TestUser {
        id: user["id"].as_str().unwrap().to_string(),
        email,
        token,
    }
}

/// Create a project owned by `token`'s user and return its detail.
pub async fn create_project<S>(app: &S, token: &str, title: &str) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send(
        app,
        "POST",
        "/api/projects",
        Some(token),
        Some(json!({
            "title": title,
            "prdContent": TEST_PRD,
            "platform": "CONSUMER_APP",
        })),
    )
    .await;
    assert_eq!(status, 201, "Failed to create project: {}", body);
    body["data"].clone()
}

/// Add a member to a project.
pub async fn invite<S>(app: &S, token: &str, project_id: &str, email: &str, role: &str) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/projects/{}/members", project_id),
        Some(token),
        Some(json!({ "email": email, "role": role })),
    )
    .await;
    assert_eq!(status, 201, "Failed to invite {}: {}", email, body);
    body["data"].clone()
}

/// Add a manual scenario with the given steps.
pub async fn add_scenario<S>(
    app: &S,
    token: &str,
    project_id: &str,
    title: &str,
    steps: &[(&str, &str)],
) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let test_cases: Vec<Value> = steps
        .iter()
        .map(|(action, expected)| json!({ "action": action, "expected": expected }))
        .collect();
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/projects/{}/scenarios", project_id),
        Some(token),
        Some(json!({
            "title": title,
            "category": "PAYMENT",
            "priority": "HIGH",
            "testCases": test_cases,
        })),
    )
    .await;
    assert_eq!(status, 201, "Failed to add scenario: {}", body);
    body["data"].clone()
}

/// Model answer with `count` scenarios wrapped in a json code block.
pub fn generated_answer(count: usize) -> String {
    let scenarios: Vec<Value> = (1..=count)
        .map(|n| {
            json!({
                "title": format!("Generated scenario {}", n),
                "description": "Covers the reservation flow",
                "category": "PICKUP",
                "priority": "CRITICAL",
                "deviceType": "ANDROID",
                "testCases": [
                    { "step": 1, "action": "Open the app", "expected": "Home screen shows" },
                    { "step": 2, "action": "Reserve a meal", "expected": "Reservation confirmed" }
                ]
            })
        })
        .collect();
    format!(
        "Here are the scenarios:\n```json\n{}\n```",
        json!({ "scenarios": scenarios })
    )
}
