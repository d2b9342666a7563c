//! E2E tests: registration, login and session handling.

use actix_web::test;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_register_login_and_me() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let email = unique_email("jane");
    let user = register(&app, &email.to_uppercase(), "Jane Doe").await;
    assert_eq!(user["email"], email, "email should be stored lowercased");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());

    let token = login(&app, &email).await;
    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], user["id"]);
    assert_eq!(body["data"]["name"], "Jane Doe");
}

#[actix_rt::test]
async fn test_register_rejects_foreign_domain() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Mallory",
            "email": "mallory@acme.io.evil.com",
            "password": TEST_PASSWORD,
            "confirmPassword": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_EMAIL_DOMAIN");
}

#[actix_rt::test]
async fn test_register_validation_errors() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let cases = [
        ("J", "password1", "password1"),
        ("Jane", "short1", "short1"),
        ("Jane", "lettersonly", "lettersonly"),
        ("Jane", "password1", "password2"),
    ];
    for (name, password, confirm) in cases {
        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": name,
                "email": unique_email("v"),
                "password": password,
                "confirmPassword": confirm,
            })),
        )
        .await;
        assert_eq!(status, 400, "{} / {} should be rejected", name, password);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[actix_rt::test]
async fn test_duplicate_registration_conflicts() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let email = unique_email("dup");
    register(&app, &email, "First").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Second",
            "email": email,
            "password": TEST_PASSWORD,
            "confirmPassword": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "USER_EXISTS");
}

#[actix_rt::test]
async fn test_login_failures_share_one_message() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let email = unique_email("login");
    register(&app, &email, "Login User").await;

    let (wrong_status, wrong_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrongpass1" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": unique_email("ghost"), "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(wrong_status, 401);
    assert_eq!(unknown_status, 401);
    assert_eq!(wrong_body["error"]["message"], unknown_body["error"]["message"]);
}

#[actix_rt::test]
async fn test_session_cookie_authenticates() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let email = unique_email("cookie");
    register(&app, &email, "Cookie User").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "qa_session")
        .expect("login should set the session cookie")
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_rt::test]
async fn test_logout_clears_cookie() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "qa_session")
        .expect("logout should overwrite the session cookie")
        .into_owned();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
}

#[actix_rt::test]
async fn test_protected_routes_require_session() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    for uri in ["/api/auth/me", "/api/projects", "/api/users", "/api/my/scenarios"] {
        let (status, body) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, 401, "{} should require a session", uri);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    let (status, _) = send(&app, "GET", "/api/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_health_and_ready() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, 200, "{}", body);

    let (status, body) = send(&app, "GET", "/api/ready", None, None).await;
    assert_eq!(status, 200, "{}", body);
}

#[actix_rt::test]
async fn test_users_directory_lists_registered_users() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let alice = signed_in_user(&app, "alice").await;
    let bob = signed_in_user(&app, "bob").await;

    let (status, body) = send(&app, "GET", "/api/users", Some(&alice.token), None).await;
    assert_eq!(status, 200);
    let emails: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&alice.email.as_str()));
    assert!(emails.contains(&bob.email.as_str()));
}
