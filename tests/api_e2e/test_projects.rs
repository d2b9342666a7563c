//! E2E tests: project lifecycle, visibility and markdown export.

use actix_web::test;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_and_get_project() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;

    let project = create_project(&app, &owner.token, "Checkout v2").await;
    assert_eq!(project["title"], "Checkout v2");
    assert_eq!(project["role"], "OWNER");
    assert_eq!(project["platform"], "CONSUMER_APP");
    assert_eq!(project["scenarios"].as_array().unwrap().len(), 0);

    let id = project["id"].as_str().unwrap();
    let (status, body) = send(&app, "GET", &format!("/api/projects/{}", id), Some(&owner.token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["prdContent"], TEST_PRD);
    assert_eq!(body["data"]["owner"]["id"], owner.id.as_str());
}

#[actix_rt::test]
async fn test_create_project_validation() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;

    let invalid = [
        json!({ "title": "  ", "prdContent": TEST_PRD }),
        json!({ "title": "Short PRD", "prdContent": "too short" }),
        json!({ "title": "Bad link", "prdContent": TEST_PRD, "prdNotionUrl": "notion page" }),
        json!({ "title": "Bad date", "prdContent": TEST_PRD, "releaseDate": "next tuesday" }),
    ];
    for body in invalid {
        let (status, resp) = send(&app, "POST", "/api/projects", Some(&owner.token), Some(body.clone())).await;
        assert_eq!(status, 400, "{} should be rejected", body);
        assert_eq!(resp["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, resp) = send(
        &app,
        "POST",
        "/api/projects",
        Some(&owner.token),
        Some(json!({ "title": "Pickup", "prdContent": TEST_PRD, "platform": "TABLET_APP" })),
    )
    .await;
    assert_eq!(status, 400, "unknown platform should be rejected: {}", resp);
}

#[actix_rt::test]
async fn test_projects_are_private_to_members() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let outsider = signed_in_user(&app, "outsider").await;

    let project = create_project(&app, &owner.token, "Private").await;
    let id = project["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/projects/{}", id), Some(&outsider.token), None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = send(&app, "GET", "/api/projects", Some(&outsider.token), None).await;
    assert_eq!(status, 200);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, "GET", "/api/projects/not-a-uuid", Some(&owner.token), None).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_list_projects_includes_memberships_with_counts() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let member = signed_in_user(&app, "member").await;

    let project = create_project(&app, &owner.token, "Shared").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &member.email, "MEMBER").await;
    add_scenario(&app, &owner.token, id, "Pay with card", &[("Pay", "Paid")]).await;

    let (status, body) = send(&app, "GET", "/api/projects", Some(&member.token), None).await;
    assert_eq!(status, 200);
    let projects = body["data"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["role"], "MEMBER");
    assert_eq!(projects[0]["scenarioCount"], 1);
    assert_eq!(projects[0]["testRunCount"], 0);
}

#[actix_rt::test]
async fn test_update_project_roles() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let admin = signed_in_user(&app, "admin").await;
    let member = signed_in_user(&app, "member").await;

    let project = create_project(&app, &owner.token, "Roles").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &admin.email, "ADMIN").await;
    invite(&app, &owner.token, id, &member.email, "MEMBER").await;

    let uri = format!("/api/projects/{}", id);
    let (status, body) = send(&app, "PUT", &uri, Some(&member.token), Some(json!({ "title": "Nope" }))).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin.token),
        Some(json!({ "title": "Renamed", "appVersion": "2.1.0", "releaseDate": "2026-11-02" })),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["appVersion"], "2.1.0");
    assert_eq!(body["data"]["releaseDate"], "2026-11-02");
    assert_eq!(body["data"]["prdContent"], TEST_PRD, "untouched fields keep their value");

    let (status, body) = send(&app, "PUT", &uri, Some(&owner.token), Some(json!({ "appVersion": "" }))).await;
    assert_eq!(status, 200);
    assert!(body["data"]["appVersion"].is_null(), "blank clears the field");
}

#[actix_rt::test]
async fn test_only_owner_deletes_project() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let admin = signed_in_user(&app, "admin").await;

    let project = create_project(&app, &owner.token, "Doomed").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &admin.email, "ADMIN").await;
    add_scenario(&app, &owner.token, id, "Refund", &[("Refund", "Refunded")]).await;

    let uri = format!("/api/projects/{}", id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, 403);

    let (status, body) = send(&app, "DELETE", &uri, Some(&owner.token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], id);

    let (status, _) = send(&app, "GET", &uri, Some(&owner.token), None).await;
    assert_eq!(status, 404);
    let (_, body) = send(&app, "GET", "/api/projects", Some(&admin.token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_export_markdown() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;

    let project = create_project(&app, &owner.token, "Checkout v2").await;
    let id = project["id"].as_str().unwrap();
    let scenario = add_scenario(
        &app,
        &owner.token,
        id,
        "Card payment declined",
        &[("Pay with a declined card", "Error shown")],
    )
    .await;
    add_scenario(&app, &owner.token, id, "Card payment accepted", &[("Pay", "Receipt")]).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/scenarios/{}/status", scenario["id"].as_str().unwrap()),
        Some(&owner.token),
        Some(json!({
            "status": "FAIL",
            "failureNote": "Spinner never stops",
            "bugTicketUrl": "https://tracker.acme.io/BUG-12"
        })),
    )
    .await;
    assert_eq!(status, 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/projects/{}/export", id))
        .insert_header(("Authorization", format!("Bearer {}", owner.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/markdown"));
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"Checkout-v2-"));
    assert!(disposition.ends_with(".md\""));

    let body = test::read_body(resp).await;
    let markdown = String::from_utf8(body.to_vec()).unwrap();
    assert!(markdown.starts_with("# Checkout v2"));
    assert!(markdown.contains("Card payment declined"));
    assert!(markdown.contains("**Failure note**: Spinner never stops"));
    assert!(markdown.contains("**Bug ticket**: [link](https://tracker.acme.io/BUG-12)"));
    assert!(markdown.contains("| 1 | Pay with a declined card | Error shown |"));
    assert!(markdown.contains("**Progress**: 1/2 (50%)"), "{}", markdown);
    assert!(markdown.contains("**Pass rate**: 0%"), "{}", markdown);
}
