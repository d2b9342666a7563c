//! E2E tests: inviting, listing and removing project members.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_owner_listed_first() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let member = signed_in_user(&app, "member").await;

    let project = create_project(&app, &owner.token, "Team").await;
    let id = project["id"].as_str().unwrap();
    let invited = invite(&app, &owner.token, id, &member.email, "MEMBER").await;
    assert_eq!(invited["role"], "MEMBER");
    assert_eq!(invited["isOwner"], false);

    let (status, body) = send(&app, "GET", &format!("/api/projects/{}/members", id), Some(&member.token), None).await;
    assert_eq!(status, 200);
    let members = body["data"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["isOwner"], true);
    assert_eq!(members[0]["role"], "OWNER");
    assert!(members[0]["id"].is_null());
    assert_eq!(members[0]["user"]["email"], owner.email.as_str());
    assert_eq!(members[1]["user"]["email"], member.email.as_str());
}

#[actix_rt::test]
async fn test_invite_rules() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let member = signed_in_user(&app, "member").await;
    let other = signed_in_user(&app, "other").await;

    let project = create_project(&app, &owner.token, "Invites").await;
    let id = project["id"].as_str().unwrap();
    let uri = format!("/api/projects/{}/members", id);

    let (status, body) = send(&app, "POST", &uri, Some(&owner.token), Some(json!({ "email": owner.email }))).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "ALREADY_OWNER");

    let (status, body) = send(&app, "POST", &uri, Some(&owner.token), Some(json!({ "email": unique_email("nobody") }))).await;
    assert_eq!(status, 404, "{}", body);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&owner.token),
        Some(json!({ "email": member.email, "role": "OWNER" })),
    )
    .await;
    assert_eq!(status, 400);

    invite(&app, &owner.token, id, &member.email, "MEMBER").await;
    let (status, body) = send(&app, "POST", &uri, Some(&owner.token), Some(json!({ "email": member.email }))).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "ALREADY_MEMBER");

    // A plain member cannot invite
    let (status, _) = send(&app, "POST", &uri, Some(&member.token), Some(json!({ "email": other.email }))).await;
    assert_eq!(status, 403);

    // An outsider does not see the project at all
    let (status, _) = send(&app, "GET", &uri, Some(&other.token), None).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_admin_manages_members() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let admin = signed_in_user(&app, "admin").await;
    let member = signed_in_user(&app, "member").await;

    let project = create_project(&app, &owner.token, "Admins").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &admin.email, "ADMIN").await;
    let membership = invite(&app, &admin.token, id, &member.email, "MEMBER").await;
    let member_id = membership["id"].as_str().unwrap();

    let uri = format!("/api/projects/{}/members?memberId={}", id, member_id);
    let (status, body) = send(&app, "DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], member_id);

    // Removed member loses access
    let (status, _) = send(&app, "GET", &format!("/api/projects/{}", id), Some(&member.token), None).await;
    assert_eq!(status, 404);

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, 404, "second removal finds nothing");
}

#[actix_rt::test]
async fn test_remove_member_of_other_project_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let member = signed_in_user(&app, "member").await;

    let first = create_project(&app, &owner.token, "First").await;
    let second = create_project(&app, &owner.token, "Second").await;
    let membership = invite(&app, &owner.token, first["id"].as_str().unwrap(), &member.email, "MEMBER").await;

    let uri = format!(
        "/api/projects/{}/members?memberId={}",
        second["id"].as_str().unwrap(),
        membership["id"].as_str().unwrap()
    );
    let (status, body) = send(&app, "DELETE", &uri, Some(&owner.token), None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_member_cannot_remove_members() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let first = signed_in_user(&app, "first").await;
    let second = signed_in_user(&app, "second").await;

    let project = create_project(&app, &owner.token, "Flat").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &first.email, "MEMBER").await;
    let membership = invite(&app, &owner.token, id, &second.email, "MEMBER").await;

    let uri = format!(
        "/api/projects/{}/members?memberId={}",
        id,
        membership["id"].as_str().unwrap()
    );
    let (status, _) = send(&app, "DELETE", &uri, Some(&first.token), None).await;
    assert_eq!(status, 403);
}
