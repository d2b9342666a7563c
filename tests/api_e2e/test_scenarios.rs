//! E2E tests: manual scenarios, status tracking and test case steps.

use serde_json::{Value, json};

use super::test_helpers::*;

fn steps(scenario: &Value) -> Vec<(i64, String)> {
    scenario["testCases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tc| (tc["step"].as_i64().unwrap(), tc["action"].as_str().unwrap().to_string()))
        .collect()
}

#[actix_rt::test]
async fn test_manual_scenario_numbered_from_one() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let project = create_project(&app, &owner.token, "Manual").await;
    let id = project["id"].as_str().unwrap();

    let scenario = add_scenario(&app, &owner.token, id, "Split payment", &[("Open", "Opened"), ("Pay", "Paid")]).await;
    assert_eq!(scenario["status"], "NOT_RUN");
    assert_eq!(scenario["category"], "PAYMENT");
    assert_eq!(scenario["priority"], "HIGH");
    assert_eq!(scenario["deviceType"], "BOTH");
    assert_eq!(steps(&scenario), vec![(1, "Open".to_string()), (2, "Pay".to_string())]);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/projects/{}/scenarios", id),
        Some(&owner.token),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, 400, "{}", body);

    let (_, body) = send(&app, "GET", &format!("/api/projects/{}", id), Some(&owner.token), None).await;
    assert_eq!(body["data"]["scenarios"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_status_update_stamps_execution() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let tester = signed_in_user(&app, "tester").await;
    let project = create_project(&app, &owner.token, "Status").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &tester.email, "MEMBER").await;

    let scenario = add_scenario(&app, &owner.token, id, "Pickup code", &[("Show code", "Code shown")]).await;
    let uri = format!("/api/scenarios/{}/status", scenario["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&tester.token),
        Some(json!({ "status": "FAIL", "failureNote": "Code expired early", "bugTicketUrl": "  " })),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    let updated = &body["data"];
    assert_eq!(updated["status"], "FAIL");
    assert_eq!(updated["failureNote"], "Code expired early");
    assert!(updated["bugTicketUrl"].is_null(), "blank URL is stored as null");
    assert_eq!(updated["executedById"], tester.id.as_str());
    assert!(!updated["executedAt"].is_null());

    let (status, body) = send(&app, "PATCH", &uri, Some(&owner.token), Some(json!({ "status": "NOT_RUN" }))).await;
    assert_eq!(status, 200);
    assert!(body["data"]["executedAt"].is_null());
    assert!(body["data"]["executedById"].is_null());
    assert!(body["data"]["failureNote"].is_null());

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&owner.token),
        Some(json!({ "status": "PASS", "bugTicketUrl": "not a url" })),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = send(&app, "PATCH", &uri, Some(&owner.token), Some(json!({ "status": "DONE" }))).await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_assignment_and_my_scenarios() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let tester = signed_in_user(&app, "tester").await;
    let project = create_project(&app, &owner.token, "Assign").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &tester.email, "MEMBER").await;

    let first = add_scenario(&app, &owner.token, id, "First", &[]).await;
    let second = add_scenario(&app, &owner.token, id, "Second", &[]).await;
    let first_uri = format!("/api/scenarios/{}/status", first["id"].as_str().unwrap());
    let second_uri = format!("/api/scenarios/{}/status", second["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PATCH",
        &first_uri,
        Some(&owner.token),
        Some(json!({ "status": "NOT_RUN", "assigneeId": tester.id })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["assignee"]["email"], tester.email.as_str());

    send(
        &app,
        "PATCH",
        &second_uri,
        Some(&owner.token),
        Some(json!({ "status": "PASS", "assigneeId": tester.id })),
    )
    .await;

    // Omitting assigneeId keeps the assignee
    let (_, body) = send(&app, "PATCH", &second_uri, Some(&owner.token), Some(json!({ "status": "BLOCKED" }))).await;
    assert_eq!(body["data"]["assigneeId"], tester.id.as_str());

    let (status, body) = send(&app, "GET", "/api/my/scenarios", Some(&tester.token), None).await;
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["stats"]["total"], 2);
    assert_eq!(data["stats"]["notRun"], 1);
    assert_eq!(data["stats"]["blocked"], 1);
    assert_eq!(data["scenarios"][0]["status"], "NOT_RUN", "not-run work sorts first");
    assert_eq!(data["scenarios"][0]["project"]["title"], "Assign");
    assert_eq!(data["groupedByProject"].as_array().unwrap().len(), 1);

    // null unassigns
    let (_, body) = send(
        &app,
        "PATCH",
        &first_uri,
        Some(&owner.token),
        Some(json!({ "status": "NOT_RUN", "assigneeId": null })),
    )
    .await;
    assert!(body["data"]["assigneeId"].is_null());

    let (status, body) = send(
        &app,
        "PATCH",
        &first_uri,
        Some(&owner.token),
        Some(json!({ "status": "NOT_RUN", "assigneeId": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, 400, "{}", body);
}

#[actix_rt::test]
async fn test_test_case_append_and_renumber() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let project = create_project(&app, &owner.token, "Steps").await;
    let id = project["id"].as_str().unwrap();

    let scenario = add_scenario(&app, &owner.token, id, "Checkout", &[("One", "1"), ("Two", "2")]).await;
    let uri = format!("/api/scenarios/{}/test-cases", scenario["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&owner.token),
        Some(json!({ "action": "Three", "expected": "3" })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["step"], 3);

    let (status, _) = send(&app, "POST", &uri, Some(&owner.token), Some(json!({ "action": "", "expected": "x" }))).await;
    assert_eq!(status, 400);

    let second_id = scenario["testCases"][1]["id"].as_str().unwrap();
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("{}?testCaseId={}", uri, second_id),
        Some(&owner.token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let remaining: Vec<(i64, String)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tc| (tc["step"].as_i64().unwrap(), tc["action"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(remaining, vec![(1, "One".to_string()), (2, "Three".to_string())]);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("{}?testCaseId={}", uri, second_id),
        Some(&owner.token),
        None,
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_scenario_hidden_from_outsiders() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let outsider = signed_in_user(&app, "outsider").await;
    let project = create_project(&app, &owner.token, "Hidden").await;
    let scenario = add_scenario(&app, &owner.token, project["id"].as_str().unwrap(), "Secret", &[]).await;
    let scenario_id = scenario["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/scenarios/{}/status", scenario_id),
        Some(&outsider.token),
        Some(json!({ "status": "PASS" })),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = send(&app, "DELETE", &format!("/api/scenarios/{}", scenario_id), Some(&outsider.token), None).await;
    assert_eq!(status, 404);

    let (status, body) = send(&app, "DELETE", &format!("/api/scenarios/{}", scenario_id), Some(&owner.token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], scenario_id);
}
