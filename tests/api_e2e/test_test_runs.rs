//! E2E tests: test runs and their per-scenario results.

use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_run_snapshots_every_scenario() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let project = create_project(&app, &owner.token, "Release 3").await;
    let id = project["id"].as_str().unwrap();
    for title in ["Login", "Browse", "Reserve"] {
        add_scenario(&app, &owner.token, id, title, &[]).await;
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/test-runs",
        Some(&owner.token),
        Some(json!({ "projectId": id, "name": "RC1", "appVersion": "3.0.0" })),
    )
    .await;
    assert_eq!(status, 201, "{}", body);
    let run = &body["data"];
    assert_eq!(run["environment"], "STAGING");
    assert_eq!(run["projectTitle"], "Release 3");
    assert_eq!(run["stats"]["total"], 3);
    assert_eq!(run["stats"]["notRun"], 3);
    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r["status"] == "NOT_RUN" && r["executedAt"].is_null()));

    let (status, body) = send(&app, "GET", &format!("/api/test-runs?projectId={}", id), Some(&owner.token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["stats"]["total"], 3);
}

#[actix_rt::test]
async fn test_run_results_are_independent_of_scenario_status() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let tester = signed_in_user(&app, "tester").await;
    let project = create_project(&app, &owner.token, "Independent").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &tester.email, "MEMBER").await;
    let scenario = add_scenario(&app, &owner.token, id, "Pay", &[]).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/test-runs",
        Some(&tester.token),
        Some(json!({ "projectId": id, "name": "Prod smoke", "appVersion": "3.0.1", "environment": "PRODUCTION" })),
    )
    .await;
    let run_id = body["data"]["id"].as_str().unwrap().to_string();
    let result_id = body["data"]["results"][0]["id"].as_str().unwrap().to_string();
    let run_uri = format!("/api/test-runs/{}", run_id);

    let (status, body) = send(
        &app,
        "PATCH",
        &run_uri,
        Some(&tester.token),
        Some(json!({ "resultId": result_id, "status": "FAIL", "note": "Timeout on pay" })),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["data"]["status"], "FAIL");
    assert_eq!(body["data"]["note"], "Timeout on pay");
    assert!(!body["data"]["executedAt"].is_null());

    // The scenario itself is untouched
    let (_, body) = send(&app, "GET", &format!("/api/projects/{}", id), Some(&owner.token), None).await;
    assert_eq!(body["data"]["scenarios"][0]["id"], scenario["id"]);
    assert_eq!(body["data"]["scenarios"][0]["status"], "NOT_RUN");

    let (status, body) = send(&app, "GET", &run_uri, Some(&owner.token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["environment"], "PRODUCTION");
    assert_eq!(body["data"]["stats"]["fail"], 1);
    assert_eq!(body["data"]["results"][0]["scenario"]["title"], "Pay");

    let (status, _) = send(
        &app,
        "PATCH",
        &run_uri,
        Some(&tester.token),
        Some(json!({ "resultId": uuid::Uuid::new_v4(), "status": "PASS" })),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_run_creation_validation_and_access() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let outsider = signed_in_user(&app, "outsider").await;
    let project = create_project(&app, &owner.token, "Guarded").await;
    let id = project["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/test-runs",
        Some(&owner.token),
        Some(json!({ "projectId": id, "name": " ", "appVersion": "1.0" })),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = send(
        &app,
        "POST",
        "/api/test-runs",
        Some(&outsider.token),
        Some(json!({ "projectId": id, "name": "Sneaky", "appVersion": "1.0" })),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = send(&app, "GET", &format!("/api/test-runs?projectId={}", id), Some(&outsider.token), None).await;
    assert_eq!(status, 404);

    // An empty project yields an empty run
    let (status, body) = send(
        &app,
        "POST",
        "/api/test-runs",
        Some(&owner.token),
        Some(json!({ "projectId": id, "name": "Empty", "appVersion": "1.0" })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["stats"]["total"], 0);
}

#[actix_rt::test]
async fn test_only_managers_delete_runs() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = signed_in_user(&app, "owner").await;
    let tester = signed_in_user(&app, "tester").await;
    let project = create_project(&app, &owner.token, "Cleanup").await;
    let id = project["id"].as_str().unwrap();
    invite(&app, &owner.token, id, &tester.email, "MEMBER").await;
    add_scenario(&app, &owner.token, id, "Any", &[]).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/test-runs",
        Some(&tester.token),
        Some(json!({ "projectId": id, "name": "RC2", "appVersion": "1.1" })),
    )
    .await;
    let run_uri = format!("/api/test-runs/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &run_uri, Some(&tester.token), None).await;
    assert_eq!(status, 403);

    let (status, _) = send(&app, "DELETE", &run_uri, Some(&owner.token), None).await;
    assert_eq!(status, 200);

    let (status, _) = send(&app, "GET", &run_uri, Some(&owner.token), None).await;
    assert_eq!(status, 404);
}
