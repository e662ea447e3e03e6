mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use portal_api::auth::sessions::Role;
use portal_api::models::room_assignment::{RoomAssignment, RoomType};

fn names(body: &serde_json::Value) -> Vec<String> {
    body["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// GET /api/v1/events/{event_id}/stay
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stay_view_derives_roommates() {
    let (app, state, store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let (event, ..) = common::alice_bob_carol(&store).await;
    let token = common::staff_token(&state, &event.id).await;

    let resp = server
        .get(&format!("/api/v1/events/{}/stay", event.id))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await;

    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["event_id"], event.id);
    assert_eq!(body["total"], 3);
    assert_eq!(body["filtered"], 3);
    assert_eq!(body["sharing_options"], serde_json::json!([1, 2]));
    assert!(body["hotel"].is_null());

    let members = body["members"].as_array().unwrap();
    assert_eq!(names(&body), ["Alice", "Bob", "Carol"]);

    assert_eq!(members[0]["sharing_with"], "Bob");
    assert_eq!(members[0]["sharing_count"], 2);
    assert_eq!(members[0]["room_number"], "205");
    assert_eq!(members[0]["room_type"], "Double");
    assert_eq!(members[0]["is_assigned"], true);
    assert_eq!(members[0]["check_in_date"], "2026-03-10");
    assert_eq!(members[0]["check_out_date"], "2026-03-13");
    assert_eq!(members[0]["checked_in"], false);

    assert_eq!(members[1]["sharing_with"], "Alice");

    assert_eq!(members[2]["sharing_with"], "Solo");
    assert_eq!(members[2]["sharing_count"], 1);
    assert_eq!(members[2]["is_assigned"], false);
    assert!(members[2]["room_number"].is_null());
}

#[tokio::test]
async fn orphaned_assignments_are_not_roommates() {
    let (app, state, store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let (event, ..) = common::alice_bob_carol(&store).await;
    store.insert_raw_assignment(RoomAssignment {
        event_id: event.id.clone(),
        member_id: "mem_removed".to_string(),
        room_number: Some("205".to_string()),
        room_type: RoomType::Triple,
        check_in_date: None,
        check_out_date: None,
        special_requests: None,
        updated_at: Utc::now(),
    });
    let token = common::staff_token(&state, &event.id).await;

    let body: serde_json::Value = server
        .get(&format!("/api/v1/events/{}/stay", event.id))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .json();

    assert_eq!(body["total"], 3);
    assert_eq!(body["members"][0]["sharing_with"], "Bob");
    assert_eq!(body["members"][0]["sharing_count"], 2);
    assert_eq!(body["members"][1]["sharing_with"], "Alice");
    assert_eq!(body["sharing_options"], serde_json::json!([1, 2]));
}

#[tokio::test]
async fn stay_view_applies_filters_together() {
    let (app, state, store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let (event, ..) = common::alice_bob_carol(&store).await;
    let token = common::staff_token(&state, &event.id).await;

    let get = |query: &'static str| {
        server
            .get(&format!("/api/v1/events/{}/stay?{query}", event.id))
            .add_header(AUTHORIZATION, common::bearer(&token))
    };

    let body: serde_json::Value = get("sharing=2").await.json();
    assert_eq!(names(&body), ["Alice", "Bob"]);
    assert_eq!(body["total"], 3);
    assert_eq!(body["filtered"], 2);
    assert_eq!(body["sharing_options"], serde_json::json!([1, 2]));

    let body: serde_json::Value = get("status=unassigned").await.json();
    assert_eq!(names(&body), ["Carol"]);

    let body: serde_json::Value = get("search=emp002&status=assigned").await.json();
    assert_eq!(names(&body), ["Bob"]);

    let body: serde_json::Value = get("room_type=double").await.json();
    assert!(names(&body).is_empty());

    let body: serde_json::Value = get("kyc=all&status=all&room_type=all&sharing=all").await.json();
    assert_eq!(body["filtered"], 3);
}

#[tokio::test]
async fn kyc_filter_requires_all_three_fields() {
    let (app, state, store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let event = common::seed_event(&store);

    let mut done = common::new_member(&event.id, "EMP010", "Dana");
    common::complete_kyc(&mut done);
    let mut blank_link = common::new_member(&event.id, "EMP011", "Eli");
    common::complete_kyc(&mut blank_link);
    blank_link.kyc_document_url = Some("   ".to_string());
    store.insert_member(done);
    store.insert_member(blank_link);
    let token = common::staff_token(&state, &event.id).await;

    let completed: serde_json::Value = server
        .get(&format!("/api/v1/events/{}/stay?kyc=completed", event.id))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .json();
    assert_eq!(names(&completed), ["Dana"]);

    let pending: serde_json::Value = server
        .get(&format!("/api/v1/events/{}/stay?kyc=pending", event.id))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .json();
    assert_eq!(names(&pending), ["Eli"]);
}

#[tokio::test]
async fn invalid_filter_values_are_rejected() {
    let (app, state, store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let event = common::seed_event(&store);
    let token = common::staff_token(&state, &event.id).await;

    let resp = server
        .get(&format!("/api/v1/events/{}/stay?kyc=maybe&sharing=two", event.id))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn stay_view_includes_hotel_and_check_ins() {
    let (app, state, store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let (event, alice, ..) = common::alice_bob_carol(&store).await;
    common::seed_hotel(&store, &event.id);
    let token = common::staff_token(&state, &event.id).await;

    server
        .put(&format!("/api/v1/events/{}/check-ins/{}", event.id, alice.id))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .json(&serde_json::json!({ "checked_in": true }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get(&format!("/api/v1/events/{}/stay", event.id))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .json();

    assert_eq!(body["hotel"]["name"], "Seaside Resort");
    // Staff see every contact.
    assert_eq!(body["hotel"]["pocs"].as_array().unwrap().len(), 2);
    assert_eq!(body["members"][0]["checked_in"], true);
    assert!(body["members"][0]["checked_in_at"].is_string());
    assert_eq!(body["members"][1]["checked_in"], false);
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let (app, state, _store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::login(&state, Role::Admin, &[]).await;

    let resp = server
        .get("/api/v1/events/evt_missing/stay")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await;

    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stay_view_is_scoped_to_staff_of_the_event() {
    let (app, state, store) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let (event, ..) = common::alice_bob_carol(&store).await;
    let path = format!("/api/v1/events/{}/stay", event.id);

    server.get(&path).await.assert_status(StatusCode::UNAUTHORIZED);

    server
        .get(&path)
        .add_header(AUTHORIZATION, "Bearer not-a-session")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let other = common::login(&state, Role::Executive, &["evt_other"]).await;
    server
        .get(&path)
        .add_header(AUTHORIZATION, common::bearer(&other))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let attendee = common::login(&state, Role::Member, &[&event.id]).await;
    server
        .get(&path)
        .add_header(AUTHORIZATION, common::bearer(&attendee))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
