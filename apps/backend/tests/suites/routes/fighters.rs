use actix_web::{test, web, App};
use duel_backend::domain::ParticipantId;
use duel_backend::middleware::RequestTrace;
use duel_backend::routes;
use duel_test_support::problem_details::assert_problem_details;
use serde_json::Value;

use crate::support::test_state;

#[actix_web::test]
async fn lists_available_and_reserved() {
    let state = test_state();
    let a = ParticipantId::new();
    state.arena.connect(a);
    state.arena.select_fighter(a, "Shadow").unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/fighters").to_request(),
    )
    .await;
    assert_eq!(body["available"].as_array().unwrap().len(), 5);
    assert_eq!(body["reserved"], serde_json::json!(["Shadow"]));

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/fighters/Shadow").to_request(),
    )
    .await;
    assert_eq!(body["fighter"]["image"], "shadow.png");
    assert_eq!(body["available"], false);
}

#[actix_web::test]
async fn unknown_fighter_is_problem_details_404() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/fighters/Nobody").to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 404);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/problem+json"));
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(
        resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some(trace_id.as_str())
    );

    let body: Value = test::read_body_json(resp).await;
    assert_problem_details(&body, 404, "UNKNOWN_FIGHTER", &trace_id);
}
