//! Tests for the service bootstrap: server construction and app wiring.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::server::{ServerConfig, build_app, create_server};
use userbase::domain::{MinimumAge, TRACE_ID_HEADER, UserStore};
use userbase::inbound::http::state::HttpState;
use userbase::test_support::MutableClock;

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::on(2026, 10, 18))
}

#[fixture]
fn http_state(clock: Arc<MutableClock>) -> web::Data<HttpState> {
    let store = UserStore::new(MinimumAge::default(), clock);
    web::Data::new(HttpState::new(Arc::new(store)))
}

#[rstest]
#[actix_web::test]
async fn create_server_binds_ephemeral_port(clock: Arc<MutableClock>) {
    let config = ServerConfig::new(([127, 0, 0, 1], 0).into(), MinimumAge::default())
        .with_clock(clock);
    assert_eq!(config.bind_addr().port(), 0);

    let _server = create_server(config).expect("server should bind");
}

#[rstest]
#[actix_web::test]
async fn app_serves_users_under_api_prefix(http_state: web::Data<HttpState>) {
    let app = test::init_service(build_app(http_state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn app_reports_malformed_json_as_invalid_request(http_state: web::Data<HttpState>) {
    let app = test::init_service(build_app(http_state)).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("not json")
        .to_request();

    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("code"), Some(&json!("invalid_request")));
}

#[cfg(debug_assertions)]
#[rstest]
#[actix_web::test]
async fn app_serves_openapi_document_in_debug_builds(http_state: web::Data<HttpState>) {
    let app = test::init_service(build_app(http_state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}
