//! Tests for users API handlers.

use super::*;
use crate::domain::ports::MockUserDirectory;
use crate::domain::{MinimumAge, UserViolation, UserViolations};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::NaiveDate;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn sample_user(id: u64) -> User {
    UserDraft {
        email: Some("jim@example.com".to_owned()),
        first_name: Some("Jim".to_owned()),
        last_name: Some("Karry".to_owned()),
        birth_date: Some(date(1985, 5, 15)),
        address: None,
        phone_number: Some("1234567890".to_owned()),
    }
    .into_user(UserId::new(id), date(2026, 10, 18))
    .expect("valid sample user")
}

fn test_app(
    directory: MockUserDirectory,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(directory));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(crate::inbound::http::error::json_config())
        .service(web::scope("/api/v1").configure(configure_users))
}

async fn call(
    directory: MockUserDirectory,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(directory)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[actix_web::test]
async fn list_users_returns_camel_case_json() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_list()
        .times(1)
        .return_once(|| vec![sample_user(1)]);

    let (status, body) = call(directory, actix_test::TestRequest::get().uri("/api/v1/users")).await;

    assert_eq!(status, StatusCode::OK);
    let first = body
        .as_array()
        .and_then(|users| users.first())
        .expect("one user");
    assert_eq!(first.get("id").and_then(Value::as_u64), Some(1));
    assert_eq!(first.get("firstName").and_then(Value::as_str), Some("Jim"));
    assert_eq!(
        first.get("birthDate").and_then(Value::as_str),
        Some("1985-05-15")
    );
    assert_eq!(first.get("address"), Some(&Value::Null));
    assert!(first.get("first_name").is_none());
}

#[actix_web::test]
async fn get_user_returns_record() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_get()
        .with(eq(UserId::new(1)))
        .times(1)
        .return_once(|_| Ok(sample_user(1)));

    let (status, body) =
        call(directory, actix_test::TestRequest::get().uri("/api/v1/users/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("email").and_then(Value::as_str), Some("jim@example.com"));
}

#[actix_web::test]
async fn get_missing_user_is_404() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_get()
        .return_once(|id| Err(UserDirectoryError::not_found(id)));

    let (status, body) =
        call(directory, actix_test::TestRequest::get().uri("/api/v1/users/9")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("User not found with id: 9")
    );
}

#[rstest]
#[case::get(actix_test::TestRequest::get())]
#[case::delete(actix_test::TestRequest::delete())]
#[case::put(actix_test::TestRequest::put().set_json(UserRequest::default()))]
#[case::patch(actix_test::TestRequest::patch().set_json(UserRequest::default()))]
#[actix_web::test]
async fn non_numeric_identifier_is_rejected_before_the_directory(
    #[case] request: actix_test::TestRequest,
) {
    let directory = MockUserDirectory::new();

    let (status, body) = call(directory, request.uri("/api/v1/users/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("invalid_id")
    );
}

#[actix_web::test]
async fn create_user_returns_201_with_assigned_id() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_create()
        .withf(|draft| {
            draft.first_name.as_deref() == Some("Jim") && draft.birth_date == Some(date(1985, 5, 15))
        })
        .times(1)
        .return_once(|_| Ok(sample_user(1)));
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(serde_json::json!({
            "id": 99,
            "email": "jim@example.com",
            "firstName": "Jim",
            "lastName": "Karry",
            "birthDate": "1985-05-15",
        }));

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.get("id").and_then(Value::as_u64), Some(1));
}

#[actix_web::test]
async fn create_user_with_unparseable_birth_date_is_rejected() {
    let directory = MockUserDirectory::new();
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(UserRequest {
            birth_date: Some("15/05/1985".to_owned()),
            ..UserRequest::default()
        });

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("birthDate")
    );
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let directory = MockUserDirectory::new();
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\":");

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
}

#[actix_web::test]
async fn validation_failures_list_every_violation() {
    let mut directory = MockUserDirectory::new();
    directory.expect_create().return_once(|_| {
        Err(UserDirectoryError::validation_failed(UserViolations::new(
            vec![UserViolation::InvalidEmail, UserViolation::EmptyLastName],
        )))
    });
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(UserRequest::default());

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Email is not valid")
    );
    let violations = body
        .pointer("/details/violations")
        .and_then(Value::as_array)
        .expect("violations listed");
    assert_eq!(violations.len(), 2);
    assert_eq!(
        violations[1],
        serde_json::json!({
            "field": "lastName",
            "code": "empty_last_name",
            "message": "Last name cannot be blank",
        })
    );
}

#[actix_web::test]
async fn underage_user_is_rejected_with_minimum_in_message() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_create()
        .return_once(|_| Err(UserDirectoryError::invalid_age(MinimumAge::new(18))));
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(UserRequest::default());

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Users must be at least 18 years old")
    );
}

#[actix_web::test]
async fn update_user_forwards_full_draft() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_update()
        .withf(|id, draft| *id == UserId::new(1) && draft.address.is_none())
        .times(1)
        .return_once(|_, _| Ok(sample_user(1)));
    let request = actix_test::TestRequest::put()
        .uri("/api/v1/users/1")
        .set_json(UserRequest {
            email: Some("jim@example.com".to_owned()),
            first_name: Some("Jim".to_owned()),
            last_name: Some("Karry".to_owned()),
            birth_date: Some("1985-05-15".to_owned()),
            ..UserRequest::default()
        });

    let (status, _) = call(directory, request).await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn patch_user_forwards_only_supplied_fields() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_patch()
        .withf(|id, patch| {
            *id == UserId::new(2)
                && *patch
                    == UserPatch {
                        phone_number: Some("555-0100".to_owned()),
                        ..UserPatch::default()
                    }
        })
        .times(1)
        .return_once(|_, _| Ok(sample_user(2)));
    let request = actix_test::TestRequest::patch()
        .uri("/api/v1/users/2")
        .set_json(serde_json::json!({ "phoneNumber": "555-0100" }));

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("id").and_then(Value::as_u64), Some(2));
}

#[actix_web::test]
async fn delete_user_returns_plain_text_confirmation() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_delete()
        .with(eq(UserId::new(3)))
        .times(1)
        .return_once(|_| Ok("User deleted successfully.".to_owned()));
    let app = actix_test::init_service(test_app(directory)).await;
    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users/3")
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .expect("content type");
    assert!(content_type.starts_with("text/plain"));
    let body = actix_test::read_body(response).await;
    assert_eq!(body.as_ref(), b"User deleted successfully.");
}

#[actix_web::test]
async fn search_is_not_captured_as_identifier() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_search_by_birth_date_range()
        .with(eq(date(1984, 1, 1)), eq(date(1999, 12, 31)))
        .times(1)
        .return_once(|_, _| Ok(vec![sample_user(1)]));
    directory.expect_get().never();
    let request =
        actix_test::TestRequest::get().uri("/api/v1/users/search?from=1984-01-01&to=1999-12-31");

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case::missing_to("/api/v1/users/search?from=1984-01-01", "missing_field")]
#[case::bad_from("/api/v1/users/search?from=1984&to=1999-12-31", "invalid_date")]
#[actix_web::test]
async fn search_rejects_unusable_query(#[case] uri: &str, #[case] code: &str) {
    let directory = MockUserDirectory::new();

    let (status, body) = call(directory, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some(code)
    );
}

#[actix_web::test]
async fn reversed_search_range_is_rejected() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_search_by_birth_date_range()
        .return_once(|from, to| Err(UserDirectoryError::invalid_range(from, to)));
    let request =
        actix_test::TestRequest::get().uri("/api/v1/users/search?from=2000-01-01&to=1990-01-01");

    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Swap the dates. First must be less than equal to second date")
    );
}
