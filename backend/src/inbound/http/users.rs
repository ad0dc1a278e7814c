//! Users API handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/search?from=1984-01-01&to=1999-12-31
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users {"email":"jim@example.com","firstName":"Jim",...}
//! PUT    /api/v1/users/{id}
//! PATCH  /api/v1/users/{id} {"phoneNumber":"555-0100"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::UserDirectoryError;
use crate::domain::{Error, User, UserDraft, UserId, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_iso_date, parse_required_iso_date, parse_user_id,
};

/// User payload accepted by create, update and patch.
///
/// Every field is optional at the wire level; rules are enforced by the
/// domain so clients receive every broken rule at once. A client-supplied
/// `id` is ignored.
///
/// Example JSON:
/// `{"email":"jim@example.com","firstName":"Jim","lastName":"Karry","birthDate":"1985-05-15"}`
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Contact email.
    #[schema(example = "jim@example.com")]
    pub email: Option<String>,
    /// Given name.
    #[schema(example = "Jim")]
    pub first_name: Option<String>,
    /// Family name.
    #[schema(example = "Karry")]
    pub last_name: Option<String>,
    /// Birth date as `YYYY-MM-DD`.
    #[schema(format = Date, example = "1985-05-15")]
    pub birth_date: Option<String>,
    /// Postal address.
    #[schema(example = "New York")]
    pub address: Option<String>,
    /// Phone number.
    #[schema(example = "1234567890")]
    pub phone_number: Option<String>,
}

/// Query string for `GET /api/v1/users/search`.
#[derive(Debug, Deserialize)]
pub struct BirthDateRangeQuery {
    /// Exclusive lower bound, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Exclusive upper bound, `YYYY-MM-DD`.
    pub to: Option<String>,
}

const ID: FieldName = FieldName::new("id");
const BIRTH_DATE: FieldName = FieldName::new("birthDate");
const FROM: FieldName = FieldName::new("from");
const TO: FieldName = FieldName::new("to");

fn parse_draft(payload: UserRequest) -> Result<UserDraft, Error> {
    let birth_date = parse_optional_iso_date(payload.birth_date.as_deref(), BIRTH_DATE)?;
    Ok(UserDraft {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        birth_date,
        address: payload.address,
        phone_number: payload.phone_number,
    })
}

fn parse_patch(payload: UserRequest) -> Result<UserPatch, Error> {
    let UserDraft {
        email,
        first_name,
        last_name,
        birth_date,
        address,
        phone_number,
    } = parse_draft(payload)?;
    Ok(UserPatch {
        email,
        first_name,
        last_name,
        birth_date,
        address,
        phone_number,
    })
}

fn parse_id(path: web::Path<String>) -> Result<UserId, Error> {
    parse_user_id(&path.into_inner(), ID)
}

impl From<UserDirectoryError> for Error {
    fn from(err: UserDirectoryError) -> Self {
        debug!(code = err.code(), error = %err, "user directory rejected request");
        match err {
            UserDirectoryError::NotFound { .. } => Self::not_found(err.to_string()),
            UserDirectoryError::InvalidAge { .. } | UserDirectoryError::InvalidRange { .. } => {
                Self::invalid_request(err.to_string())
            }
            UserDirectoryError::ValidationFailed { violations } => {
                let message = violations
                    .first()
                    .map(|violation| violation.to_string())
                    .unwrap_or_else(|| "Invalid user".to_owned());
                let details: Vec<_> = violations
                    .iter()
                    .map(|violation| {
                        json!({
                            "field": violation.field(),
                            "code": violation.code(),
                            "message": violation.to_string(),
                        })
                    })
                    .collect();
                Self::invalid_request(message).with_details(json!({ "violations": details }))
            }
        }
    }
}

/// List every user in insertion order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userbase::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users.list().await))
}

/// Users born strictly between `from` and `to`, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(
        ("from" = String, Query, description = "Exclusive lower bound, YYYY-MM-DD"),
        ("to" = String, Query, description = "Exclusive upper bound, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Matching users", body = [UserSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "searchUsersByBirthDate"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    query: web::Query<BirthDateRangeQuery>,
) -> ApiResult<web::Json<Vec<User>>> {
    let query = query.into_inner();
    let from = parse_required_iso_date(query.from.as_deref(), FROM)?;
    let to = parse_required_iso_date(query.to.as_deref(), TO)?;
    let users = state.users.search_by_birth_date_range(from, to).await?;
    Ok(web::Json(users))
}

/// Fetch a single user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_id(path)?;
    let user = state.users.get(id).await?;
    Ok(web::Json(user))
}

/// Create a user; the server assigns the identifier.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "Created user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_draft(payload.into_inner())?;
    let user = state.users.create(draft).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Replace every field of a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UserRequest,
    params(
        ("id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_id(path)?;
    let draft = parse_draft(payload.into_inner())?;
    let user = state.users.update(id, draft).await?;
    Ok(web::Json(user))
}

/// Overwrite only the supplied fields of a user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    request_body = UserRequest,
    params(
        ("id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Patched user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_id(path)?;
    let patch = parse_patch(payload.into_inner())?;
    let user = state.users.patch(id, patch).await?;
    Ok(web::Json(user))
}

/// Delete a user, answering with a plain-text confirmation.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(
        ("id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Deletion confirmation", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(path)?;
    let message = state.users.delete(id).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(message))
}

/// Register every user endpoint on `cfg`.
///
/// `search_users` is registered ahead of `get_user` so `/users/search` is
/// never captured as an identifier.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use userbase::inbound::http::users::configure_users;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_users));
/// ```
pub fn configure_users(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(search_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(patch_user)
        .service(delete_user);
}

#[cfg(test)]
mod tests;
