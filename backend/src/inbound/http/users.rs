//! Identity API handlers.
//!
//! ```text
//! POST /api/v1/register {"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","password":"secret"}
//! POST /api/v1/login {"email":"ada@example.com","password":"secret"}
//! POST /api/v1/logout
//! GET /api/v1/me
//! GET /api/v1/me/favorites
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Actor, Error, FieldErrors, LoginCredentials, LoginValidationError, Registration, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::topics_dto::TopicSummaryResponse;
use crate::inbound::http::validation::invalid_form;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// The part of a registration form that is echoed back on failure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterEcho<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
}

impl<'a> From<&'a RegisterRequest> for RegisterEcho<'a> {
    fn from(request: &'a RegisterRequest) -> Self {
        Self {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: &request.email,
        }
    }
}

/// Public view of an account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub joined_at: String,
    pub roles: Vec<String>,
}

impl UserResponse {
    fn new(user: &User, actor: Option<&Actor>) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_owned(),
            first_name: user.first_name.as_str().to_owned(),
            last_name: user.last_name.as_str().to_owned(),
            display_name: user.display_name(),
            joined_at: user.joined_at.to_rfc3339(),
            roles: actor
                .map(|actor| actor.roles().map(|role| role.as_str().to_owned()).collect())
                .unwrap_or_default(),
        }
    }
}

fn map_login_validation_error(err: &LoginValidationError, email: &str) -> Error {
    let mut errors = FieldErrors::new();
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    errors.push(field, err.to_string());
    invalid_form(&errors, &serde_json::json!({ "email": email }))
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_new(
        &payload.first_name,
        &payload.last_name,
        &payload.email,
        &payload.password,
    )
    .map_err(|errors| invalid_form(&errors, &RegisterEcho::from(&*payload)))?;
    let user = state.registration.register(registration).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Created().json(UserResponse::new(&user, None)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(&*payload)
        .map_err(|err| map_login_validation_error(&err, &payload.email))?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The signed-in account with its roles.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let user = state.identity.profile(actor.user_id()).await?;
    Ok(web::Json(UserResponse::new(&user, Some(&actor))))
}

/// Topics the signed-in user favorited, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/me/favorites",
    responses(
        (status = 200, description = "Favorited topics", body = [TopicSummaryResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "myFavorites"
)]
#[get("/me/favorites")]
pub async fn my_favorites(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TopicSummaryResponse>>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topics = state.topics_query.favorite_topics(&actor).await?;
    Ok(web::Json(topics.into_iter().map(Into::into).collect()))
}
