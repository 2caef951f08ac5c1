//! Helpers for handler tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

pub(crate) const SESSION_COOKIE: &str = "session";

const SIGN_IN_PATH: &str = "/test/sign-in";

/// Cookie sessions with a fresh key and no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

async fn sign_in_as(session: SessionContext, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id: UserId = parse_id(&path.into_inner(), "userId")?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// The full API over `state`, plus a route that signs in any user id.
pub fn forum_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route(
            &format!("{SIGN_IN_PATH}/{{user_id}}"),
            web::post().to(sign_in_as),
        )
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Request that signs `user_id` in on an app built by [`forum_app`].
pub fn sign_in_request(user_id: &UserId) -> test::TestRequest {
    test::TestRequest::post().uri(&format!("{SIGN_IN_PATH}/{user_id}"))
}

/// Sign `$user` in on `$app` and yield the session cookie.
macro_rules! signed_in {
    ($app:expr, $user:expr) => {{
        let response = actix_web::test::call_service(
            $app,
            $crate::inbound::http::test_utils::sign_in_request($user).to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&response)
    }};
}
pub(crate) use signed_in;
