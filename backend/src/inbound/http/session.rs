//! Cookie session access for handlers.
//!
//! Only the user id is stored. Roles are looked up per request so a revoked
//! administrator loses access without signing out.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::IdentityQuery;
use crate::domain::{Actor, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `user_id` for subsequent requests, rotating the session id.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in user, or `None` for anonymous or tampered sessions.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match raw.parse::<UserId>() {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }))
    }

    /// # Errors
    ///
    /// `unauthorized` when nobody is signed in.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the signed-in user together with their roles.
    pub async fn require_actor(&self, identity: &dyn IdentityQuery) -> Result<Actor, Error> {
        let user_id = self.require_user_id()?;
        identity.actor_for(&user_id).await
    }

    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    const ADA: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn set_ada(session: SessionContext) -> Result<HttpResponse, Error> {
        let id: UserId = ADA.parse().map_err(|_| Error::internal("fixture id"))?;
        session.persist_user(&id)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/set", web::get().to(set_ada))
                .route("/get", web::get().to(whoami)),
        )
        .await;

        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set);
        let get = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(get.status(), StatusCode::OK);
        assert_eq!(test::read_body(get).await, ADA);
    }

    #[actix_web::test]
    async fn anonymous_requests_are_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/get", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_user_ids_are_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/tamper",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route("/get", web::get().to(whoami)),
        )
        .await;

        let set =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(session_cookie(&set))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
