//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ForumStore, ServerConfig};
pub(crate) use state_builders::run_bootstrap;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use homecraft::Trace;
#[cfg(debug_assertions)]
use homecraft::doc::ApiDoc;
use homecraft::inbound::http::configure_api;
use homecraft::inbound::http::health::{HealthState, live, ready};
use homecraft::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config.store, &config.context));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let prometheus = prometheus.ok_or_else(|| {
        std::io::Error::other("metrics feature enabled without a Prometheus registry")
    })?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use homecraft::domain::DEFAULT_SHORT_DESCRIPTION_LIMIT;
    use homecraft::inbound::http::state::ServiceContext;
    use homecraft::outbound::memory::InMemoryForum;
    use homecraft::test_support::{PlainTextHasher, fixed_clock};

    use super::*;

    fn context() -> ServiceContext {
        ServiceContext {
            hasher: Arc::new(PlainTextHasher),
            clock: fixed_clock(),
            description_limit: DEFAULT_SHORT_DESCRIPTION_LIMIT,
        }
    }

    fn deps() -> AppDependencies {
        let context = context();
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(HttpState::from_store(
                Arc::new(InMemoryForum::new()),
                context,
            )),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[actix_web::test]
    async fn api_and_probes_are_mounted() {
        let app = test::init_service(build_app(deps())).await;

        let categories = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/categories").to_request(),
        )
        .await;
        let live_response = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;

        assert_eq!(categories.status(), StatusCode::OK);
        assert!(categories.headers().contains_key("trace-id"));
        assert_eq!(live_response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn create_server_marks_ready() {
        let health_state = web::Data::new(HealthState::new());
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            SocketAddr::from(([127, 0, 0, 1], 0)),
            context(),
        );

        let server = create_server(health_state.clone(), config).expect("server binds");

        assert!(health_state.is_ready());
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(false).await;
    }
}
