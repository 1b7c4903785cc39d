//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, Resource, test as actix_test, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::error::{json_config, query_config};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const SIGN_IN_PATH: &str = "/test-support/sign-in";

/// Build a session middleware configured for tests.
///
/// Each call generates a fresh key, names the cookie `session`, and drops the
/// `Secure` flag so plain HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Route that stores the path's user id in the session, standing in for the
/// external identity provider.
pub fn sign_in_resource() -> Resource {
    web::resource(format!("{SIGN_IN_PATH}/{{user_id}}")).route(web::post().to(
        |session: SessionContext, path: web::Path<String>| async move {
            let user_id = UserId::new(path.into_inner())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            session.persist_user(&user_id)?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        },
    ))
}

/// Sign `user_id` in through [`sign_in_resource`] and return the session cookie.
pub async fn signed_in_cookie<S>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "sign-in route failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Application wiring shared by handler tests: state, extractor error
/// handling, session middleware, the sign-in route, and handlers under `/api/v1`.
pub fn test_app(
    state: HttpState,
    configure: impl FnOnce(&mut web::ServiceConfig),
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
        .app_data(json_config())
        .app_data(query_config())
        .wrap(test_session_middleware())
        .service(sign_in_resource())
        .service(web::scope("/api/v1").configure(configure))
}
