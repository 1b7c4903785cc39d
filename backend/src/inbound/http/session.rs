//! Signed-in user lookup for HTTP handlers.
//!
//! Sign-in happens upstream of this service; the private session cookie
//! arrives already carrying the caller's user id under [`USER_ID_KEY`].
//! Handlers take a [`SessionContext`] and call
//! [`SessionContext::require_user_id`] before touching any port.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Session view limited to the signed-in user id.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// The caller's user id, or `401 Unauthorized` when the cookie carries
    /// none. A value that is not a UUID is treated as absent.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        raw.and_then(|raw| {
            UserId::new(&raw)
                .inspect_err(|error| warn!(%error, "ignoring malformed user id in session"))
                .ok()
        })
        .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Record `user_id` as signed in; stands in for the identity provider.
    #[cfg(test)]
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self(req.get_session())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use crate::inbound::http::test_utils::test_session_middleware;

    const ALICE: &str = "6f1d2a4e-8c1b-4b6e-9a55-1f6f6b8f0c21";

    /// Status and body of `GET /whoami` after the cookie holds `stored`.
    async fn whoami_with(stored: Option<&str>) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/store/{raw}",
                    web::post().to(|session: Session, raw: web::Path<String>| async move {
                        session
                            .insert(USER_ID_KEY, raw.into_inner())
                            .map_err(|error| Error::internal(error.to_string()))?;
                        Ok::<_, Error>(HttpResponse::NoContent())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let user_id = session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(user_id.to_string()))
                    }),
                ),
        )
        .await;

        let mut request = test::TestRequest::get().uri("/whoami");
        if let Some(raw) = stored {
            let stored = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&format!("/store/{raw}"))
                    .to_request(),
            )
            .await;
            let cookie = stored
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .map(|cookie| cookie.into_owned())
                .expect("session cookie set");
            request = request.cookie(cookie);
        }

        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn stored_user_id_is_returned() {
        let (status, body) = whoami_with(Some(ALICE)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, ALICE);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("user-42"))]
    #[actix_web::test]
    async fn missing_or_malformed_user_id_is_unauthorised(#[case] stored: Option<&str>) {
        let (status, _) = whoami_with(stored).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn persisted_user_round_trips_through_the_cookie() {
        let user_id = UserId::new(ALICE).expect("fixture id");
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/sign-in",
                    web::post().to(move |session: SessionContext| async move {
                        session.persist_user(&user_id)?;
                        Ok::<_, Error>(HttpResponse::NoContent())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let user_id = session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(user_id.to_string()))
                    }),
                ),
        )
        .await;

        let signed_in =
            test::call_service(&app, test::TestRequest::post().uri("/sign-in").to_request()).await;
        let cookie = signed_in
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(|cookie| cookie.into_owned())
            .expect("session cookie set");
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(test::read_body(response).await, ALICE);
    }
}
