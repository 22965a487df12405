//! Endpoints for starting and ending a session.
//!
//! Credentials are checked by the external identity provider. The client
//! posts the user ID the provider issued and receives an encrypted session
//! cookie in return.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::{
    AppState, Error,
    auth::cookie::{get_user_id_from_cookie, invalidate_session_cookie, set_session_cookie},
    request::RequestTrackers,
    session::UserId,
};

/// The state needed for signing in.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
    /// Requests in flight are invalidated when the signed-in user changes.
    pub request_trackers: RequestTrackers,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_duration: state.cookie_duration,
            request_trackers: state.request_trackers.clone(),
        }
    }
}

/// The body of a sign-in request.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    /// The ID issued by the identity provider.
    pub user_id: String,
}

/// A route handler that signs in the user in `form`.
///
/// # Errors
/// Returns [Error::EmptyUserId] if the user ID is blank.
pub async fn sign_in_endpoint(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Json(form): Json<SignInForm>,
) -> Result<impl IntoResponse, Error> {
    let user_id = UserId::new(&form.user_id).ok_or(Error::EmptyUserId)?;

    if let Some(previous_user_id) = get_user_id_from_cookie(&jar) {
        state.request_trackers.reset_identity(&previous_user_id);
    }
    state.request_trackers.reset_identity(&user_id);

    let jar = set_session_cookie(jar, &user_id, state.cookie_duration);

    tracing::info!("user {user_id} signed in");

    Ok((jar, Json(json!({ "user_id": user_id }))))
}

/// A route handler that ends the current session, if any.
///
/// Requests the user still has in flight stop being current.
pub async fn sign_out_endpoint(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    if let Some(user_id) = get_user_id_from_cookie(&jar) {
        state.request_trackers.reset_identity(&user_id);
        tracing::info!("user {user_id} signed out");
    }

    (invalidate_session_cookie(jar), StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        auth::cookie::COOKIE_USER_ID,
        endpoints,
        session::{Session, UserId},
        test_utils::{get_test_server, get_test_server_with_state, sign_in},
    };

    #[tokio::test]
    async fn sign_in_sets_encrypted_cookie() {
        let server = get_test_server();

        let response = server
            .post(endpoints::SIGN_IN)
            .json(&json!({ "user_id": "alice" }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "user_id": "alice" }));
        let cookie = response.cookie(COOKIE_USER_ID);
        assert_ne!(cookie.value(), "alice");
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[tokio::test]
    async fn blank_user_id_is_rejected() {
        let server = get_test_server();

        server
            .post(endpoints::SIGN_IN)
            .json(&json!({ "user_id": "  " }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn sign_out_clears_cookie() {
        let server = get_test_server();
        let cookie = sign_in(&server, "alice").await;

        let response = server.post(endpoints::SIGN_OUT).add_cookie(cookie).await;

        response.assert_status(StatusCode::NO_CONTENT);
        let cookie = response.cookie(COOKIE_USER_ID);
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    #[tokio::test]
    async fn sign_out_invalidates_requests_in_flight() {
        let (server, state) = get_test_server_with_state();
        let cookie = sign_in(&server, "alice").await;
        let alice = Session::new(UserId::new("alice").unwrap());
        let token = state.request_trackers.issue(&alice);
        assert!(state.request_trackers.is_current(&token));

        server
            .post(endpoints::SIGN_OUT)
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert!(!state.request_trackers.is_current(&token));
    }

    #[tokio::test]
    async fn signing_in_again_invalidates_requests_in_flight() {
        let (server, state) = get_test_server_with_state();
        sign_in(&server, "alice").await;
        let token = state
            .request_trackers
            .issue(&Session::new(UserId::new("alice").unwrap()));

        sign_in(&server, "alice").await;

        assert!(!state.request_trackers.is_current(&token));
    }

    #[tokio::test]
    async fn sign_out_leaves_other_users_requests_current() {
        let (server, state) = get_test_server_with_state();
        let alice_cookie = sign_in(&server, "alice").await;
        sign_in(&server, "bob").await;
        let bob_token = state
            .request_trackers
            .issue(&Session::new(UserId::new("bob").unwrap()));

        server
            .post(endpoints::SIGN_OUT)
            .add_cookie(alice_cookie)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert!(state.request_trackers.is_current(&bob_token));
    }
}
