#![allow(missing_docs)]

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, auth::COOKIE_USER_ID, build_router, endpoints};

pub(crate) fn get_test_server() -> TestServer {
    get_test_server_with_state().0
}

/// A test server together with a handle on its state.
///
/// The state shares its store and request trackers with the server.
pub(crate) fn get_test_server_with_state() -> (TestServer, AppState) {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let state = AppState::new(connection, "42").expect("Could not create app state.");
    let server =
        TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

    (server, state)
}

/// Sign in as `user_id` and return the session cookie.
pub(crate) async fn sign_in(server: &TestServer, user_id: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::SIGN_IN)
        .json(&json!({ "user_id": user_id }))
        .await;

    response.assert_status_ok();
    response.cookie(COOKIE_USER_ID)
}
