//! Defines functions for storing the signed-in user in a private cookie.
//!
//! Session cookies are marked secure, so browsers only send them over HTTPS
//! or to localhost. The server speaks plain HTTP and expects a reverse proxy
//! to terminate TLS in front of it.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::session::UserId;

pub(crate) const COOKIE_USER_ID: &str = "user_id";
/// The default duration for which session cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::days(1);

/// Add a session cookie to the cookie jar, indicating that `user_id` is signed in.
///
/// The cookie expires `duration` from the current time.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    user_id: &UserId,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(
        Cookie::build((COOKIE_USER_ID, user_id.as_str().to_owned()))
            .expires(expiry)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            // TLS is terminated by the reverse proxy in front of the server.
            .secure(true),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USER_ID, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            // Must match the session cookie or browsers keep the old one.
            .secure(true),
    )
}

/// Get the signed-in user from `jar`.
///
/// Returns `None` if the cookie is missing, could not be decrypted or holds
/// a blank ID.
pub(crate) fn get_user_id_from_cookie(jar: &PrivateCookieJar) -> Option<UserId> {
    jar.get(COOKIE_USER_ID)
        .and_then(|cookie| UserId::new(cookie.value_trimmed()))
}
