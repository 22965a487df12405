//! Extracts the [Session] of the signed-in user from the request cookies.
//!
//! Handlers that need a user take a `Session` and reject anonymous requests
//! with [Error::Unauthenticated]. Handlers that serve anonymous requests with
//! empty data take an `Option<Session>` instead.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{Error, auth::cookie::get_user_id_from_cookie, session::Session};

async fn session_from_parts<S>(parts: &mut Parts, state: &S) -> Option<Session>
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    };

    get_user_id_from_cookie(&jar).map(Session::new)
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .await
            .ok_or(Error::Unauthenticated)
    }
}

impl<S> OptionalFromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(session_from_parts(parts, state).await)
    }
}
