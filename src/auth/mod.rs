//! Session cookies for the user signed in through the external identity provider.

mod cookie;
mod extract;
mod sign_in;

pub(crate) use cookie::DEFAULT_COOKIE_DURATION;
pub use sign_in::{sign_in_endpoint, sign_out_endpoint};

#[cfg(test)]
pub(crate) use cookie::COOKIE_USER_ID;
