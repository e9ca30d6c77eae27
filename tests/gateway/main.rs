//! Gateway integration tests.

mod direct;
mod eventing;
mod support;

#[cfg(feature = "http")]
mod http;
