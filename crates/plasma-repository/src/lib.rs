//! Artifacts repository protocol: endpoint selection, authentication,
//! and the probe-then-upload transfer of a packaged archive.

pub mod auth;
pub mod endpoint;
pub mod publish;
pub mod repository;
pub mod transport;
