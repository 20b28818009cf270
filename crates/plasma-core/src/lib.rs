//! Core data types for `plasmactl publish`: global configuration, the
//! artifact descriptor, and repository identity discovery.

pub mod artifact;
pub mod config;
pub mod identity;
