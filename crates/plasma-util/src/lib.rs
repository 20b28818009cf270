//! Shared utilities for the `plasmactl publish` workspace.
//!
//! Cross-cutting concerns used by every other crate: the unified error
//! type, filesystem helpers, file hashing, process spawning, and
//! Cargo-style terminal status lines.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod process;
pub mod progress;
