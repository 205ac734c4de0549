//! Workspace umbrella crate.
//!
//! Re-exports the individual workspace crates so a host can depend on
//! `catalog-workspace` alone. The `http` feature (on by default) pulls in the
//! axum surface from `bridge-http`.

pub use core_library as library;
pub use core_runtime as runtime;
pub use core_service as service;

#[cfg(feature = "http")]
pub use bridge_http as http;
