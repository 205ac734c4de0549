//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the song catalog service:
//! - Logging and tracing infrastructure
//! - Server configuration
//! - Injectable clock
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other crates depend on.
//! It establishes the logging conventions and the configuration surface used
//! throughout the system.

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
