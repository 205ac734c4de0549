//! # Catalog Library Module
//!
//! Owns the catalog database and provides repository patterns for data
//! access.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite connection pooling and schema migrations
//! - Song and album repositories with filtering, sorting and pagination
//! - Random sampling for recommendations
//! - Mapping of query results into response DTOs

pub mod db;
pub mod dto;
pub mod error;
pub mod mapping;
pub mod models;
pub mod query;
pub mod repositories;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use error::{LibraryError, Result};
