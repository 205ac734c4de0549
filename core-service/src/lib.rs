//! Catalog service façade.
//!
//! Validates request criteria and runs the song and album services on top
//! of the repositories from `core-library`. Hosts build one
//! [`CatalogService`] at start-up and share it across requests; it holds no
//! per-request state.

pub mod albums;
pub mod criteria;
pub mod error;
pub mod songs;

pub use albums::AlbumService;
pub use criteria::{CriteriaParser, QueryParams};
pub use error::{FieldError, Result, ServiceError, ValidationErrors};
pub use songs::SongService;

use core_runtime::config::PaginationLimits;
use core_runtime::time::{Clock, SystemClock};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Primary façade exposed to hosts.
#[derive(Clone)]
pub struct CatalogService {
    songs: SongService,
    albums: AlbumService,
    criteria: CriteriaParser,
}

impl CatalogService {
    /// Assemble a façade from explicit parts.
    pub fn new(songs: SongService, albums: AlbumService, criteria: CriteriaParser) -> Self {
        Self {
            songs,
            albums,
            criteria,
        }
    }

    /// SQLite-backed services reading the time from `clock`.
    pub fn from_pool(pool: SqlitePool, limits: PaginationLimits, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            SongService::from_pool(pool.clone()),
            AlbumService::from_pool(pool),
            CriteriaParser::new(limits, clock),
        )
    }

    /// SQLite-backed services on the system clock.
    pub fn with_system_clock(pool: SqlitePool, limits: PaginationLimits) -> Self {
        Self::from_pool(pool, limits, Arc::new(SystemClock))
    }

    pub fn songs(&self) -> &SongService {
        &self.songs
    }

    pub fn albums(&self) -> &AlbumService {
        &self.albums
    }

    pub fn criteria(&self) -> &CriteriaParser {
        &self.criteria
    }
}
