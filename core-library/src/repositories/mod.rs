//! # Repository Pattern Implementation
//!
//! Read-only repositories over the catalog database.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//! - Searches return a [`Counted`](crate::models::Counted) window that the
//!   service layer wraps into a [`Page`]
//!
//! ## Available Repositories
//!
//! - `SongRepository` - Songs with album, writer, artist and play relations
//! - `AlbumRepository` - Albums with their songs

pub mod album;
pub mod pagination;
mod relations;
pub mod sampling;
pub mod song;
pub mod sorting;

pub use album::{AlbumRepository, SqliteAlbumRepository};
pub use pagination::{record_index, Page, PageRequest, Pagination};
pub use sampling::{sample_distinct, RandomRecommender, Recommender};
pub use song::{SongRepository, SqliteSongRepository};
pub use sorting::{
    build_order_by, AlbumSortField, OrderClause, SongSortField, SortDirection, SortableField,
};
