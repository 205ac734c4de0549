//! Sorting helpers
//!
//! Callers name sort fields by their public names (`songName`, `year`, ...).
//! Each entity exposes a closed set of those names as an enum implementing
//! [`SortableField`], which maps every field to the column it orders by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction shared by every field of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction: {}", other)),
        }
    }
}

/// A closed set of sortable fields for one entity.
pub trait SortableField: Copy + Sized + 'static {
    /// Every field, in the order they are advertised to callers.
    const ALL: &'static [Self];

    /// Public name used in query strings.
    fn name(&self) -> &'static str;

    /// Qualified column the field orders by.
    fn column(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }

    /// Comma separated list of the public names, for error messages.
    fn names() -> String {
        Self::ALL
            .iter()
            .map(|field| field.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SongSortField {
    SongName,
    AlbumName,
    Year,
    TotalPlays,
}

impl SortableField for SongSortField {
    const ALL: &'static [Self] = &[
        SongSortField::SongName,
        SongSortField::AlbumName,
        SongSortField::Year,
        SongSortField::TotalPlays,
    ];

    fn name(&self) -> &'static str {
        match self {
            SongSortField::SongName => "songName",
            SongSortField::AlbumName => "albumName",
            SongSortField::Year => "year",
            SongSortField::TotalPlays => "totalPlays",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            SongSortField::SongName => "s.title",
            SongSortField::AlbumName => "alb.title",
            SongSortField::Year => "s.year",
            SongSortField::TotalPlays => "s.total_plays",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumSortField {
    AlbumName,
}

impl SortableField for AlbumSortField {
    const ALL: &'static [Self] = &[AlbumSortField::AlbumName];

    fn name(&self) -> &'static str {
        match self {
            AlbumSortField::AlbumName => "albumName",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            AlbumSortField::AlbumName => "a.title",
        }
    }
}

/// One `column DIRECTION` term of an ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl OrderClause {
    pub fn new(column: &'static str, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.direction.as_sql())
    }
}

/// Translate caller-supplied field names into order clauses.
///
/// Output order follows input order, so the first name is the primary key.
/// Names that do not belong to `F` are skipped.
///
/// ```
/// use core_library::repositories::sorting::{build_order_by, SongSortField, SortDirection};
///
/// let clauses = build_order_by::<SongSortField, _>(&["year", "bogus", "songName"], SortDirection::Desc);
/// let sql: Vec<String> = clauses.iter().map(|c| c.to_sql()).collect();
/// assert_eq!(sql, vec!["s.year DESC", "s.title DESC"]);
/// ```
pub fn build_order_by<F, S>(names: &[S], direction: SortDirection) -> Vec<OrderClause>
where
    F: SortableField,
    S: AsRef<str>,
{
    names
        .iter()
        .filter_map(|name| F::from_name(name.as_ref().trim()))
        .map(|field| OrderClause::new(field.column(), direction))
        .collect()
}

/// Render an ORDER BY clause, always ending with `tie_breaker ASC`.
///
/// The tie breaker keeps page windows stable when the requested fields do
/// not order rows totally.
pub fn order_by_sql(clauses: &[OrderClause], tie_breaker: &str) -> String {
    let mut terms: Vec<String> = clauses.iter().map(OrderClause::to_sql).collect();
    terms.push(format!("{} ASC", tie_breaker));
    format!(" ORDER BY {}", terms.join(", "))
}
