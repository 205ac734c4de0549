//! Criteria-to-filter translation.
//!
//! Songs and albums are searched the same way: an optional year equality and
//! an optional keyword matched (ASCII letters case-insensitively) against the entity's own
//! title and, through `EXISTS` sub-queries, against related titles and
//! person names. [`SearchableEntity`] captures the per-entity SQL fragments
//! and [`build_query_spec`] turns a [`CatalogFilter`] into matching select
//! and count statements sharing one set of bind values.

use crate::repositories::sorting::{order_by_sql, OrderClause};
use serde::{Deserialize, Serialize};
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

/// Filter shared by the song and album searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Release year, compared for equality
    pub year: Option<i32>,
    /// Free-text keyword, already trimmed
    pub keyword: Option<String>,
}

impl CatalogFilter {
    pub fn new(year: Option<i32>, keyword: Option<String>) -> Self {
        Self { year, keyword }
    }

    /// Keyword with blank values treated as absent.
    fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

/// SQL fragments describing how one entity is searched.
pub trait SearchableEntity {
    /// Entity name used in logs.
    const ENTITY: &'static str;

    /// `FROM` clause of the select statement, joins included.
    const SELECT_FROM: &'static str;

    /// `FROM` clause of the count statement.
    const COUNT_FROM: &'static str;

    /// Column list of the select statement.
    const COLUMNS: &'static str;

    /// Base table and alias, used to rank rows by primary key.
    const TABLE: &'static str;

    /// Qualified primary key column.
    const ID_COLUMN: &'static str;

    /// Condition binding a single year.
    const YEAR_CONDITION: &'static str;

    /// Conditions OR-combined for a keyword, each binding the pattern once.
    const KEYWORD_CONDITIONS: &'static [&'static str];
}

/// Marker for song searches.
#[derive(Debug, Clone, Copy)]
pub struct SongSearch;

impl SearchableEntity for SongSearch {
    const ENTITY: &'static str = "Song";
    const SELECT_FROM: &'static str = "FROM songs s LEFT JOIN albums alb ON alb.id = s.album_id";
    const COUNT_FROM: &'static str = "FROM songs s";
    const COLUMNS: &'static str =
        "s.id, s.title, s.year, s.total_plays, s.album_id, alb.title AS album_title";
    const TABLE: &'static str = "songs";
    const ID_COLUMN: &'static str = "s.id";
    const YEAR_CONDITION: &'static str = "s.year = ?";
    const KEYWORD_CONDITIONS: &'static [&'static str] = &[
        "s.title LIKE ? ESCAPE '\\'",
        "EXISTS (SELECT 1 FROM albums ka WHERE ka.id = s.album_id \
            AND ka.title LIKE ? ESCAPE '\\')",
        "EXISTS (SELECT 1 FROM song_writers kw JOIN persons kp ON kp.id = kw.person_id \
            WHERE kw.song_id = s.id AND kp.name LIKE ? ESCAPE '\\')",
        "EXISTS (SELECT 1 FROM song_artists kr JOIN persons kp ON kp.id = kr.person_id \
            WHERE kr.song_id = s.id AND kp.name LIKE ? ESCAPE '\\')",
    ];
}

/// Marker for album searches.
///
/// Albums carry no year of their own; the year filter matches albums holding
/// at least one song released that year.
#[derive(Debug, Clone, Copy)]
pub struct AlbumSearch;

impl SearchableEntity for AlbumSearch {
    const ENTITY: &'static str = "Album";
    const SELECT_FROM: &'static str = "FROM albums a";
    const COUNT_FROM: &'static str = "FROM albums a";
    const COLUMNS: &'static str = "a.id, a.title";
    const TABLE: &'static str = "albums";
    const ID_COLUMN: &'static str = "a.id";
    const YEAR_CONDITION: &'static str =
        "EXISTS (SELECT 1 FROM songs ys WHERE ys.album_id = a.id AND ys.year = ?)";
    const KEYWORD_CONDITIONS: &'static [&'static str] = &[
        "a.title LIKE ? ESCAPE '\\'",
        "EXISTS (SELECT 1 FROM songs ks WHERE ks.album_id = a.id \
            AND ks.title LIKE ? ESCAPE '\\')",
        "EXISTS (SELECT 1 FROM songs ks JOIN song_writers kw ON kw.song_id = ks.id \
            JOIN persons kp ON kp.id = kw.person_id \
            WHERE ks.album_id = a.id AND kp.name LIKE ? ESCAPE '\\')",
        "EXISTS (SELECT 1 FROM songs ks JOIN song_artists kr ON kr.song_id = ks.id \
            JOIN persons kp ON kp.id = kr.person_id \
            WHERE ks.album_id = a.id AND kp.name LIKE ? ESCAPE '\\')",
    ];
}

/// Value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    I32(i32),
}

/// Select and count statements built from one filter.
///
/// Both statements carry the same WHERE clause and the same binds, so the
/// total always describes the rows the select pages through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub select_sql: String,
    pub count_sql: String,
    pub binds: Vec<BindValue>,
}

impl QuerySpec {
    /// Select statement with a `LIMIT ? OFFSET ?` window appended.
    pub fn windowed_select_sql(&self) -> String {
        format!("{} LIMIT ? OFFSET ?", self.select_sql)
    }
}

/// Escape LIKE wildcards and wrap the keyword for a substring match.
///
/// The keyword keeps its case. SQLite's `LIKE` folds ASCII letters only, so
/// `love` finds `Love Story` while non-ASCII letters such as `É` must match
/// exactly.
///
/// ```
/// use core_library::query::keyword_pattern;
///
/// assert_eq!(keyword_pattern("Love"), "%Love%");
/// assert_eq!(keyword_pattern("100%_"), "%100\\%\\_%");
/// ```
pub fn keyword_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Build select and count statements for `E` filtered by `filter`.
pub fn build_query_spec<E: SearchableEntity>(
    filter: &CatalogFilter,
    order: &[OrderClause],
) -> QuerySpec {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds = Vec::new();

    if let Some(year) = filter.year {
        conditions.push(E::YEAR_CONDITION.to_string());
        binds.push(BindValue::I32(year));
    }

    if let Some(keyword) = filter.effective_keyword() {
        let pattern = keyword_pattern(keyword);
        conditions.push(format!("({})", E::KEYWORD_CONDITIONS.join(" OR ")));
        binds.extend(E::KEYWORD_CONDITIONS.iter().map(|_| BindValue::Text(pattern.clone())));
    }

    let where_sql = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let select_sql = format!(
        "SELECT {} {}{}{}",
        E::COLUMNS,
        E::SELECT_FROM,
        where_sql,
        order_by_sql(order, E::ID_COLUMN)
    );
    let count_sql = format!("SELECT COUNT(*) AS count {}{}", E::COUNT_FROM, where_sql);

    QuerySpec {
        select_sql,
        count_sql,
        binds,
    }
}

/// Select `E` rows whose rank by primary key is one of `ordinal_count`
/// bound ordinals.
///
/// Ranking instead of matching ids directly keeps the result size equal to
/// the number of ordinals even when ids have gaps.
pub fn build_ordinal_sql<E: SearchableEntity>(ordinal_count: usize, order: &[OrderClause]) -> String {
    format!(
        "SELECT {} {} WHERE {} IN (SELECT ranked.id FROM \
            (SELECT id, ROW_NUMBER() OVER (ORDER BY id) AS ordinal FROM {}) ranked \
            WHERE ranked.ordinal IN ({})){}",
        E::COLUMNS,
        E::SELECT_FROM,
        E::ID_COLUMN,
        E::TABLE,
        placeholders(ordinal_count),
        order_by_sql(order, E::ID_COLUMN)
    )
}

/// Select one `E` row by primary key.
pub fn build_by_id_sql<E: SearchableEntity>() -> String {
    format!("SELECT {} {} WHERE {} = ?", E::COLUMNS, E::SELECT_FROM, E::ID_COLUMN)
}

/// `?, ?, ?` with `count` placeholders.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Bind every value of `binds` in order.
pub fn bind_values<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    binds: &'q [BindValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for bind in binds {
        query = match bind {
            BindValue::Text(value) => query.bind(value.as_str()),
            BindValue::I32(value) => query.bind(*value),
        };
    }
    query
}
