//! Shared loading helpers used by the song and album repositories.

use crate::error::{LibraryError, Result};
use crate::models::{Counted, CreditRow, PlayRow, SongAggregate, SongProjection, SongRow};
use crate::query::{bind_values, build_query_spec, placeholders, CatalogFilter, SearchableEntity};
use crate::repositories::sorting::OrderClause;
use crate::repositories::PageRequest;
use sqlx::sqlite::SqliteRow;
use sqlx::{query_as, FromRow, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

/// Run the count and the windowed select of one search concurrently.
pub(crate) async fn search_window<E, T>(
    pool: &SqlitePool,
    filter: &CatalogFilter,
    order: &[OrderClause],
    page: PageRequest,
) -> Result<Counted<T>>
where
    E: SearchableEntity,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let spec = build_query_spec::<E>(filter, order);
    let select_sql = spec.windowed_select_sql();
    let (offset, limit) = page.window();

    let count = async {
        let row: (i64,) = bind_values(query_as(&spec.count_sql), &spec.binds)
            .fetch_one(pool)
            .await?;
        Ok::<_, LibraryError>(row.0)
    };

    let rows = async {
        let rows = bind_values(query_as::<_, T>(&select_sql), &spec.binds)
            .bind(i64::from(limit))
            .bind(offset as i64)
            .fetch_all(pool)
            .await?;
        Ok::<_, LibraryError>(rows)
    };

    let (total, rows) = futures::try_join!(count, rows)?;

    debug!(
        entity = E::ENTITY,
        total,
        returned = rows.len(),
        page = page.page,
        limit,
        "Search window fetched"
    );

    Ok(Counted::new(rows, total.max(0) as u64))
}

/// Fetch rows of `E` by their rank in primary key order.
pub(crate) async fn fetch_by_ordinals<E, T>(
    pool: &SqlitePool,
    ordinals: &[i64],
    order: &[OrderClause],
) -> Result<Vec<T>>
where
    E: SearchableEntity,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    if ordinals.is_empty() {
        return Ok(Vec::new());
    }

    let sql = crate::query::build_ordinal_sql::<E>(ordinals.len(), order);
    let mut query = query_as::<_, T>(&sql);
    for ordinal in ordinals {
        query = query.bind(*ordinal);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Number of rows in `E`'s base table.
pub(crate) async fn count_all<E: SearchableEntity>(pool: &SqlitePool) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
    let row: (i64,) = query_as(&sql).fetch_one(pool).await?;
    Ok(row.0)
}

#[derive(Debug, Clone, Copy)]
enum CreditRole {
    Writer,
    Artist,
}

impl CreditRole {
    fn table(&self) -> &'static str {
        match self {
            CreditRole::Writer => "song_writers",
            CreditRole::Artist => "song_artists",
        }
    }
}

async fn load_credits(
    pool: &SqlitePool,
    role: CreditRole,
    song_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>> {
    let sql = format!(
        "SELECT c.song_id, p.name FROM {} c JOIN persons p ON p.id = c.person_id \
         WHERE c.song_id IN ({}) ORDER BY c.song_id, p.name",
        role.table(),
        placeholders(song_ids.len())
    );

    let mut query = query_as::<_, CreditRow>(&sql);
    for id in song_ids {
        query = query.bind(*id);
    }

    let mut credits: HashMap<i64, Vec<String>> = HashMap::new();
    for row in query.fetch_all(pool).await? {
        credits.entry(row.song_id).or_default().push(row.name);
    }
    Ok(credits)
}

/// Most recent plays per song, newest year and month first, at most `cap` each.
async fn load_recent_plays(
    pool: &SqlitePool,
    song_ids: &[i64],
    cap: u32,
) -> Result<HashMap<i64, Vec<PlayRow>>> {
    let sql = format!(
        "SELECT song_id, month, year, play_count FROM ( \
            SELECT pl.song_id, pl.month, pl.year, pl.play_count, \
                ROW_NUMBER() OVER ( \
                    PARTITION BY pl.song_id ORDER BY pl.year DESC, pl.month DESC \
                ) AS recency \
            FROM plays pl WHERE pl.song_id IN ({}) \
         ) WHERE recency <= ? \
         ORDER BY song_id, year DESC, month DESC",
        placeholders(song_ids.len())
    );

    let mut query = query_as::<_, PlayRow>(&sql);
    for id in song_ids {
        query = query.bind(*id);
    }
    query = query.bind(i64::from(cap));

    let mut plays: HashMap<i64, Vec<PlayRow>> = HashMap::new();
    for row in query.fetch_all(pool).await? {
        plays.entry(row.song_id).or_default().push(row);
    }
    Ok(plays)
}

/// Attach writer and artist names, and plays when projected, to song rows.
///
/// Row order is preserved.
pub(crate) async fn hydrate_songs(
    pool: &SqlitePool,
    rows: Vec<SongRow>,
    projection: SongProjection,
) -> Result<Vec<SongAggregate>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let plays = async {
        if projection.include_plays {
            load_recent_plays(pool, &ids, SongProjection::PLAY_HISTORY_CAP)
                .await
                .map(Some)
        } else {
            Ok(None)
        }
    };

    let (mut writers, mut artists, mut plays) = futures::try_join!(
        load_credits(pool, CreditRole::Writer, &ids),
        load_credits(pool, CreditRole::Artist, &ids),
        plays,
    )?;

    Ok(rows
        .into_iter()
        .map(|song| {
            let id = song.id;
            SongAggregate {
                writers: writers.remove(&id).unwrap_or_default(),
                artists: artists.remove(&id).unwrap_or_default(),
                plays: plays
                    .as_mut()
                    .map(|by_song| by_song.remove(&id).unwrap_or_default()),
                song,
            }
        })
        .collect())
}
