//! Request criteria and their validation.
//!
//! Handlers hand over the raw query string as a map of parameter names to
//! values. [`CriteriaParser`] coerces those strings into typed criteria,
//! applies defaults, and collects every violation into a
//! [`ValidationErrors`] instead of stopping at the first one.

use crate::error::ValidationErrors;
use core_library::repositories::{
    AlbumSortField, PageRequest, SongSortField, SortDirection, SortableField,
};
use core_runtime::config::PaginationLimits;
use core_runtime::time::Clock;
use std::collections::HashMap;
use std::sync::Arc;

/// Raw query parameters of one request.
pub type QueryParams = HashMap<String, String>;

pub const PARAM_YEAR: &str = "year";
pub const PARAM_KEYWORD: &str = "keyword";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_ORDER_BY: &str = "orderBy";
pub const PARAM_ORDER_DIRECTION: &str = "orderDirection";
pub const PARAM_INCLUDE_PLAY_DATA: &str = "includePlayData";
pub const PARAM_INCLUDE_SONG_DATA: &str = "includeSongData";
pub const PARAM_MONTH_YEARS: &str = "monthYears";

/// Ordered sort fields plus the direction applied to all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriteria<F> {
    pub fields: Vec<F>,
    pub direction: SortDirection,
}

impl<F: SortableField> SortCriteria<F> {
    /// Public field names in request order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name()).collect()
    }
}

impl<F> Default for SortCriteria<F> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            direction: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSongCriteria {
    pub year: Option<i32>,
    pub keyword: Option<String>,
    pub include_play_data: bool,
    pub page: PageRequest,
    pub sort: SortCriteria<SongSortField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SongByIdCriteria {
    pub include_play_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecommendationCriteria {
    pub include_play_data: bool,
    pub sort: SortCriteria<SongSortField>,
    pub limit: u32,
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopSongsCriteria {
    pub month_years: Vec<MonthYear>,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAlbumCriteria {
    pub year: Option<i32>,
    pub keyword: Option<String>,
    pub include_song_data: bool,
    pub page: PageRequest,
    pub sort: SortCriteria<AlbumSortField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlbumByIdCriteria {
    pub include_song_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRecommendationCriteria {
    pub include_song_data: bool,
    pub sort: SortCriteria<AlbumSortField>,
    pub limit: u32,
}

/// Message used when the upper limit bound is violated.
#[derive(Debug, Clone, Copy)]
enum LimitLabel {
    Limit,
    SongLimit,
}

/// Accumulates the violations of one request while fields are parsed.
struct FieldReader<'a> {
    params: &'a QueryParams,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    fn new(params: &'a QueryParams) -> Self {
        Self {
            params,
            errors: ValidationErrors::new(),
        }
    }

    fn raw(&self, name: &str) -> Option<&'a str> {
        self.params.get(name).map(String::as_str)
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(field, message);
    }

    fn year(&mut self) -> Option<i32> {
        let raw = self.raw(PARAM_YEAR).filter(|value| !value.is_empty())?;

        let is_four_digits = raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit());
        match raw.parse::<i32>() {
            Ok(year) if is_four_digits => Some(year),
            _ => {
                self.reject(PARAM_YEAR, "Year must be a 4-digit number or omitted");
                None
            }
        }
    }

    fn keyword(&mut self) -> Option<String> {
        let raw = self.raw(PARAM_KEYWORD).filter(|value| !value.is_empty())?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.reject(PARAM_KEYWORD, "Keyword cannot be an empty string");
            return None;
        }
        Some(trimmed.to_string())
    }

    fn flag(&mut self, name: &str) -> bool {
        match self.raw(name) {
            None => false,
            Some(raw) if raw.eq_ignore_ascii_case("true") => true,
            Some(raw) if raw.eq_ignore_ascii_case("false") => false,
            Some(_) => {
                self.reject(name, format!("{} must be \"true\" or \"false\"", name));
                false
            }
        }
    }

    fn page(&mut self) -> u32 {
        let Some(raw) = self.raw(PARAM_PAGE) else {
            return 1;
        };

        match parse_integer(raw) {
            Some(page) if page > 0 => u32::try_from(page).unwrap_or(u32::MAX),
            _ => {
                self.reject(PARAM_PAGE, "Page must be greater than 0");
                1
            }
        }
    }

    fn limit(&mut self, limits: &PaginationLimits, label: LimitLabel) -> u32 {
        let Some(raw) = self.raw(PARAM_LIMIT) else {
            return limits.default_limit;
        };

        let parsed = parse_integer(raw);
        let above_min = parsed.is_some_and(|v| v >= i64::from(limits.min_limit));
        let below_max = parsed.is_some_and(|v| v <= i64::from(limits.max_limit));

        // An unparseable value fails both bounds.
        if !above_min {
            self.reject(
                PARAM_LIMIT,
                format!(
                    "Limit must be greater than {}",
                    limits.min_limit.saturating_sub(1)
                ),
            );
        }
        if !below_max {
            let prefix = match label {
                LimitLabel::Limit => "Limit",
                LimitLabel::SongLimit => "Song limit",
            };
            self.reject(
                PARAM_LIMIT,
                format!("{} must be less than or equal to {}", prefix, limits.max_limit),
            );
        }

        match parsed {
            Some(v) if above_min && below_max => v as u32,
            _ => limits.default_limit,
        }
    }

    fn order_by<F: SortableField>(&mut self) -> Vec<F> {
        let Some(raw) = self.raw(PARAM_ORDER_BY).filter(|value| !value.is_empty()) else {
            return Vec::new();
        };

        let names: Vec<&str> = raw.split(',').map(str::trim).collect();
        let fields: Vec<F> = names.iter().filter_map(|name| F::from_name(name)).collect();

        if fields.len() != names.len() {
            self.reject(
                PARAM_ORDER_BY,
                format!("Invalid orderBy value. Use {}", F::names()),
            );
            return Vec::new();
        }
        fields
    }

    fn order_direction(&mut self) -> SortDirection {
        match self.raw(PARAM_ORDER_DIRECTION) {
            None => SortDirection::Asc,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                self.reject(
                    PARAM_ORDER_DIRECTION,
                    "Invalid orderDirection value. Use \"asc\" or \"desc\"",
                );
                SortDirection::Asc
            }),
        }
    }

    fn sort<F: SortableField>(&mut self) -> SortCriteria<F> {
        let fields = self.order_by::<F>();
        let direction = self.order_direction();
        SortCriteria { fields, direction }
    }

    fn month_years(&mut self, clock: &dyn Clock) -> Vec<MonthYear> {
        let Some(raw) = self.raw(PARAM_MONTH_YEARS) else {
            let (year, month) = clock.current_year_month();
            return vec![MonthYear::new(month, year)];
        };

        match raw.split(',').map(parse_month_year).collect::<Option<Vec<_>>>() {
            Some(month_years) => month_years,
            None => {
                self.reject(
                    PARAM_MONTH_YEARS,
                    "Invalid date format, expected YYYY-MM,YYYY-MM,...",
                );
                Vec::new()
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// Whole-string integer with an optional sign; surrounding whitespace is
/// ignored and any other trailing text rejects the value.
fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parse a strict `YYYY-MM` token with month `01..=12`.
fn parse_month_year(token: &str) -> Option<MonthYear> {
    let (year, month) = token.split_once('-')?;

    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(year, 4) || !digits(month, 2) {
        return None;
    }

    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(MonthYear::new(month, year.parse().ok()?))
}

/// Turns raw query parameters into validated criteria.
#[derive(Clone)]
pub struct CriteriaParser {
    limits: PaginationLimits,
    clock: Arc<dyn Clock>,
}

impl CriteriaParser {
    pub fn new(limits: PaginationLimits, clock: Arc<dyn Clock>) -> Self {
        Self { limits, clock }
    }

    pub fn search_songs(&self, params: &QueryParams) -> Result<SearchSongCriteria, ValidationErrors> {
        let mut reader = FieldReader::new(params);

        let year = reader.year();
        let keyword = reader.keyword();
        let include_play_data = reader.flag(PARAM_INCLUDE_PLAY_DATA);
        let page = reader.page();
        let limit = reader.limit(&self.limits, LimitLabel::Limit);
        let sort = reader.sort::<SongSortField>();

        reader.finish(SearchSongCriteria {
            year,
            keyword,
            include_play_data,
            page: PageRequest::new(page, limit),
            sort,
        })
    }

    pub fn song_by_id(&self, params: &QueryParams) -> Result<SongByIdCriteria, ValidationErrors> {
        let mut reader = FieldReader::new(params);
        let include_play_data = reader.flag(PARAM_INCLUDE_PLAY_DATA);
        reader.finish(SongByIdCriteria { include_play_data })
    }

    pub fn song_recommendations(
        &self,
        params: &QueryParams,
    ) -> Result<SongRecommendationCriteria, ValidationErrors> {
        let mut reader = FieldReader::new(params);

        let include_play_data = reader.flag(PARAM_INCLUDE_PLAY_DATA);
        let sort = reader.sort::<SongSortField>();
        let limit = reader.limit(&self.limits, LimitLabel::Limit);

        reader.finish(SongRecommendationCriteria {
            include_play_data,
            sort,
            limit,
        })
    }

    pub fn top_songs(&self, params: &QueryParams) -> Result<TopSongsCriteria, ValidationErrors> {
        let mut reader = FieldReader::new(params);

        let month_years = reader.month_years(self.clock.as_ref());
        let limit = reader.limit(&self.limits, LimitLabel::SongLimit);

        reader.finish(TopSongsCriteria { month_years, limit })
    }

    pub fn search_albums(
        &self,
        params: &QueryParams,
    ) -> Result<SearchAlbumCriteria, ValidationErrors> {
        let mut reader = FieldReader::new(params);

        let year = reader.year();
        let keyword = reader.keyword();
        let include_song_data = reader.flag(PARAM_INCLUDE_SONG_DATA);
        let page = reader.page();
        let limit = reader.limit(&self.limits, LimitLabel::Limit);
        let sort = reader.sort::<AlbumSortField>();

        reader.finish(SearchAlbumCriteria {
            year,
            keyword,
            include_song_data,
            page: PageRequest::new(page, limit),
            sort,
        })
    }

    pub fn album_by_id(&self, params: &QueryParams) -> Result<AlbumByIdCriteria, ValidationErrors> {
        let mut reader = FieldReader::new(params);
        let include_song_data = reader.flag(PARAM_INCLUDE_SONG_DATA);
        reader.finish(AlbumByIdCriteria { include_song_data })
    }

    pub fn album_recommendations(
        &self,
        params: &QueryParams,
    ) -> Result<AlbumRecommendationCriteria, ValidationErrors> {
        let mut reader = FieldReader::new(params);

        let include_song_data = reader.flag(PARAM_INCLUDE_SONG_DATA);
        let sort = reader.sort::<AlbumSortField>();
        let limit = reader.limit(&self.limits, LimitLabel::Limit);

        reader.finish(AlbumRecommendationCriteria {
            include_song_data,
            sort,
            limit,
        })
    }
}

impl std::fmt::Debug for CriteriaParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaParser")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use core_runtime::time::FixedClock;

    fn parser() -> CriteriaParser {
        let clock = FixedClock::at_month(2024, 3).unwrap();
        CriteriaParser::new(PaginationLimits::default(), Arc::new(clock))
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn messages(errors: ValidationErrors) -> Vec<(String, String)> {
        errors
            .into_errors()
            .into_iter()
            .map(|FieldError { field, message }| (field, message))
            .collect()
    }

    #[test]
    fn test_search_defaults() {
        let criteria = parser().search_songs(&params(&[])).unwrap();

        assert_eq!(criteria.year, None);
        assert_eq!(criteria.keyword, None);
        assert!(!criteria.include_play_data);
        assert_eq!(criteria.page, PageRequest::new(1, 10));
        assert!(criteria.sort.fields.is_empty());
        assert_eq!(criteria.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_search_parses_everything() {
        let criteria = parser()
            .search_songs(&params(&[
                ("year", "2014"),
                ("keyword", "  shake "),
                ("includePlayData", "TRUE"),
                ("page", "3"),
                ("limit", "50"),
                ("orderBy", "year, songName"),
                ("orderDirection", "desc"),
            ]))
            .unwrap();

        assert_eq!(criteria.year, Some(2014));
        assert_eq!(criteria.keyword.as_deref(), Some("shake"));
        assert!(criteria.include_play_data);
        assert_eq!(criteria.page, PageRequest::new(3, 50));
        assert_eq!(
            criteria.sort.fields,
            vec![SongSortField::Year, SongSortField::SongName]
        );
        assert_eq!(criteria.sort.field_names(), vec!["year", "songName"]);
        assert_eq!(criteria.sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_empty_year_and_keyword_are_omitted() {
        let criteria = parser()
            .search_songs(&params(&[("year", ""), ("keyword", "")]))
            .unwrap();
        assert_eq!(criteria.year, None);
        assert_eq!(criteria.keyword, None);
    }

    #[test]
    fn test_errors_collected_in_parameter_order() {
        let errors = parser()
            .search_songs(&params(&[
                ("orderDirection", "sideways"),
                ("orderBy", "songName,rating"),
                ("limit", "0"),
                ("page", "-1"),
                ("includePlayData", "yes"),
                ("keyword", "   "),
                ("year", "99"),
            ]))
            .unwrap_err();

        assert_eq!(
            messages(errors),
            vec![
                ("year".into(), "Year must be a 4-digit number or omitted".into()),
                ("keyword".into(), "Keyword cannot be an empty string".into()),
                (
                    "includePlayData".into(),
                    "includePlayData must be \"true\" or \"false\"".into()
                ),
                ("page".into(), "Page must be greater than 0".into()),
                ("limit".into(), "Limit must be greater than 0".into()),
                (
                    "orderBy".into(),
                    "Invalid orderBy value. Use songName, albumName, year, totalPlays".into()
                ),
                (
                    "orderDirection".into(),
                    "Invalid orderDirection value. Use \"asc\" or \"desc\"".into()
                ),
            ]
        );
    }

    #[test]
    fn test_limit_upper_bound() {
        let errors = parser()
            .search_songs(&params(&[("limit", "51")]))
            .unwrap_err();
        assert_eq!(
            messages(errors),
            vec![("limit".into(), "Limit must be less than or equal to 50".into())]
        );
    }

    #[test]
    fn test_non_numeric_values() {
        let errors = parser()
            .search_albums(&params(&[("page", "abc"), ("limit", "many")]))
            .unwrap_err();
        assert_eq!(
            messages(errors),
            vec![
                ("page".into(), "Page must be greater than 0".into()),
                ("limit".into(), "Limit must be greater than 0".into()),
                ("limit".into(), "Limit must be less than or equal to 50".into()),
            ]
        );
    }

    #[test]
    fn test_integers_with_trailing_text_are_rejected() {
        let errors = parser()
            .search_songs(&params(&[("page", "1.5"), ("limit", "10abc")]))
            .unwrap_err();
        assert_eq!(
            messages(errors),
            vec![
                ("page".into(), "Page must be greater than 0".into()),
                ("limit".into(), "Limit must be greater than 0".into()),
                ("limit".into(), "Limit must be less than or equal to 50".into()),
            ]
        );
    }

    #[test]
    fn test_album_sort_fields() {
        let criteria = parser()
            .search_albums(&params(&[("orderBy", "albumName"), ("includeSongData", "true")]))
            .unwrap();
        assert_eq!(criteria.sort.fields, vec![AlbumSortField::AlbumName]);
        assert!(criteria.include_song_data);

        let errors = parser()
            .album_recommendations(&params(&[("orderBy", "songName")]))
            .unwrap_err();
        assert_eq!(
            messages(errors),
            vec![("orderBy".into(), "Invalid orderBy value. Use albumName".into())]
        );
    }

    #[test]
    fn test_lookup_flags() {
        assert!(parser()
            .song_by_id(&params(&[("includePlayData", "True")]))
            .unwrap()
            .include_play_data);
        assert!(!parser()
            .album_by_id(&params(&[("includeSongData", "false")]))
            .unwrap()
            .include_song_data);
        assert!(parser()
            .album_by_id(&params(&[("includeSongData", "1")]))
            .is_err());
    }

    #[test]
    fn test_recommendation_defaults() {
        let criteria = parser().song_recommendations(&params(&[])).unwrap();
        assert_eq!(criteria.limit, 10);
        assert!(!criteria.include_play_data);
        assert!(criteria.sort.fields.is_empty());
    }

    #[test]
    fn test_top_songs_default_to_current_month() {
        let criteria = parser().top_songs(&params(&[])).unwrap();
        assert_eq!(criteria.month_years, vec![MonthYear::new(3, 2024)]);
        assert_eq!(criteria.limit, 10);
    }

    #[test]
    fn test_top_songs_parses_month_list() {
        let criteria = parser()
            .top_songs(&params(&[("monthYears", "2024-01,2023-12"), ("limit", "5")]))
            .unwrap();
        assert_eq!(
            criteria.month_years,
            vec![MonthYear::new(1, 2024), MonthYear::new(12, 2023)]
        );
        assert_eq!(criteria.limit, 5);
    }

    #[test]
    fn test_top_songs_rejects_bad_input() {
        for bad in ["2024-13", "2024-1", "24-01", "2024-01,", "2024/01", ""] {
            let errors = parser()
                .top_songs(&params(&[("monthYears", bad)]))
                .unwrap_err();
            assert_eq!(
                messages(errors),
                vec![(
                    "monthYears".into(),
                    "Invalid date format, expected YYYY-MM,YYYY-MM,...".into()
                )],
                "{} should be rejected",
                bad
            );
        }

        let errors = parser()
            .top_songs(&params(&[("limit", "60")]))
            .unwrap_err();
        assert_eq!(
            messages(errors),
            vec![("limit".into(), "Song limit must be less than or equal to 50".into())]
        );
    }
}
