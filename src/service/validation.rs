//! Request validation: movie field rules and list query parsing.

use crate::error::{AppError, FieldErrors};
use crate::model::{ListFilters, Movie, SORT_SAFELIST};
use chrono::Datelike;
use std::collections::{HashMap, HashSet};

/// Earliest accepted release year.
pub const MIN_YEAR: i32 = 1888;
pub const MAX_TITLE_BYTES: usize = 500;
pub const MAX_GENRES: usize = 5;
pub const MAX_PAGE: u32 = 10_000_000;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Collects the first failure message per field.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, key: &str, message: &str) {
        self.errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` for `key` unless `ok`.
    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

pub fn validate_movie(movie: &Movie) -> Result<(), AppError> {
    let mut v = Validator::new();
    check_movie(&mut v, movie, chrono::Utc::now().year());
    v.finish()
}

fn check_movie(v: &mut Validator, movie: &Movie, current_year: i32) {
    v.check(!movie.title.trim().is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= MIN_YEAR, "year", "must be 1888 or later");
    v.check(movie.year <= current_year, "year", "must not be in the future");

    v.check(movie.runtime != 0, "runtime", "must be provided");
    v.check(movie.runtime > 0, "runtime", "must be a positive integer");

    v.check(!movie.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        movie.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        movie.genres.iter().all(|g| !g.trim().is_empty()),
        "genres",
        "must not contain empty values",
    );
    let unique: HashSet<&str> = movie.genres.iter().map(String::as_str).collect();
    v.check(
        unique.len() == movie.genres.len(),
        "genres",
        "must not contain duplicate values",
    );
}

/// Parse `title`, `genres`, `page`, `page_size`, `sort` from the query string.
pub fn parse_list_filters(params: &HashMap<String, String>) -> Result<ListFilters, AppError> {
    let mut v = Validator::new();
    let defaults = ListFilters::default();

    let title = params.get("title").cloned().unwrap_or_default();
    let genres = params
        .get("genres")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    let page = read_int(&mut v, params, "page", defaults.page);
    let page_size = read_int(&mut v, params, "page_size", defaults.page_size);
    let sort = params.get("sort").cloned().unwrap_or(defaults.sort);

    v.check(page > 0, "page", "must be greater than zero");
    v.check(page <= MAX_PAGE, "page", "must be a maximum of 10 million");
    v.check(page_size > 0, "page_size", "must be greater than zero");
    v.check(page_size <= MAX_PAGE_SIZE, "page_size", "must be a maximum of 100");
    v.check(
        SORT_SAFELIST.contains(&sort.as_str()),
        "sort",
        "invalid sort value",
    );
    v.finish()?;

    Ok(ListFilters {
        title,
        genres,
        page,
        page_size,
        sort,
    })
}

fn read_int(v: &mut Validator, params: &HashMap<String, String>, key: &str, default: u32) -> u32 {
    match params.get(key) {
        None => default,
        Some(s) if s.is_empty() => default,
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n < 0 => 0,
            Ok(n) => u32::try_from(n).unwrap_or(u32::MAX),
            Err(_) => {
                v.add_error(key, "must be an integer value");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovieInput;

    fn movie(title: &str, year: i32, runtime: i32, genres: &[&str]) -> Movie {
        Movie::draft(MovieInput {
            title: title.into(),
            year,
            runtime,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        })
    }

    fn errors(m: &Movie, current_year: i32) -> FieldErrors {
        let mut v = Validator::new();
        check_movie(&mut v, m, current_year);
        v.errors
    }

    #[test]
    fn accepts_valid_movie() {
        let m = movie("Moana", 2016, 107, &["animation", "adventure"]);
        assert!(errors(&m, 2026).is_empty());
        assert!(validate_movie(&m).is_ok());
    }

    #[test]
    fn rejects_empty_title() {
        let e = errors(&movie("  ", 2016, 107, &["drama"]), 2026);
        assert_eq!(e["title"], "must be provided");
    }

    #[test]
    fn rejects_long_title() {
        let long = "x".repeat(501);
        let e = errors(&movie(&long, 2016, 107, &["drama"]), 2026);
        assert_eq!(e["title"], "must not be more than 500 bytes long");
    }

    #[test]
    fn rejects_future_and_ancient_years() {
        let e = errors(&movie("Later", 2027, 107, &["drama"]), 2026);
        assert_eq!(e["year"], "must not be in the future");
        let e = errors(&movie("Earlier", 1887, 107, &["drama"]), 2026);
        assert_eq!(e["year"], "must be 1888 or later");
        assert!(errors(&movie("Roundhay", 1888, 1, &["short"]), 2026).is_empty());
    }

    #[test]
    fn rejects_non_positive_runtime() {
        let e = errors(&movie("Moana", 2016, 0, &["drama"]), 2026);
        assert_eq!(e["runtime"], "must be provided");
        let e = errors(&movie("Moana", 2016, -5, &["drama"]), 2026);
        assert_eq!(e["runtime"], "must be a positive integer");
    }

    #[test]
    fn rejects_bad_genre_lists() {
        let e = errors(&movie("Moana", 2016, 107, &[]), 2026);
        assert_eq!(e["genres"], "must contain at least 1 genre");
        let e = errors(&movie("Moana", 2016, 107, &["a", "b", "c", "d", "e", "f"]), 2026);
        assert_eq!(e["genres"], "must not contain more than 5 genres");
        let e = errors(&movie("Moana", 2016, 107, &["drama", "drama"]), 2026);
        assert_eq!(e["genres"], "must not contain duplicate values");
        let e = errors(&movie("Moana", 2016, 107, &["drama", ""]), 2026);
        assert_eq!(e["genres"], "must not contain empty values");
    }

    #[test]
    fn missing_fields_report_every_field() {
        let e = errors(&Movie::draft(MovieInput::default()), 2026);
        assert_eq!(e.len(), 4);
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn list_filters_defaults() {
        let f = parse_list_filters(&params(&[])).unwrap();
        assert_eq!(f, ListFilters::default());
    }

    #[test]
    fn list_filters_split_genres() {
        let f = parse_list_filters(&params(&[("genres", "crime, drama,"), ("sort", "-year")])).unwrap();
        assert_eq!(f.genres, vec!["crime".to_string(), "drama".to_string()]);
        assert_eq!(f.sort, "-year");
    }

    #[test]
    fn list_filters_reject_bad_paging_and_sort() {
        match parse_list_filters(&params(&[("page", "abc"), ("page_size", "500"), ("sort", "rating")])) {
            Err(AppError::Validation(e)) => {
                assert_eq!(e["page"], "must be an integer value");
                assert_eq!(e["page_size"], "must be a maximum of 100");
                assert_eq!(e["sort"], "invalid sort value");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
