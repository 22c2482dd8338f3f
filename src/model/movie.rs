use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `movies` table. `id`, `created_at` and `version` are owned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    /// Minutes.
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: i32,
}

/// Create request body. Absent fields decode to zero values so validation reports them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovieInput {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
}

/// PATCH request body. `version`, when present, is the version the client last saw.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub genres: Option<Vec<String>>,
    pub version: Option<i32>,
}

impl Movie {
    /// Unsaved movie built from a create body; the store fills id, created_at and version.
    pub fn draft(input: MovieInput) -> Self {
        Movie {
            id: 0,
            created_at: DateTime::<Utc>::default(),
            title: input.title,
            year: input.year,
            runtime: input.runtime,
            genres: input.genres,
            version: 0,
        }
    }

    /// Overwrite the fields present in `patch`. The version is left alone.
    pub fn apply(&mut self, patch: MovieUpdate) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(runtime) = patch.runtime {
            self.runtime = runtime;
        }
        if let Some(genres) = patch.genres {
            self.genres = genres;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case() {
        let movie = Movie {
            id: 7,
            created_at: DateTime::<Utc>::default(),
            title: "Moana".into(),
            year: 2016,
            runtime: 107,
            genres: vec!["animation".into()],
            version: 1,
        };
        let v = serde_json::to_value(&movie).unwrap();
        assert!(v["createdAt"].as_str().unwrap().starts_with("1970-01-01T00:00:00"));
        assert_eq!(v["runtime"], json!(107));
        assert!(v.get("created_at").is_none());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut movie = Movie::draft(MovieInput {
            title: "Moana".into(),
            year: 2016,
            runtime: 107,
            genres: vec!["animation".into()],
        });
        movie.version = 3;
        movie.apply(MovieUpdate {
            runtime: Some(108),
            version: Some(1),
            ..Default::default()
        });
        assert_eq!(movie.runtime, 108);
        assert_eq!(movie.title, "Moana");
        assert_eq!(movie.version, 3);
    }

    #[test]
    fn input_rejects_unknown_fields() {
        let err = serde_json::from_value::<MovieInput>(json!({"title": "x", "id": 3})).unwrap_err();
        assert!(err.to_string().contains("unknown field `id`"));
    }
}
