use serde::Serialize;

/// Sort keys a client may request. A leading `-` sorts descending.
pub const SORT_SAFELIST: &[&str] = &["id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime"];

/// Title/genre filters plus paging for `GET /v1/movies`. Built by `service::parse_list_filters`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFilters {
    pub title: String,
    pub genres: Vec<String>,
    pub page: u32,
    pub page_size: u32,
    pub sort: String,
}

impl Default for ListFilters {
    fn default() -> Self {
        ListFilters {
            title: String::new(),
            genres: Vec::new(),
            page: 1,
            page_size: 20,
            sort: "id".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
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

impl ListFilters {
    /// Column for ORDER BY. Only values from `SORT_SAFELIST` reach SQL; anything else falls back to `id`.
    pub fn sort_column(&self) -> &'static str {
        match self.sort.trim_start_matches('-') {
            "title" => "title",
            "year" => "year",
            "runtime" => "runtime",
            _ => "id",
        }
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }
}

/// Paging metadata returned alongside a list. All zero when nothing matched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub current_page: u32,
    pub page_size: u32,
    pub first_page: u32,
    pub last_page: u32,
    pub total_records: u64,
}

impl Metadata {
    pub fn calculate(total_records: u64, page: u32, page_size: u32) -> Self {
        if total_records == 0 || page_size == 0 {
            return Metadata::default();
        }
        let last_page = total_records.div_ceil(u64::from(page_size));
        Metadata {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            total_records,
        }
    }
}
