//! Paging and sorting parameters for the list endpoint.

use mathhelper_common::config::ListConfig;

/// Page size sent when the whole collection is requested.
pub const UNBOUNDED_PAGE_SIZE: u32 = i32::MAX as u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub sort_by: String,
    /// `None` asks for everything in a single page.
    pub page_size: Option<u32>,
    pub descending: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            sort_by: "id".to_string(),
            page_size: None,
            descending: false,
        }
    }
}

impl ListQuery {
    pub fn from_config(config: &ListConfig) -> Self {
        Self {
            page: 0,
            sort_by: config.sort_by.clone(),
            page_size: config.page_size,
            descending: config.descending,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = field.into();
        self
    }

    pub fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    /// Query-string pairs in the order the API documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("sortBy", self.sort_by.clone()),
            (
                "pageSize",
                self.page_size.unwrap_or(UNBOUNDED_PAGE_SIZE).to_string(),
            ),
        ];
        if self.descending {
            params.push(("desc", "true".to_string()));
        }
        params
    }
}
