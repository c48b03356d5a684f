//! Query parameters accepted by every `list` endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOperator {
    Is,
    Contains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
}

impl SearchOperator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }
}

impl fmt::Display for SearchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{search_text, search_operator}` pair of `search_criteria`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriterion {
    pub search_text: String,
    pub search_operator: SearchOperator,
}

impl SearchCriterion {
    #[must_use]
    pub fn new(search_text: impl Into<String>, search_operator: SearchOperator) -> Self {
        Self {
            search_text: search_text.into(),
            search_operator,
        }
    }
}

/// Filters for `list` calls. Absent values are left out of the query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilters {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort_column: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub search_text: Option<String>,
    pub filter_by: Option<String>,
    #[serde(default)]
    pub search_criteria: Vec<SearchCriterion>,
}

impl ListFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_column = Some(column.into());
        self.sort_order = Some(order);
        self
    }

    #[must_use]
    pub fn search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn filter_by(mut self, filter: impl Into<String>) -> Self {
        self.filter_by = Some(filter.into());
        self
    }

    #[must_use]
    pub fn criterion(mut self, text: impl Into<String>, operator: SearchOperator) -> Self {
        self.search_criteria.push(SearchCriterion::new(text, operator));
        self
    }

    /// Serialize into query pairs.
    ///
    /// Order is fixed: page, per_page, sort_column, sort_order, search_text,
    /// filter_by, then each criterion as `search_criteria[i][search_text]` and
    /// `search_criteria[i][search_operator]`. Empty strings count as absent.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                pairs.push((key.to_string(), value));
            }
        };

        push("page", self.page.map(|p| p.to_string()));
        push("per_page", self.per_page.map(|p| p.to_string()));
        push("sort_column", self.sort_column.clone());
        push("sort_order", self.sort_order.map(|o| o.as_str().to_string()));
        push("search_text", self.search_text.clone());
        push("filter_by", self.filter_by.clone());

        for (index, criterion) in self.search_criteria.iter().enumerate() {
            pairs.push((
                format!("search_criteria[{index}][search_text]"),
                criterion.search_text.clone(),
            ));
            pairs.push((
                format!("search_criteria[{index}][search_operator]"),
                criterion.search_operator.as_str().to_string(),
            ));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_produce_no_query() {
        assert!(ListFilters::default().to_query_pairs().is_empty());
    }

    #[test]
    fn page_and_criteria_only() {
        let filters = ListFilters::new()
            .page(2)
            .criterion("a", SearchOperator::Contains);

        assert_eq!(
            filters.to_query_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                (
                    "search_criteria[0][search_text]".to_string(),
                    "a".to_string()
                ),
                (
                    "search_criteria[0][search_operator]".to_string(),
                    "contains".to_string()
                ),
            ]
        );
    }

    #[test]
    fn full_filter_order_is_stable() {
        let filters = ListFilters::new()
            .criterion("Acme", SearchOperator::StartsWith)
            .filter_by("Status.Active")
            .search_text("acme")
            .sort("contact_name", SortOrder::Descending)
            .per_page(50)
            .page(1)
            .criterion("", SearchOperator::IsEmpty);

        let keys: Vec<String> = filters.to_query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "page",
                "per_page",
                "sort_column",
                "sort_order",
                "search_text",
                "filter_by",
                "search_criteria[0][search_text]",
                "search_criteria[0][search_operator]",
                "search_criteria[1][search_text]",
                "search_criteria[1][search_operator]",
            ]
        );
        assert_eq!(filters.to_query_pairs()[3].1, "descending");
        assert_eq!(filters.to_query_pairs()[9].1, "is_empty");
    }

    #[test]
    fn empty_strings_are_omitted() {
        let filters = ListFilters {
            search_text: Some(String::new()),
            filter_by: Some("Status.All".to_string()),
            ..ListFilters::default()
        };
        assert_eq!(
            filters.to_query_pairs(),
            vec![("filter_by".to_string(), "Status.All".to_string())]
        );
    }
}
