//! Immutable query expressions: search terms plus pagination directives.

use std::{convert::Infallible, fmt, str::FromStr};

/// `rows=-1` asks the backend for the complete result set.
pub const UNLIMITED_ROWS: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Ascending => "sort",
            SortOrder::Descending => "sort-reverse",
        }
    }
}

/// A filter combines free search terms with pagination (`first`, `rows`) and
/// an optional sort directive. Values are immutable; all modifiers return a
/// new filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    terms: Vec<String>,
    first: Option<u64>,
    rows: Option<i64>,
    sort_field: Option<String>,
    sort_order: SortOrder,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sentinel "fetch everything" filter: no terms, pagination wide open.
    pub fn unrestricted() -> Self {
        Filter::new().with_first(1).with_rows(UNLIMITED_ROWS)
    }

    /// Parse a filter string. Unrecognized tokens are kept verbatim as search
    /// terms, so parsing never fails.
    pub fn parse(input: &str) -> Self {
        let mut filter = Filter::new();
        for token in input.split_whitespace() {
            match token.split_once('=') {
                Some(("first", v)) => filter.first = v.parse().ok(),
                Some(("rows", v)) => filter.rows = v.parse().ok(),
                Some(("sort", v)) => {
                    filter.sort_field = Some(v.to_owned());
                    filter.sort_order = SortOrder::Ascending;
                }
                Some(("sort-reverse", v)) => {
                    filter.sort_field = Some(v.to_owned());
                    filter.sort_order = SortOrder::Descending;
                }
                _ => filter.terms.push(token.to_owned()),
            }
        }
        filter
    }

    /// Derive the unrestricted variant: same terms and sort, pagination forced
    /// open so the backend returns the complete matching set.
    pub fn to_unrestricted(&self) -> Self {
        let mut filter = self.clone();
        filter.first = Some(1);
        filter.rows = Some(UNLIMITED_ROWS);
        filter
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.terms.push(term.into());
        self
    }

    pub fn with_first(mut self, first: u64) -> Self {
        self.first = Some(first);
        self
    }

    pub fn with_rows(mut self, rows: i64) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = order;
        self
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn first(&self) -> Option<u64> {
        self.first
    }

    pub fn rows(&self) -> Option<i64> {
        self.rows
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn is_unrestricted(&self) -> bool {
        self.rows == Some(UNLIMITED_ROWS)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.terms.clone();
        if let Some(first) = self.first {
            parts.push(format!("first={first}"));
        }
        if let Some(rows) = self.rows {
            parts.push(format!("rows={rows}"));
        }
        if let Some(field) = &self.sort_field {
            parts.push(format!("{}={field}", self.sort_order.keyword()));
        }
        write!(f, "{}", parts.join(" "))
    }
}

impl FromStr for Filter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Filter::parse(s))
    }
}
