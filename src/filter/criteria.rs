use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::date_key;
use crate::error::{ClientError, ClientResult};

/// Value that means "no constraint" for a categorical field.
pub const ALL: &str = "all";

/// User-selected filter values for a list view. All active criteria are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Categorical field name -> required value (exact, case-sensitive).
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    /// Case-insensitive substring searched in the record's text field.
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date and search criteria from user input. Bounds that are not a real
    /// `YYYY-MM-DD` day are rejected here instead of silently matching nothing.
    pub fn from_bounds(
        from: Option<String>,
        to: Option<String>,
        search: Option<String>,
    ) -> ClientResult<Self> {
        let mut c = Self::new();
        if let Some(from) = from {
            check_day_bound("--from", &from)?;
            c = c.with_date_from(from);
        }
        if let Some(to) = to {
            check_day_bound("--to", &to)?;
            c = c.with_date_to(to);
        }
        if let Some(search) = search {
            c = c.with_search(search);
        }
        Ok(c)
    }

    pub fn with_category(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.categories.insert(field.into(), value.into());
        self
    }

    /// Sets a categorical criterion from an optional CLI value.
    pub fn with_optional_category(self, field: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.with_category(field, v),
            None => self,
        }
    }

    pub fn with_date_from(mut self, from: impl Into<String>) -> Self {
        self.date_from = Some(from.into());
        self
    }

    pub fn with_date_to(mut self, to: impl Into<String>) -> Self {
        self.date_to = Some(to.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Categorical criteria that are not the sentinel.
    pub fn active_categories(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.categories
            .iter()
            .filter(|(_, v)| !is_sentinel(v))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn active_date_from(&self) -> Option<&str> {
        non_empty(self.date_from.as_deref())
    }

    pub fn active_date_to(&self) -> Option<&str> {
        non_empty(self.date_to.as_deref())
    }

    /// Lower-cased search needle, if any.
    pub fn active_search(&self) -> Option<String> {
        non_empty(self.search.as_deref()).map(str::to_lowercase)
    }

    /// True when no criterion constrains anything.
    pub fn is_empty(&self) -> bool {
        self.active_categories().next().is_none()
            && self.active_date_from().is_none()
            && self.active_date_to().is_none()
            && self.active_search().is_none()
    }
}

/// `"all"` and the empty string both disable a categorical criterion.
pub fn is_sentinel(value: &str) -> bool {
    value.is_empty() || value == ALL
}

/// Accepts an empty bound (inactive) or exactly one calendar day.
pub fn check_day_bound(field: &str, value: &str) -> ClientResult<()> {
    if value.is_empty() || (value.len() == 10 && date_key(value).is_some()) {
        return Ok(());
    }
    Err(ClientError::validation(
        field,
        format!("expects YYYY-MM-DD, got \"{value}\""),
    ))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_values_are_inactive() {
        let c = FilterCriteria::new()
            .with_category("status", "all")
            .with_category("level", "")
            .with_date_from("")
            .with_search("");
        assert!(c.is_empty());
    }

    #[test]
    fn sentinel_is_case_sensitive() {
        // "ALL" is a real code, not the sentinel
        let c = FilterCriteria::new().with_category("status", "ALL");
        assert!(!c.is_empty());
        assert_eq!(c.active_categories().collect::<Vec<_>>(), vec![("status", "ALL")]);
    }

    #[test]
    fn search_is_lowercased() {
        let c = FilterCriteria::new().with_search("AnA");
        assert_eq!(c.active_search().as_deref(), Some("ana"));
    }

    #[test]
    fn day_bounds() {
        assert!(check_day_bound("--from", "").is_ok());
        assert!(check_day_bound("--from", "2024-06-01").is_ok());
        for bad in ["2024-6-1", "2024-02-30", "June", "2024-06-01T10:00:00"] {
            let err = check_day_bound("--to", bad).unwrap_err();
            assert!(matches!(err, ClientError::Validation { ref field, .. } if field == "--to"), "{bad}");
        }
    }

    #[test]
    fn from_bounds_keeps_valid_input() {
        let c = FilterCriteria::from_bounds(Some("2024-06-01".into()), Some("".into()), Some("Ana".into()))
            .unwrap();
        assert_eq!(c.active_date_from(), Some("2024-06-01"));
        assert_eq!(c.active_date_to(), None);
        assert_eq!(c.active_search().as_deref(), Some("ana"));

        let err = FilterCriteria::from_bounds(None, Some("2024-13-01".into()), None).unwrap_err();
        assert_eq!(err.to_string(), "--to: expects YYYY-MM-DD, got \"2024-13-01\"");
    }
}
