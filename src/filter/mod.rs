pub mod criteria;

use chrono::NaiveDate;

pub use criteria::FilterCriteria;

/// A list record that can be matched against [`FilterCriteria`].
pub trait Filterable {
    /// String form of a categorical field, `None` when absent or unknown.
    fn field(&self, name: &str) -> Option<String>;

    /// ISO-8601 date (or datetime) the date range applies to.
    fn date(&self) -> Option<&str>;

    /// Free text the search criterion is matched against.
    fn search_text(&self) -> Option<&str>;
}

/// Decide whether a single record satisfies every active criterion.
pub fn matches<R: Filterable + ?Sized>(record: &R, criteria: &FilterCriteria) -> bool {
    for (name, wanted) in criteria.active_categories() {
        match record.field(name) {
            Some(value) if value == wanted => {}
            _ => return false,
        }
    }

    let from = criteria.active_date_from();
    let to = criteria.active_date_to();
    if from.is_some() || to.is_some() {
        let Some(day) = record.date().and_then(date_key) else {
            return false;
        };
        if let Some(from) = from {
            if day < from {
                return false;
            }
        }
        if let Some(to) = to {
            if day > to {
                return false;
            }
        }
    }

    if let Some(needle) = criteria.active_search() {
        match record.search_text() {
            Some(text) if text.to_lowercase().contains(&needle) => {}
            _ => return false,
        }
    }

    true
}

/// Return the matching records in their original order. The input is not touched.
pub fn apply<R: Filterable + Clone>(records: &[R], criteria: &FilterCriteria) -> Vec<R> {
    if criteria.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| matches(*r, criteria))
        .cloned()
        .collect()
}

/// The `YYYY-MM-DD` prefix of a date or datetime, if it is a real calendar day.
/// Lexicographic order on this key equals chronological order.
pub fn date_key(raw: &str) -> Option<&str> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    Some(day)
}
