use chrono::NaiveDate;
use serde::Serialize;

use crate::filter::date_key;
use crate::models::{CoachingSession, Court, Student};

pub fn count<R>(records: &[R]) -> usize {
    records.len()
}

pub fn count_where<R>(records: &[R], pred: impl Fn(&R) -> bool) -> usize {
    records.iter().filter(|r| pred(r)).count()
}

/// Sum of a numeric field; missing values count as zero.
pub fn sum<R>(records: &[R], value: impl Fn(&R) -> Option<f64>) -> f64 {
    records.iter().filter_map(|r| value(r)).sum()
}

/// Mean over the records that have a value. Zero when none do.
pub fn average<R>(records: &[R], value: impl Fn(&R) -> Option<f64>) -> f64 {
    let (total, n) = records
        .iter()
        .filter_map(|r| value(r))
        .fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    if n == 0 {
        0.0
    } else {
        total / n as f64
    }
}

/// A student is active when at least one of their sessions falls on or after
/// `today`. `sessions` must be the full session list, not a filtered view.
pub fn is_active(student: &Student, sessions: &[CoachingSession], today: NaiveDate) -> bool {
    let today = today.format("%Y-%m-%d").to_string();
    sessions.iter().any(|s| {
        s.student_id.as_deref() == Some(student.id.as_str())
            && s.status.as_deref() != Some("cancelled")
            && s.date
                .as_deref()
                .and_then(date_key)
                .is_some_and(|d| d >= today.as_str())
    })
}

fn status_is(want: &'static str) -> impl Fn(&CoachingSession) -> bool {
    move |s| s.status.as_deref() == Some(want)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Price summed over completed sessions.
    pub revenue: f64,
    pub average_rating: f64,
}

impl SessionStats {
    pub fn compute(sessions: &[CoachingSession]) -> Self {
        let completed_price = |s: &CoachingSession| {
            if s.status.as_deref() == Some("completed") {
                s.price
            } else {
                None
            }
        };
        SessionStats {
            total: count(sessions),
            scheduled: count_where(sessions, status_is("scheduled")),
            completed: count_where(sessions, status_is("completed")),
            cancelled: count_where(sessions, status_is("cancelled")),
            revenue: sum(sessions, completed_price),
            average_rating: average(sessions, |s| s.rating),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudentStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub average_rating: f64,
}

impl StudentStats {
    pub fn compute(students: &[Student], all_sessions: &[CoachingSession], today: NaiveDate) -> Self {
        let total = count(students);
        let active = count_where(students, |s| is_active(s, all_sessions, today));
        StudentStats {
            total,
            active,
            inactive: total - active,
            average_rating: average(students, |s| s.rating),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourtStats {
    pub total: usize,
    pub available: usize,
    pub average_hourly_rate: f64,
}

impl CourtStats {
    pub fn compute(courts: &[Court]) -> Self {
        CourtStats {
            total: count(courts),
            available: count_where(courts, |c| c.status.as_deref() == Some("available")),
            average_hourly_rate: average(courts, |c| c.hourly_rate),
        }
    }
}
