//! Remote data containers.
//!
//! A [`RemoteSlice`] holds the last value fetched for one backend resource
//! together with a loading flag and the last error message. Every operation
//! starts with [`RemoteSlice::begin`], which hands out a [`RequestToken`];
//! settling with a token older than the latest one is ignored, so a slow
//! response can never overwrite data from a newer request.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Lifecycle of a slice: `Idle -> Loading -> {Success, Failed}`, and back to
/// `Loading` on the next fetch or mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Generation number handed out by [`RemoteSlice::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Serialize)]
pub struct RemoteSlice<T> {
    name: &'static str,
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    status: SliceStatus,
    #[serde(skip)]
    generation: u64,
}

impl<T> RemoteSlice<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            data: None,
            loading: false,
            error: None,
            status: SliceStatus::Idle,
            generation: 0,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> SliceStatus {
        self.status
    }

    /// Enter `Loading`, clear the error and invalidate earlier tokens.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.status = SliceStatus::Loading;
        debug!(slice = self.name, generation = self.generation, "request started");
        RequestToken(self.generation)
    }

    fn is_current(&self, token: RequestToken) -> bool {
        if token.0 != self.generation {
            warn!(
                slice = self.name,
                stale = token.0,
                current = self.generation,
                "dropping stale response"
            );
            return false;
        }
        true
    }

    /// Store a successful payload. Returns false when the token was stale.
    pub fn succeed(&mut self, token: RequestToken, payload: T) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.data = Some(payload);
        self.loading = false;
        self.error = None;
        self.status = SliceStatus::Success;
        true
    }

    /// Record a failure, keeping whatever data was already there.
    pub fn fail(&mut self, token: RequestToken, message: impl Into<String>) -> bool {
        if !self.is_current(token) {
            return false;
        }
        let message = message.into();
        warn!(slice = self.name, error = %message, "request failed");
        self.error = Some(message);
        self.loading = false;
        self.status = SliceStatus::Failed;
        true
    }

    /// Settle with the outcome of a request.
    pub fn settle(&mut self, token: RequestToken, outcome: ClientResult<T>) -> bool {
        match outcome {
            Ok(payload) => self.succeed(token, payload),
            Err(e) => self.fail(token, e.user_message()),
        }
    }

    /// Run `load` and store its result. Prior data survives a failure.
    pub fn fetch<F>(&mut self, load: F) -> Result<&T, &str>
    where
        F: FnOnce() -> ClientResult<T>,
    {
        let token = self.begin();
        let outcome = load();
        self.settle(token, outcome);
        self.view()
    }

    /// Compute a replacement from the current data and store it on success.
    /// The new value is built in full before anything is assigned.
    pub fn mutate<F>(&mut self, apply: F) -> Result<&T, &str>
    where
        F: FnOnce(Option<&T>) -> ClientResult<T>,
    {
        let token = self.begin();
        let outcome = apply(self.data.as_ref());
        self.settle(token, outcome);
        self.view()
    }

    fn view(&self) -> Result<&T, &str> {
        match (&self.error, &self.data) {
            (Some(e), _) => Err(e.as_str()),
            (None, Some(d)) => Ok(d),
            (None, None) => Err(crate::error::GENERIC_FAILURE),
        }
    }

    /// Drop everything (logout, navigation away).
    pub fn reset(&mut self) {
        self.generation += 1;
        self.data = None;
        self.loading = false;
        self.error = None;
        self.status = SliceStatus::Idle;
    }
}

/// Convenience for mutations that need the current data to exist.
pub fn require<'a, T>(current: Option<&'a T>, what: &str) -> ClientResult<&'a T> {
    current.ok_or_else(|| ClientError::validation(what, "not loaded yet; fetch it first"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> ClientResult<Vec<u32>> {
        Err(ClientError::Http {
            status: 503,
            message: Some("Service unavailable".to_string()),
        })
    }

    #[test]
    fn starts_idle() {
        let s: RemoteSlice<u32> = RemoteSlice::new("x");
        assert_eq!(s.status(), SliceStatus::Idle);
        assert!(s.data().is_none());
        assert!(!s.is_loading());
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut s: RemoteSlice<Vec<u32>> = RemoteSlice::new("x");
        let _ = s.fetch(fails);
        assert!(s.error().is_some());
        s.begin();
        assert!(s.is_loading());
        assert!(s.error().is_none());
        assert_eq!(s.status(), SliceStatus::Loading);
    }

    #[test]
    fn failed_fetch_keeps_prior_data() {
        let mut s = RemoteSlice::new("sessions");
        assert_eq!(s.fetch(|| Ok(vec![1, 2])), Ok(&vec![1, 2]));

        assert_eq!(s.fetch(fails), Err("Service unavailable"));
        assert_eq!(s.data(), Some(&vec![1, 2]));
        assert_eq!(s.status(), SliceStatus::Failed);
        assert!(!s.is_loading());

        assert!(s.fetch(|| Ok(vec![3])).is_ok());
        assert_eq!(s.data(), Some(&vec![3]));
        assert!(s.error().is_none());
        assert_eq!(s.status(), SliceStatus::Success);
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut s = RemoteSlice::new("dashboard");
        let first = s.begin();
        let second = s.begin();
        assert!(s.succeed(second, "new"));
        assert!(!s.succeed(first, "old"));
        assert!(!s.fail(first, "late error"));
        assert_eq!(s.data(), Some(&"new"));
        assert!(s.error().is_none());
    }

    #[test]
    fn failed_mutation_leaves_data() {
        let mut s = RemoteSlice::new("membership");
        let _ = s.fetch(|| Ok(vec![1u32]));
        let res = s.mutate(|cur| {
            let mut next = require(cur, "membership")?.clone();
            next.push(2);
            if next.len() > 1 {
                return Err(ClientError::Network("connection reset".into()));
            }
            Ok(next)
        });
        assert!(res.is_err());
        assert_eq!(s.data(), Some(&vec![1]));

        assert!(s
            .mutate(|cur| {
                let mut next = require(cur, "membership")?.clone();
                next.push(2);
                Ok(next)
            })
            .is_ok());
        assert_eq!(s.data(), Some(&vec![1, 2]));
    }

    #[test]
    fn mutate_requires_data() {
        let mut s: RemoteSlice<Vec<u32>> = RemoteSlice::new("membership");
        let res = s.mutate(|cur| require(cur, "membership").cloned());
        assert!(res.is_err());
        assert!(s.error().unwrap().contains("not loaded"));
    }

    #[test]
    fn reset_invalidates_in_flight() {
        let mut s = RemoteSlice::new("x");
        let token = s.begin();
        s.reset();
        assert!(!s.succeed(token, 1));
        assert_eq!(s.status(), SliceStatus::Idle);
    }
}
