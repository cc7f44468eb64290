use crate::models::{CoachMembership, CoachingSession, Court, Dashboard, PartnerMembership, Student};
use crate::slice::RemoteSlice;

/// All state for one authenticated session. Passed explicitly to whatever
/// needs it; dropped or reset on logout.
#[derive(Debug, Clone)]
pub struct Store {
    pub coach_membership: RemoteSlice<CoachMembership>,
    pub partner_membership: RemoteSlice<PartnerMembership>,
    pub dashboard: RemoteSlice<Dashboard>,
    pub sessions: RemoteSlice<Vec<CoachingSession>>,
    pub students: RemoteSlice<Vec<Student>>,
    pub courts: RemoteSlice<Vec<Court>>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            coach_membership: RemoteSlice::new("coach_membership"),
            partner_membership: RemoteSlice::new("partner_membership"),
            dashboard: RemoteSlice::new("dashboard"),
            sessions: RemoteSlice::new("sessions"),
            students: RemoteSlice::new("students"),
            courts: RemoteSlice::new("courts"),
        }
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.coach_membership.reset();
        self.partner_membership.reset();
        self.dashboard.reset();
        self.sessions.reset();
        self.students.reset();
        self.courts.reset();
    }

    /// Sessions as last fetched, or an empty list before the first fetch.
    pub fn session_list(&self) -> &[CoachingSession] {
        self.sessions.data().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::SliceStatus;

    #[test]
    fn reset_discards_everything() {
        let mut store = Store::new();
        let _ = store.sessions.fetch(|| Ok(Vec::new()));
        let _ = store.courts.fetch(|| Ok(Vec::new()));
        store.reset();
        assert!(store.sessions.data().is_none());
        assert_eq!(store.courts.status(), SliceStatus::Idle);
        assert!(store.session_list().is_empty());
    }
}
