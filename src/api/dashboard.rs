use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{Court, Dashboard, ListEnvelope};

impl ApiClient {
    /// Role-specific dashboard for the authenticated user.
    pub fn dashboard(&self) -> ClientResult<Dashboard> {
        self.get_json("/api/auth/dashboard")
    }

    pub fn courts(&self) -> ClientResult<Vec<Court>> {
        self.get_json::<ListEnvelope<Court>>("/api/courts")
            .map(ListEnvelope::into_vec)
    }
}
