use serde::Serialize;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CoachMembership, CoachingSession, ListEnvelope, Student};
use crate::slice::RemoteSlice;

const MEMBERSHIP: &str = "/api/coach/membership";

#[derive(Debug, Serialize)]
struct SubscribeBody<'a> {
    plan: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PaymentMethodBody<'a> {
    payment_method_id: &'a str,
}

impl ApiClient {
    pub fn coach_membership(&self) -> ClientResult<CoachMembership> {
        self.get_json(MEMBERSHIP)
    }

    pub fn coach_subscribe(&self, plan: &str, payment_method_id: Option<&str>) -> ClientResult<CoachMembership> {
        if plan.trim().is_empty() {
            return Err(ClientError::validation("plan", "choose a plan"));
        }
        self.post_charging(
            "/api/coach/membership/subscribe",
            &SubscribeBody {
                plan,
                payment_method_id,
            },
        )
    }

    pub fn coach_cancel(&self) -> ClientResult<CoachMembership> {
        self.post_json("/api/coach/membership/cancel", &serde_json::json!({}))
    }

    pub fn coach_renew(&self) -> ClientResult<CoachMembership> {
        self.post_charging("/api/coach/membership/renew", &serde_json::json!({}))
    }

    pub fn coach_update_payment_method(&self, payment_method_id: &str) -> ClientResult<CoachMembership> {
        if payment_method_id.trim().is_empty() {
            return Err(ClientError::validation("payment_method_id", "is required"));
        }
        self.put_json(
            "/api/coach/membership/payment-method",
            &PaymentMethodBody { payment_method_id },
        )
    }

    pub fn coach_sessions(&self) -> ClientResult<Vec<CoachingSession>> {
        self.get_json::<ListEnvelope<CoachingSession>>("/api/coach/sessions")
            .map(ListEnvelope::into_vec)
    }

    pub fn coach_students(&self) -> ClientResult<Vec<Student>> {
        self.get_json::<ListEnvelope<Student>>("/api/coach/students")
            .map(ListEnvelope::into_vec)
    }
}

/// Membership operations wired through the coach membership slice.
pub struct CoachMembershipActions<'a> {
    pub client: &'a ApiClient,
    pub slice: &'a mut RemoteSlice<CoachMembership>,
}

impl<'a> CoachMembershipActions<'a> {
    pub fn new(client: &'a ApiClient, slice: &'a mut RemoteSlice<CoachMembership>) -> Self {
        Self { client, slice }
    }

    pub fn fetch(&mut self) -> Result<&CoachMembership, &str> {
        let client = self.client;
        self.slice.fetch(|| client.coach_membership())
    }

    pub fn subscribe(&mut self, plan: &str, payment_method_id: Option<&str>) -> Result<&CoachMembership, &str> {
        let client = self.client;
        self.slice
            .mutate(|_| client.coach_subscribe(plan, payment_method_id))
    }

    pub fn cancel(&mut self) -> Result<&CoachMembership, &str> {
        let client = self.client;
        self.slice.mutate(|_| client.coach_cancel())
    }

    pub fn renew(&mut self) -> Result<&CoachMembership, &str> {
        let client = self.client;
        self.slice.mutate(|_| client.coach_renew())
    }

    pub fn update_payment_method(&mut self, payment_method_id: &str) -> Result<&CoachMembership, &str> {
        let client = self.client;
        self.slice
            .mutate(|_| client.coach_update_payment_method(payment_method_id))
    }
}
