use serde::Serialize;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::PartnerMembership;
use crate::slice::{require, RemoteSlice};

#[derive(Debug, Serialize)]
struct PlanBody<'a> {
    plan: &'a str,
}

fn check_plan(plan: &str) -> ClientResult<()> {
    if plan.trim().is_empty() {
        return Err(ClientError::validation("plan", "choose a plan"));
    }
    Ok(())
}

impl ApiClient {
    pub fn partner_membership(&self) -> ClientResult<PartnerMembership> {
        self.get_json("/api/partner/membership")
    }

    pub fn partner_subscribe(&self, plan: &str) -> ClientResult<PartnerMembership> {
        check_plan(plan)?;
        self.post_charging("/api/partner/membership/subscribe", &PlanBody { plan })
    }

    pub fn partner_cancel(&self) -> ClientResult<PartnerMembership> {
        self.post_json("/api/partner/membership/cancel", &serde_json::json!({}))
    }

    pub fn partner_change_plan(&self, plan: &str) -> ClientResult<PartnerMembership> {
        check_plan(plan)?;
        self.put_json("/api/partner/membership/change-plan", &PlanBody { plan })
    }
}

pub struct PartnerMembershipActions<'a> {
    pub client: &'a ApiClient,
    pub slice: &'a mut RemoteSlice<PartnerMembership>,
}

impl<'a> PartnerMembershipActions<'a> {
    pub fn new(client: &'a ApiClient, slice: &'a mut RemoteSlice<PartnerMembership>) -> Self {
        Self { client, slice }
    }

    pub fn fetch(&mut self) -> Result<&PartnerMembership, &str> {
        let client = self.client;
        self.slice.fetch(|| client.partner_membership())
    }

    pub fn subscribe(&mut self, plan: &str) -> Result<&PartnerMembership, &str> {
        let client = self.client;
        self.slice.mutate(|_| client.partner_subscribe(plan))
    }

    pub fn cancel(&mut self) -> Result<&PartnerMembership, &str> {
        let client = self.client;
        self.slice.mutate(|_| client.partner_cancel())
    }

    /// Changing plan only makes sense for an existing membership.
    pub fn change_plan(&mut self, plan: &str) -> Result<&PartnerMembership, &str> {
        let client = self.client;
        self.slice.mutate(|current| {
            let current = require(current, "partner membership")?;
            if current.plan.as_deref() == Some(plan) {
                return Ok(current.clone());
            }
            client.partner_change_plan(plan)
        })
    }
}
