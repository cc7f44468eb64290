use serde::{Deserialize, Deserializer, Serialize};

use crate::filter::Filterable;

/// Backend ids arrive as strings or numbers depending on the resource.
fn id_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = serde_json::Value::deserialize(d)?;
    match v {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

fn opt_id_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    match v {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

/// List endpoints answer either with a bare array or `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(v) | ListEnvelope::Wrapped { data: v } => v,
        }
    }
}

/// One-on-one or group coaching session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingSession {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub status: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub player: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub student_id: Option<String>,
    pub level: Option<String>,
    pub session_type: Option<String>,
    pub court: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

impl Filterable for CoachingSession {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "status" => self.status.clone(),
            "level" => self.level.clone(),
            "session_type" | "type" => self.session_type.clone(),
            "court" => self.court.clone(),
            "student_id" => self.student_id.clone(),
            _ => None,
        }
    }

    fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn search_text(&self) -> Option<&str> {
        self.player.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub level: Option<String>,
    pub joined_at: Option<String>,
    pub rating: Option<f64>,
}

impl Filterable for Student {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "level" => self.level.clone(),
            "email" => self.email.clone(),
            _ => None,
        }
    }

    fn date(&self) -> Option<&str> {
        self.joined_at.as_deref()
    }

    fn search_text(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
    pub club: Option<String>,
    pub status: Option<String>,
    pub surface: Option<String>,
    pub hourly_rate: Option<f64>,
    pub created_at: Option<String>,
}

impl Filterable for Court {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "status" => self.status.clone(),
            "surface" => self.surface.clone(),
            "club" => self.club.clone(),
            _ => None,
        }
    }

    fn date(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn search_text(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    PastDue,
    Cancelled,
    Expired,
    Pending,
    #[serde(other)]
    Unknown,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::PastDue => "past_due",
            MembershipStatus::Cancelled => "cancelled",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Pending => "pending",
            MembershipStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub brand: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u32>,
    pub exp_year: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachMembership {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    pub status: MembershipStatus,
    pub plan: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub current_period_end: Option<String>,
    #[serde(default)]
    pub auto_renew: bool,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerMembership {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    pub status: MembershipStatus,
    pub plan: Option<String>,
    pub price: Option<f64>,
    pub current_period_end: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Dashboard payload, discriminated by the authenticated user's role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Player {
        name: Option<String>,
        ranking: Option<u32>,
        points: Option<f64>,
        #[serde(default)]
        upcoming_bookings: u32,
    },
    Coach {
        name: Option<String>,
        #[serde(default)]
        students: u32,
        #[serde(default)]
        upcoming_sessions: u32,
        rating: Option<f64>,
    },
    Club {
        name: Option<String>,
        #[serde(default)]
        courts: u32,
        #[serde(default)]
        members: u32,
        monthly_revenue: Option<f64>,
    },
    Partner {
        name: Option<String>,
        plan: Option<String>,
        #[serde(default)]
        active_promotions: u32,
    },
    StateCommittee {
        name: Option<String>,
        state: Option<String>,
        #[serde(default)]
        clubs: u32,
        #[serde(default)]
        players: u32,
    },
}

impl Dashboard {
    pub fn role(&self) -> &str {
        match self {
            Dashboard::Player { .. } => "player",
            Dashboard::Coach { .. } => "coach",
            Dashboard::Club { .. } => "club",
            Dashboard::Partner { .. } => "partner",
            Dashboard::StateCommittee { .. } => "state_committee",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Dashboard::Player { name, .. }
            | Dashboard::Coach { name, .. }
            | Dashboard::Club { name, .. }
            | Dashboard::Partner { name, .. }
            | Dashboard::StateCommittee { name, .. } => name.as_deref(),
        }
    }
}

/// Body of `POST /api/payments/create-payment-intent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in the currency's minor unit.
    pub amount: i64,
    pub currency: String,
    pub plan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    #[serde(alias = "clientSecret")]
    pub client_secret: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(alias = "photoUrl", alias = "photo_url")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_accepts_numeric_ids() {
        let s: CoachingSession = serde_json::from_value(serde_json::json!({
            "id": 7, "status": "scheduled", "date": "2024-06-01",
            "player": "Ana", "student_id": 3, "price": 40.0
        }))
        .unwrap();
        assert_eq!(s.id, "7");
        assert_eq!(s.student_id.as_deref(), Some("3"));
        assert_eq!(s.rating, None);
    }

    #[test]
    fn list_envelope_both_shapes() {
        let bare: ListEnvelope<Court> =
            serde_json::from_str(r#"[{"id":"c1","name":"Central"}]"#).unwrap();
        let wrapped: ListEnvelope<Court> =
            serde_json::from_str(r#"{"data":[{"id":"c1","name":"Central"}]}"#).unwrap();
        assert_eq!(bare.into_vec(), wrapped.into_vec());
    }

    #[test]
    fn dashboard_is_tagged_by_role() {
        let d: Dashboard = serde_json::from_str(
            r#"{"role":"state_committee","name":"Jalisco","clubs":12,"players":340}"#,
        )
        .unwrap();
        assert_eq!(d.role(), "state_committee");
        assert_eq!(d.name(), Some("Jalisco"));
        assert!(serde_json::from_str::<Dashboard>(r#"{"role":"alien"}"#).is_err());
    }

    #[test]
    fn unknown_membership_status_is_kept() {
        let m: CoachMembership =
            serde_json::from_str(r#"{"status":"trialing","plan":"pro"}"#).unwrap();
        assert_eq!(m.status, MembershipStatus::Unknown);
        assert!(!m.auto_renew);
    }
}
