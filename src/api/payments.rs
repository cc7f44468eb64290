use std::sync::LazyLock;

use regex::Regex;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{PaymentIntent, PaymentIntentRequest};

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]{3}$").unwrap());
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\.(\d{1,2}))?$").unwrap());

/// Check a payment form before anything is sent.
pub fn validate_intent(req: &PaymentIntentRequest) -> ClientResult<()> {
    if req.amount <= 0 {
        return Err(ClientError::validation("amount", "must be greater than zero"));
    }
    if !CURRENCY_RE.is_match(&req.currency) {
        return Err(ClientError::validation(
            "currency",
            format!("expected a three-letter ISO code, got \"{}\"", req.currency),
        ));
    }
    if req.plan.trim().is_empty() {
        return Err(ClientError::validation("plan", "choose a plan"));
    }
    Ok(())
}

impl ApiClient {
    /// Ask the backend for a payment intent. The returned client secret is
    /// handed to the hosted card widget; card data never reaches this client.
    pub fn create_payment_intent(&self, req: &PaymentIntentRequest) -> ClientResult<PaymentIntent> {
        let mut req = req.clone();
        req.currency = req.currency.trim().to_lowercase();
        validate_intent(&req)?;
        let intent: PaymentIntent = self.post_charging("/api/payments/create-payment-intent", &req)?;
        if intent.client_secret.is_empty() {
            return Err(ClientError::MalformedResponse {
                endpoint: "/api/payments/create-payment-intent".to_string(),
                reason: "empty client_secret".to_string(),
            });
        }
        Ok(intent)
    }
}

/// Parse a decimal amount like `49.90` into minor units.
pub fn parse_amount(raw: &str) -> ClientResult<i64> {
    let raw = raw.trim();
    let caps = AMOUNT_RE
        .captures(raw)
        .ok_or_else(|| ClientError::validation("amount", format!("not a valid amount: \"{raw}\"")))?;
    let whole: i64 = caps[1]
        .parse()
        .map_err(|_| ClientError::validation("amount", "too large"))?;
    let cents = match caps.get(2) {
        Some(m) if m.as_str().len() == 1 => m.as_str().parse::<i64>().unwrap_or(0) * 10,
        Some(m) => m.as_str().parse::<i64>().unwrap_or(0),
        None => 0,
    };
    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(|| ClientError::validation("amount", "too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(amount: i64, currency: &str, plan: &str) -> PaymentIntentRequest {
        PaymentIntentRequest {
            amount,
            currency: currency.to_string(),
            plan: plan.to_string(),
            description: None,
        }
    }

    #[test]
    fn rejects_incomplete_forms() {
        assert!(validate_intent(&req(0, "mxn", "pro")).is_err());
        assert!(validate_intent(&req(100, "pesos", "pro")).is_err());
        assert!(validate_intent(&req(100, "mxn", " ")).is_err());
        assert!(validate_intent(&req(4990, "mxn", "pro")).is_ok());
    }

    #[test]
    fn invalid_form_never_hits_network() {
        // Nothing listens on this port; a validation error proves no request was made.
        let client = ApiClient::new("http://127.0.0.1:9", None);
        let err = client.create_payment_intent(&req(-5, "MXN", "pro")).unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref field, .. } if field == "amount"));
    }

    #[test]
    fn amounts() {
        assert_eq!(parse_amount("49.90").unwrap(), 4990);
        assert_eq!(parse_amount("49.9").unwrap(), 4990);
        assert_eq!(parse_amount("12").unwrap(), 1200);
        assert!(parse_amount("12.345").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
    }
}
