//! Payment provider seam.
//!
//! Only intent creation is handled here; the client completes the payment with the
//! provider and then reports it through `/payments`.

use crate::app_config::PaymentConfig;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug)]
pub enum PaymentError {
    /// Amount is zero, negative or not a number.
    InvalidAmount,
    /// Provider rejected the call or was unreachable.
    Provider(String),
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentError::InvalidAmount => write!(f, "Invalid payment amount"),
            PaymentError::Provider(msg) => write!(f, "Payment provider error: {}", msg),
        }
    }
}

impl std::error::Error for PaymentError {}

impl From<reqwest::Error> for PaymentError {
    fn from(e: reqwest::Error) -> Self {
        PaymentError::Provider(e.to_string())
    }
}

/// Converts a price in major units to the provider's minor units.
pub fn to_minor_units(price: f64) -> Result<i64, PaymentError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(PaymentError::InvalidAmount);
    }
    Ok((price * 100.0).round() as i64)
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a payment intent and returns its client secret.
    async fn create_intent(&self, amount_minor: i64) -> Result<String, PaymentError>;
}

/// Stripe-compatible gateway.
pub struct StripeGateway {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl StripeGateway {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Deserialize)]
struct IntentResponse {
    client_secret: String,
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, amount_minor: i64) -> Result<String, PaymentError> {
        let url = format!(
            "{}/v1/payment_intents",
            self.config.api_base.trim_end_matches('/')
        );

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.config.secret_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", self.config.currency.to_owned()),
                ("payment_method_types[]", "card".to_owned()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            log::error!("Payment intent rejected ({}): {}", status, body);
            return Err(PaymentError::Provider(format!("status {}", status)));
        }

        let intent: IntentResponse = resp.json().await?;
        Ok(intent.client_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(5.0).unwrap(), 500);
        assert_eq!(to_minor_units(19.99).unwrap(), 1999);
        assert!(matches!(to_minor_units(0.0), Err(PaymentError::InvalidAmount)));
        assert!(matches!(to_minor_units(-3.0), Err(PaymentError::InvalidAmount)));
        assert!(matches!(
            to_minor_units(f64::NAN),
            Err(PaymentError::InvalidAmount)
        ));
    }
}
