use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Minimal Stripe client for hosted Checkout sessions, built on reqwest.
#[derive(Clone)]
pub struct StripeService {
    client: Client,
    config: StripeConfig,
    success_url: String,
    cancel_url: String,
}

impl StripeService {
    pub fn new(config: StripeConfig, public_url: &str) -> Self {
        let base = public_url.trim_end_matches('/');
        Self {
            client: Client::new(),
            config,
            success_url: format!("{base}/api/v1/payments/success"),
            cancel_url: format!("{base}/api/v1/payments/cancel"),
        }
    }

    /// Creates a payment-mode Checkout session with a single line item priced
    /// in minor units (cents). https://stripe.com/docs/payments/checkout
    pub async fn create_checkout_session(
        &self,
        rental_id: i64,
        amount_in_cents: i64,
    ) -> AppResult<CheckoutSession> {
        let url = "https://api.stripe.com/v1/checkout/sessions";

        let params = [
            ("mode", "payment".to_string()),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                self.config.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                amount_in_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                format!("Car rental #{rental_id}"),
            ),
            ("metadata[rental_id]", rental_id.to_string()),
        ];

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        if response.status().is_success() {
            let session: CheckoutSession = response.json().await?;
            Ok(session)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to create checkout session: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_service_creation() {
        let config = StripeConfig {
            secret_key: "sk_test_123".to_string(),
            currency: "usd".to_string(),
        };
        let service = StripeService::new(config, "http://localhost:8080/");
        assert_eq!(
            service.success_url,
            "http://localhost:8080/api/v1/payments/success"
        );
        assert_eq!(
            service.cancel_url,
            "http://localhost:8080/api/v1/payments/cancel"
        );
    }
}
