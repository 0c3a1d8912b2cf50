use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde_json::json;

/// Thin client for the Telegram Bot API used for operational notifications
/// (new rentals, overdue rentals).
#[derive(Clone)]
pub struct TelegramService {
    client: Client,
    config: TelegramConfig,
}

impl TelegramService {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn send_message(&self, text: &str) -> AppResult<()> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.config.bot_token
        );

        let body = json!({
            "chat_id": self.config.chat_id,
            "text": text,
        });

        let response = self.client.post(&url).json(&body).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Telegram sendMessage failed: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_service_creation() {
        let config = TelegramConfig {
            bot_token: "123:abc".to_string(),
            chat_id: "-100200300".to_string(),
        };
        let service = TelegramService::new(config);
        assert!(!service.config.bot_token.is_empty());
    }
}
