//! Transactional mail collaborator.
//!
//! Delivery is attempted via the primary provider, then the fallback
//! webhook. Failures never fail the calling operation; callers log and move
//! on. Outside production, issued links are also written to the server log
//! so local development works without any provider configured.

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use gifty_core::Email;

use crate::config::MailConfig;

/// Primary transactional mail provider endpoint.
const PRIMARY_API_URL: &str = "https://api.resend.com/emails";

/// Errors that can occur when dispatching mail.
#[derive(Debug, Error)]
pub enum MailerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("provider error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No configured provider accepted the message.
    #[error("no mail provider available")]
    Unavailable,
}

#[derive(Serialize)]
struct ProviderPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Transactional mail client with provider fallback.
pub struct Mailer {
    client: reqwest::Client,
    config: MailConfig,
    production: bool,
}

impl Mailer {
    /// Create a new mailer.
    #[must_use]
    pub fn new(config: MailConfig, production: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            production,
        }
    }

    /// Send a magic-link login email.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` when no provider accepts the message; callers
    /// treat this as non-fatal.
    pub async fn send_magic_link(&self, to: &Email, link: &str) -> Result<(), MailerError> {
        self.log_link_in_development("magic link", link);
        let (subject, html) = magic_link_email(link);
        self.send(to.as_str(), &subject, &html).await
    }

    /// Send a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` when no provider accepts the message.
    pub async fn send_password_reset(&self, to: &Email, link: &str) -> Result<(), MailerError> {
        self.log_link_in_development("password reset link", link);
        let (subject, html) = password_reset_email(link);
        self.send(to.as_str(), &subject, &html).await
    }

    /// Send a redemption confirmation to the card's customer.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` when no provider accepts the message.
    pub async fn send_redemption_receipt(
        &self,
        to: &str,
        business_name: &str,
        amount: Decimal,
        remaining_balance: Decimal,
    ) -> Result<(), MailerError> {
        let (subject, html) = redemption_receipt_email(business_name, amount, remaining_balance);
        self.send(to, &subject, &html).await
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        if let (Some(api_key), Some(from)) = (&self.config.api_key, &self.config.from_address) {
            match self
                .send_via_provider(api_key.expose_secret(), from, to, subject, html)
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(error = %e, "primary mail provider failed, trying fallback");
                }
            }
        }

        if let Some(webhook_url) = &self.config.webhook_url {
            match self.send_via_webhook(webhook_url, to, subject, html).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(error = %e, "fallback mail webhook failed");
                }
            }
        }

        Err(MailerError::Unavailable)
    }

    async fn send_via_provider(
        &self,
        api_key: &str,
        from: &str,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), MailerError> {
        let payload = ProviderPayload {
            from,
            to: [to],
            subject,
            html,
        };

        let response = self
            .client
            .post(PRIMARY_API_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn send_via_webhook(
        &self,
        webhook_url: &str,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), MailerError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.config.webhook_key
            && let Ok(value) = HeaderValue::from_str(key.expose_secret())
        {
            headers.insert("x-webhook-key", value);
        }

        let payload = WebhookPayload { to, subject, html };

        let response = self
            .client
            .post(webhook_url)
            .headers(headers)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Development log channel for issued links; never active in production.
    fn log_link_in_development(&self, kind: &str, link: &str) {
        if !self.production {
            tracing::info!(%link, "{kind} issued (development log)");
        }
    }
}

// =============================================================================
// Message bodies
// =============================================================================

fn magic_link_email(link: &str) -> (String, String) {
    (
        "Your Gifty login link".to_string(),
        format!(
            "<p>Click the link below to sign in to your Gifty dashboard. \
             It expires in 15 minutes and works once.</p>\
             <p><a href=\"{link}\">Sign in</a></p>"
        ),
    )
}

fn password_reset_email(link: &str) -> (String, String) {
    (
        "Reset your Gifty password".to_string(),
        format!(
            "<p>A password reset was requested for your account. \
             The link below expires in 1 hour and works once.</p>\
             <p><a href=\"{link}\">Reset password</a></p>\
             <p>If you did not request this, you can ignore this email.</p>"
        ),
    )
}

fn redemption_receipt_email(
    business_name: &str,
    amount: Decimal,
    remaining_balance: Decimal,
) -> (String, String) {
    (
        format!("Your gift card was redeemed at {business_name}"),
        format!(
            "<p>{amount} was redeemed from your gift card at {business_name}.</p>\
             <p>Remaining balance: {remaining_balance}</p>"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_link_email_embeds_link() {
        let (subject, html) = magic_link_email("https://gifty.example/api/auth/verify?token=abc");
        assert!(subject.contains("login link"));
        assert!(html.contains("https://gifty.example/api/auth/verify?token=abc"));
        assert!(html.contains("15 minutes"));
    }

    #[test]
    fn test_reset_email_mentions_expiry() {
        let (_, html) = password_reset_email("https://gifty.example/reset?token=abc");
        assert!(html.contains("1 hour"));
    }

    #[test]
    fn test_receipt_shows_amounts() {
        let (subject, html) =
            redemption_receipt_email("Cafe Norte", Decimal::new(2500, 2), Decimal::new(1000, 2));
        assert!(subject.contains("Cafe Norte"));
        assert!(html.contains("25.00"));
        assert!(html.contains("10.00"));
    }
}
