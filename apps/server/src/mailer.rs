//! OTP mail delivery over an HTTP mail API.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::config::MailConfig;
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail delivery is not configured")]
    NotConfigured,
    #[error("Mail request failed: {0}")]
    Request(String),
    #[error("Mail API rejected the message with status {0}")]
    Rejected(u16),
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Trait for OTP delivery, so tests can swap in a no-op.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, user_name: &str, otp: &str) -> Result<(), MailError>;
}

const OTP_SUBJECT: &str = "Moneta - OTP Verification";

const OTP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>Moneta OTP</title></head>
<body style="font-family: Arial, sans-serif; background-color: #f9f9f9; margin: 0; padding: 0;">
  <div style="max-width: 600px; margin: 20px auto; background-color: #ffffff; border: 1px solid #dddddd; border-radius: 8px;">
    <div style="background-color: #5046E4; color: #ffffff; text-align: center; padding: 20px;">
      <h1 style="margin: 0; font-size: 24px;">Welcome to Moneta</h1>
    </div>
    <div style="padding: 20px; text-align: center;">
      <p style="font-size: 16px; color: #333333;">Hi there, {{user_name}}</p>
      <p style="font-size: 16px; color: #333333;">Your One-Time Password (OTP) is:</p>
      <div style="font-size: 32px; font-weight: bold; color: #5046E4; margin: 20px 0;">{{otp_code}}</div>
      <p style="font-size: 16px; color: #333333;">Please use this code to proceed. This OTP is valid for the next 10 minutes.</p>
      <p style="font-size: 16px; color: #333333;">If you did not request this OTP, please ignore this email.</p>
    </div>
  </div>
</body>
</html>"#;

/// Mailer that POSTs the rendered message to a JSON mail API.
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_otp(&self, to: &str, user_name: &str, otp: &str) -> Result<(), MailError> {
        let html = OTP_TEMPLATE
            .replace("{{user_name}}", user_name)
            .replace("{{otp_code}}", otp);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "from": self.config.from,
                "to": to,
                "subject": OTP_SUBJECT,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| MailError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Stand-in used when mail settings are absent; OTP endpoints then surface
/// a 500, matching the behavior of missing mail credentials upstream.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_otp(&self, _to: &str, _user_name: &str, _otp: &str) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}
