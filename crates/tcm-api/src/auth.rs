//! Client for the authentication/account API.

use serde::{Deserialize, Serialize};

use crate::config::ApiSettings;
use crate::envelope::Payload;
use crate::error::{ApiError, Result};
use crate::http::Transport;
use crate::models::{RegistrationRequest, Session};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyBody<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct Availability {
    available: bool,
}

/// Async client for the account backend.
#[derive(Debug, Clone)]
pub struct AuthClient {
    transport: Transport,
}

impl AuthClient {
    /// Creates a client for `settings.auth_base_url`.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(&settings.auth_base_url, settings)?,
        })
    }

    /// Exchange credentials for a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = required("email", email)?;
        if password.is_empty() {
            return Err(ApiError::InvalidRequest("password must not be empty".into()));
        }
        let url = self.transport.url(&["api", "auth", "login"], &[])?;
        let payload: Payload<Session> = self
            .transport
            .post(url, &Credentials { email, password })
            .await?;
        tracing::info!(user_id = %payload.data.user_id, "logged in");
        Ok(payload.data)
    }

    /// Ask the backend to mail a verification code.
    pub async fn send_verification_email(&self, email: &str) -> Result<()> {
        self.email_action(&["api", "auth", "email", "send-verification"], email)
            .await
    }

    /// Confirm an address with the code the user received.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<()> {
        let email = required("email", email)?;
        let code = required("verification code", code)?;
        let url = self.transport.url(&["api", "auth", "email", "verify"], &[])?;
        self.transport
            .post_ack(url, &VerifyBody { email, code })
            .await?;
        Ok(())
    }

    /// Start a password reset for the account behind `email`.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.email_action(&["api", "auth", "password", "reset-request"], email)
            .await
    }

    /// Re-send the verification mail.
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        self.email_action(&["api", "auth", "email", "resend-verification"], email)
            .await
    }

    /// Whether `email` is still free to register.
    pub async fn check_email_available(&self, email: &str) -> Result<Payload<bool>> {
        let email = required("email", email)?;
        let url = self.transport.url(
            &["api", "auth", "email", "available"],
            &[("email", email.to_string())],
        )?;
        let payload: Payload<Availability> = self.transport.get(url).await?;
        Ok(payload.map(|a| a.available))
    }

    /// Create an account.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<()> {
        let url = self.transport.url(&["api", "auth", "register"], &[])?;
        self.transport.post_ack(url, request).await?;
        tracing::info!(username = %request.username, "registration accepted");
        Ok(())
    }

    async fn email_action(&self, segments: &[&str], email: &str) -> Result<()> {
        let email = required("email", email)?;
        let url = self.transport.url(segments, &[])?;
        self.transport.post_ack(url, &EmailBody { email }).await?;
        Ok(())
    }
}

fn required<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::InvalidRequest(format!("{what} must not be empty")))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(AuthClient::new(&ApiSettings::default()).is_ok());
    }

    #[tokio::test]
    async fn test_blank_email_rejected_locally() {
        let client = AuthClient::new(&ApiSettings::default()).unwrap();
        let err = client.request_password_reset("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        let err = client.login("user@example.com", "").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
