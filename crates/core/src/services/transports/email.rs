//! Email delivery via Mailgun.

use pantry_common::{EmailConfig, escape_html};

use crate::types::{Recipient, RenderedMessage, TransportResult};

const DEFAULT_API_BASE: &str = "https://api.mailgun.net";

/// Sends rendered messages to recipients' email addresses through the
/// Mailgun messages API.
#[derive(Clone)]
pub struct EmailTransport {
    config: EmailConfig,
    api_base: String,
    http_client: reqwest::Client,
}

impl EmailTransport {
    /// Create a transport against the production Mailgun endpoint.
    #[must_use]
    #[allow(clippy::expect_used)] // Client build only fails with incompatible TLS settings
    pub fn new(config: EmailConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            api_base: DEFAULT_API_BASE.to_string(),
            http_client,
        }
    }

    /// Create a transport against an alternative API base URL.
    #[must_use]
    #[allow(clippy::expect_used)] // Client build only fails with incompatible TLS settings
    pub fn with_api_base(config: EmailConfig, api_base: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            api_base: api_base.into(),
            http_client,
        }
    }

    /// Deliver the message to every recipient with a plausible address.
    ///
    /// Each recipient is one attempt; one bounced address never stops the
    /// rest of the batch.
    pub async fn deliver(
        &self,
        recipients: &[Recipient],
        message: &RenderedMessage,
    ) -> TransportResult {
        let addressed: Vec<&str> = recipients
            .iter()
            .filter_map(|r| r.email.as_deref())
            .filter(|e| e.contains('@'))
            .collect();

        let html = build_email_html(&message.org_name, &message.heading, &message.body_html);

        let mut result = TransportResult::empty();
        for to in addressed {
            match self.send_one(to, &message.subject, &html, &message.body_text).await {
                Ok(()) => result.sent += 1,
                Err(e) => {
                    tracing::warn!(to = %to, error = %e, "Email delivery failed");
                    result.errors += 1;
                }
            }
        }

        result
    }

    async fn send_one(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<(), String> {
        let form_params = [
            ("from", self.config.from_email()),
            ("to", to.to_string()),
            ("subject", subject.to_string()),
            ("html", html.to_string()),
            ("text", text.to_string()),
        ];

        let response = self
            .http_client
            .post(format!(
                "{}/v3/{}/messages",
                self.api_base, self.config.domain
            ))
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form_params)
            .send()
            .await
            .map_err(|e| format!("Mailgun request failed: {e}"))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(format!("Mailgun {status}: {body}"))
        }
    }
}

/// Wrap a rendered body fragment in the pantry email chrome.
fn build_email_html(org_name: &str, heading: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: 'Nunito', sans-serif; background: #000; color: #fff; padding: 24px;">
  <div style="max-width: 500px; margin: 0 auto;">
    <h1 style="font-size: 18px; letter-spacing: 4px; color: #fdd835; margin-bottom: 4px;">
      {org_upper}
    </h1>
    <p style="color: rgba(255,255,255,0.6); font-size: 12px; letter-spacing: 2px; margin-top: 0;">
      {heading_upper}
    </p>
    <hr style="border: 1px solid rgba(255,255,255,0.2);">
    <div style="font-size: 14px; color: rgba(255,255,255,0.85); line-height: 1.6;">
      {body_html}
    </div>
    <hr style="border: 1px solid rgba(255,255,255,0.2);">
    <p style="color: rgba(255,255,255,0.4); font-size: 10px; letter-spacing: 1px;">
      {org} &mdash; Funky Pony Pantry
    </p>
  </div>
</body>
</html>"#,
        org_upper = escape_html(&org_name.to_uppercase()),
        heading_upper = escape_html(&heading.to_uppercase()),
        org = escape_html(org_name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::renderer::render_message;
    use crate::types::NotificationKind;

    fn config() -> EmailConfig {
        EmailConfig {
            api_key: "key-test".to_string(),
            domain: "mg.pantry.test".to_string(),
            from_address: None,
        }
    }

    fn recipient(email: Option<&str>) -> Recipient {
        Recipient {
            user_id: "u1".to_string(),
            email: email.map(String::from),
            org_id: "org-1".to_string(),
        }
    }

    fn message() -> RenderedMessage {
        render_message(&NotificationKind::Welcome, "Pantry", &serde_json::Map::new())
    }

    #[tokio::test]
    async fn test_recipients_without_address_are_skipped() {
        // Unroutable base: any actual send attempt would surface as an error
        let transport = EmailTransport::with_api_base(config(), "http://127.0.0.1:9");

        let recipients = vec![recipient(None), recipient(Some("not-an-address"))];
        let result = transport.deliver(&recipients, &message()).await;

        assert_eq!(result, TransportResult::empty());
    }

    #[tokio::test]
    async fn test_each_failed_recipient_is_counted() {
        let transport = EmailTransport::with_api_base(config(), "http://127.0.0.1:9");

        let recipients = vec![
            recipient(Some("a@pantry.test")),
            recipient(Some("b@pantry.test")),
        ];
        let result = transport.deliver(&recipients, &message()).await;

        assert_eq!(result.sent, 0);
        assert_eq!(result.errors, 2);
    }

    #[test]
    fn test_email_chrome_uppercases_and_escapes() {
        let html = build_email_html("Beans & Rice", "Pickup Claimed", "<p>body</p>");
        assert!(html.contains("BEANS &amp; RICE"));
        assert!(html.contains("PICKUP CLAIMED"));
        assert!(html.contains("<p>body</p>"));
    }
}
