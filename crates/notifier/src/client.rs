use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::{error::SendError, templates::NotificationJob};

/// Client for the HTTP mail gateway.
#[derive(Debug, Clone)]
pub struct Mailer {
    http: HttpClient,
    base_url: Url,
    api_key: String,
    from: String,
    send_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl Mailer {
    /// Create a new mail gateway client.
    pub fn new(base_url: Url, api_key: String, from: String, send_timeout: Duration) -> Self {
        Self { http: HttpClient::new(), base_url, api_key, from, send_timeout }
    }

    /// Authenticate the request.
    fn auth(&self, rb: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        rb.bearer_auth(&self.api_key)
    }

    /// Deliver one notification job.
    ///
    /// The recipient is validated before anything touches the wire; an
    /// address without `@` fails fast with [`SendError::InvalidRecipient`].
    pub async fn send(&self, job: &NotificationJob) -> Result<(), SendError> {
        if !job.to.contains('@') {
            return Err(SendError::InvalidRecipient(job.to.clone()));
        }

        let url = format!("{}/messages", self.base_url.as_str().trim_end_matches('/'));
        let body = OutgoingMessage {
            from: &self.from,
            to: &job.to,
            subject: &job.subject,
            text: &job.body,
        };
        self.auth(self.http.post(&url))
            .timeout(self.send_timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        info!(to = %job.to, subject = %job.subject, "Notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer(base: &str) -> Mailer {
        Mailer::new(
            Url::parse(base).unwrap(),
            "test_api_key".to_owned(),
            "vault@example.com".to_owned(),
            Duration::from_secs(5),
        )
    }

    fn job(to: &str) -> NotificationJob {
        NotificationJob {
            to: to.to_owned(),
            subject: "subject".to_owned(),
            body: "body".to_owned(),
        }
    }

    #[tokio::test]
    async fn sends_message_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("authorization", "Bearer test_api_key")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "from": "vault@example.com",
                "to": "user@example.com",
                "subject": "subject",
                "text": "body",
            })))
            .with_status(200)
            .create_async()
            .await;

        let result = mailer(&server.url()).send(&job("user@example.com")).await;
        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gateway_error_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/messages").with_status(500).create_async().await;

        let err = mailer(&server.url()).send(&job("user@example.com")).await.unwrap_err();
        assert!(matches!(err, SendError::Transport(_)));
        assert!(!err.is_permanent());
    }

    #[tokio::test]
    async fn invalid_recipient_never_touches_the_wire() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/messages").expect(0).create_async().await;

        let err = mailer(&server.url()).send(&job("not-an-email")).await.unwrap_err();
        assert!(matches!(err, SendError::InvalidRecipient(ref to) if to == "not-an-email"));
        assert!(err.is_permanent());
        mock.assert_async().await;
    }
}
