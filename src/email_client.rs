use std::time::Duration;

use reqwest::Client;
use reqwest::Url;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Serialize;

use crate::domain::SubscriberEmail;

const POSTMARK_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Thin client for a Postmark-style delivery API (`POST {base_url}/email`).
///
/// Establishing a HTTP connection is expensive, so a single `EmailClient` is
/// built at startup and shared by all workers through `web::Data`; the inner
/// `reqwest::Client` keeps its connection pool.
#[derive(Debug)]
pub struct EmailClient {
    http_client: Client,
    send_email_url: Url,
    sender: SubscriberEmail,
    authorization_token: Secret<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        // `join` drops the last path segment unless the base ends with a slash
        let base_url = match base_url.ends_with('/') {
            true => base_url,
            false => format!("{base_url}/"),
        };
        let send_email_url = Url::parse(&base_url)?.join("email")?;
        Ok(Self {
            http_client,
            send_email_url,
            sender,
            authorization_token,
        })
    }

    /// A non-2xx response from the API is an error, as is a timeout
    pub async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), reqwest::Error> {
        let body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            subject,
            html_body: html_content,
            text_body: text_content,
        };
        self.http_client
            .post(self.send_email_url.clone())
            .header(
                POSTMARK_TOKEN_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
