//! Outbound notifications: delivery through `EmailClient` plus the append-only
//! `notifications_sent` log.
//!
//! Every delivery attempt produces exactly one log row, whether the email API
//! accepted it or not. Only failures to write the log abort a broadcast.

use anyhow::Context;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Broadcast;
use crate::domain::NotificationKind;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriberName;
use crate::email_client::EmailClient;

/// One row of `notifications_sent`
#[derive(Debug)]
pub struct NotificationRecord<'a> {
    pub kind: NotificationKind,
    pub title: &'a str,
    pub content: &'a str,
    pub recipient_email: &'a SubscriberEmail,
    pub success: bool,
    pub sent_at: DateTime<Utc>,
}

/// Outcome of a broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub recipients: usize,
    pub failures: usize,
}

#[tracing::instrument(
    name = "Recording notification",
    skip(record, pool),
    fields(kind = %record.kind, recipient = %record.recipient_email, success = record.success)
)]
pub async fn record_notification(
    record: &NotificationRecord<'_>,
    pool: &PgPool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications_sent
            (id, "type", title, content, recipient_email, success, sent_at)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(record.kind.as_str())
    .bind(record.title)
    .bind(record.content)
    .bind(record.recipient_email.as_ref())
    .bind(record.success)
    .bind(record.sent_at)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("bad query: {e:?}");
        e
    })?;
    Ok(())
}

/// Send `notification` to a single recipient and log the attempt. Returns whether
/// the email API accepted the message.
#[tracing::instrument(
    name = "Delivering notification",
    skip(pool, email_client, notification, greeting, base_url),
    fields(kind = %notification.kind)
)]
pub async fn deliver(
    pool: &PgPool,
    email_client: &EmailClient,
    notification: &Broadcast,
    recipient: &SubscriberEmail,
    greeting: Option<&SubscriberName>,
    base_url: &str,
) -> Result<bool, anyhow::Error> {
    let success = match email_client
        .send_email(
            recipient,
            &notification.title,
            &notification.html_body(greeting, base_url),
            &notification.text_body(greeting, base_url),
        )
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "failed to deliver {} notification to {recipient}",
                notification.kind
            );
            false
        }
    };

    let record = NotificationRecord {
        kind: notification.kind,
        title: &notification.title,
        content: &notification.content,
        recipient_email: recipient,
        success,
        sent_at: Utc::now(),
    };
    record_notification(&record, pool)
        .await
        .with_context(|| format!("could not record notification to {recipient}"))?;
    Ok(success)
}

/// Deliver `notification` to every recipient, one after the other. Covers both
/// custom updates and the launch announcement.
#[tracing::instrument(
    name = "Broadcasting notification",
    skip(pool, email_client, notification, recipients, base_url),
    fields(kind = %notification.kind, title = %notification.title, recipients = recipients.len())
)]
pub async fn broadcast(
    pool: &PgPool,
    email_client: &EmailClient,
    notification: &Broadcast,
    recipients: &[SubscriberEmail],
    base_url: &str,
) -> Result<DeliveryReport, anyhow::Error> {
    let mut report = DeliveryReport {
        recipients: recipients.len(),
        failures: 0,
    };
    for recipient in recipients {
        if !deliver(pool, email_client, notification, recipient, None, base_url).await? {
            report.failures += 1;
        }
    }
    Ok(report)
}
