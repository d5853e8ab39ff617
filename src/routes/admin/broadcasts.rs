use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use serde::Deserialize;
use sqlx::PgPool;

use super::list_subscribers;
use crate::domain::Broadcast;
use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::notifications::broadcast;
use crate::notifications::DeliveryReport;
use crate::startup::AppBaseUrl;
use crate::utils::redirect;

#[derive(Deserialize)]
pub struct UpdateFormData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

const DASHBOARD: &str = "/admin/dashboard";

/// Emails of all active subscribers. Rows that no longer parse are skipped
/// with a warning rather than failing the whole broadcast.
async fn get_recipients(pool: &PgPool) -> Result<Vec<SubscriberEmail>, anyhow::Error> {
    let recipients = list_subscribers(pool)
        .await?
        .into_iter()
        .filter_map(|sub| match SubscriberEmail::parse(sub.email) {
            Ok(email) => Some(email),
            Err(e) => {
                tracing::warn!(error.message = %e, "skipping invalid email");
                None
            }
        })
        .collect();
    Ok(recipients)
}

fn delivery_summary(report: &DeliveryReport) -> String {
    match report.failures {
        0 => String::new(),
        n => format!(" ({n} failed)"),
    }
}

/// Shared by both admin actions. Every outcome is reported as a flash message
/// on the dashboard, which re-fetches the stats.
async fn send_to_all(
    notification: &Broadcast,
    pool: &PgPool,
    email_client: &EmailClient,
    base_url: &str,
) -> Result<Option<DeliveryReport>, anyhow::Error> {
    let recipients = get_recipients(pool).await?;
    if recipients.is_empty() {
        // the buttons are disabled in this state; this covers stale pages and
        // scripted requests
        return Ok(None);
    }
    let report = broadcast(pool, email_client, notification, &recipients, base_url).await?;
    Ok(Some(report))
}

/// `POST /admin/updates`
///
/// Sends a custom update (`title`, `content`) to every active subscriber.
#[tracing::instrument(
    name = "Sending update to subscribers",
    skip(form, pool, email_client, base_url),
    fields(title = %form.title)
)]
pub async fn send_update(
    form: web::Form<UpdateFormData>,
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<AppBaseUrl>,
) -> HttpResponse {
    let form = form.into_inner();
    let update = match Broadcast::update(form.title, form.content) {
        Ok(update) => update,
        Err(e) => {
            FlashMessage::error(format!("Missing Information: {e}")).send();
            return redirect(DASHBOARD);
        }
    };

    match send_to_all(&update, &pool, &email_client, &base_url.0).await {
        Ok(Some(report)) => FlashMessage::success(format!(
            "Update Sent! Update \"{}\" has been sent to {} subscribers.{}",
            update.title,
            report.recipients,
            delivery_summary(&report)
        ))
        .send(),
        Ok(None) => FlashMessage::error("There are no subscribers to send the update to.").send(),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, error.message = %e, "update failed");
            FlashMessage::error("Error: Failed to send update. Please try again.").send()
        }
    }
    redirect(DASHBOARD)
}

/// `POST /admin/launch`
///
/// Sends the fixed launch announcement to every active subscriber.
#[tracing::instrument(
    name = "Sending launch notification",
    skip(pool, email_client, base_url)
)]
pub async fn send_launch_notification(
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<AppBaseUrl>,
) -> HttpResponse {
    let launch = Broadcast::launch();
    match send_to_all(&launch, &pool, &email_client, &base_url.0).await {
        Ok(Some(report)) => FlashMessage::success(format!(
            "Launch Notification Sent! All {} subscribers have been notified about the launch.{}",
            report.recipients,
            delivery_summary(&report)
        ))
        .send(),
        Ok(None) => {
            FlashMessage::error("There are no subscribers to send the launch notification to.")
                .send()
        }
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, error.message = %e, "launch notification failed");
            FlashMessage::error("Error: Failed to send launch notification. Please try again.")
                .send()
        }
    }
    redirect(DASHBOARD)
}
