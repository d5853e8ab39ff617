use actix_web::http::header::ContentType;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;
use anyhow::Context;
use htmlescape::encode_minimal;
use sqlx::PgPool;

use crate::authentication::UserId;
use crate::domain::Stats;
use crate::domain::Subscriber;
use crate::domain::PRODUCT_NAME;
use crate::utils::flash_html;

/// Given the admin's id, return the associated username
#[tracing::instrument(name = "Getting admin username", skip(pool))]
pub async fn get_username(
    user_id: UserId,
    pool: &PgPool,
) -> anyhow::Result<String> {
    let (username,): (String,) = sqlx::query_as(
        r#"
        SELECT username FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(*user_id)
    .fetch_one(pool)
    .await
    .with_context(|| format!("No user found with id {user_id}"))?;
    Ok(username)
}

/// Active subscribers, oldest first
#[tracing::instrument(name = "Getting list of active subscribers", skip(pool))]
pub async fn list_subscribers(pool: &PgPool) -> Result<Vec<Subscriber>, anyhow::Error> {
    let subs = sqlx::query_as::<_, Subscriber>(
        r#"
        SELECT email, first_name, is_active, created_at
        FROM email_subscribers
        WHERE is_active
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to fetch subscribers")?;
    Ok(subs)
}

#[tracing::instrument(name = "Computing stats", skip(pool))]
pub async fn get_stats(pool: &PgPool) -> Result<Stats, anyhow::Error> {
    let stats = sqlx::query_as::<_, Stats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM email_subscribers WHERE is_active) AS total_subscribers,
            (SELECT COUNT(*) FROM notifications_sent) AS total_notifications
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to compute stats")?;
    Ok(stats)
}

/// Both queries run concurrently and fail independently; a failure is logged
/// and replaced by an empty list or zeroed stats, so the dashboard always
/// renders.
pub async fn load_dashboard_data(pool: &PgPool) -> (Vec<Subscriber>, Stats) {
    let (subs, stats) = tokio::join!(list_subscribers(pool), get_stats(pool));
    let subs = subs.unwrap_or_else(|e| {
        tracing::error!(error.cause_chain = ?e, error.message = %e, "Error loading subscribers");
        Vec::new()
    });
    let stats = stats.unwrap_or_else(|e| {
        tracing::error!(error.cause_chain = ?e, error.message = %e, "Error loading stats");
        Stats::default()
    });
    (subs, stats)
}

/// Inline `onsubmit` for the send forms: one click, one broadcast
const LOCK_ON_SUBMIT: &str =
    "const b = this.querySelector('button'); b.disabled = true; b.textContent = 'Sending...';";

fn subscriber_list_html(subs: &[Subscriber]) -> String {
    if subs.is_empty() {
        return r#"<p>No subscribers yet</p>
    <p><small>Subscribers will appear here when they sign up</small></p>"#
            .to_string();
    }
    let items: String = subs
        .iter()
        .map(|sub| {
            format!(
                "<li><strong>{}</strong><br>{}<br><small>Subscribed: {}</small></li>\n",
                encode_minimal(&sub.first_name),
                encode_minimal(&sub.email),
                sub.subscribed_on(),
            )
        })
        .collect();
    format!(
        "<h3>Active Subscribers ({})</h3>\n<ul>\n{items}</ul>",
        subs.len()
    )
}

/// `GET /admin`, `GET /admin/dashboard`
///
/// Reloading the page is the refresh: subscribers and stats are fetched anew
/// on every request. Send buttons are disabled while nobody is subscribed, and
/// while a send is in flight.
///
/// Like the list and the stats, a failed username lookup only degrades the
/// greeting.
pub async fn admin_dashboard(
    user_id: web::ReqData<UserId>,
    pool: web::Data<PgPool>,
    flash_messages: IncomingFlashMessages,
) -> HttpResponse {
    let (username, (subs, stats)) = tokio::join!(
        get_username(user_id.into_inner(), &pool),
        load_dashboard_data(&pool)
    );
    let greeting = match username {
        Ok(username) => format!("Welcome {}!", encode_minimal(&username)),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, error.message = %e, "Error loading username");
            "Welcome!".to_string()
        }
    };

    let notices = flash_html(&flash_messages);
    let total = stats.total_subscribers;
    let sent = stats.total_notifications;
    let disabled = match total {
        0 => "disabled",
        _ => "",
    };
    let subscriber_list = subscriber_list_html(&subs);

    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>{PRODUCT_NAME} Admin Panel</title>
</head>
<body>
    <h1>{PRODUCT_NAME} Admin Panel</h1>
    <p>{greeting} Manage notifications and updates for your subscribers.</p>
    {notices}
    <section id="stats">
        <p><strong id="total-subscribers">{total}</strong> Active Subscribers</p>
        <p><strong id="total-notifications">{sent}</strong> Notifications Sent</p>
    </section>

    <section id="send-update">
        <h2>Send Update to Subscribers</h2>
        <p>Send a custom update notification to all {total} active subscribers</p>
        <form action="/admin/updates" method="post" onsubmit="{LOCK_ON_SUBMIT}">
            <label>
                Update Title
                <input type="text" name="title" placeholder="e.g., New Features Available!" />
            </label>
            <label>
                Update Content
                <textarea name="content" rows="6" placeholder="Write your update message here..."></textarea>
            </label>
            <button type="submit" {disabled}>Send Update to {total} Subscribers</button>
        </form>
    </section>

    <section id="launch">
        <h2>Launch Notification</h2>
        <p>This will send a special launch notification email to all active subscribers,
        letting them know that {PRODUCT_NAME} is now live and available!</p>
        <form action="/admin/launch" method="post" onsubmit="{LOCK_ON_SUBMIT}">
            <button type="submit" {disabled}>Send Launch Notification to {total} Subscribers</button>
        </form>
    </section>

    <section id="subscribers">
        <h2>Subscriber Management</h2>
        <form action="/admin/dashboard" method="get">
            <button type="submit">Refresh Subscribers</button>
        </form>
        {subscriber_list}
    </section>

    <form name="logoutForm" action="/admin/logout" method="post">
        <input type="submit" value="Logout">
    </form>
</body>
</html>"#
    );

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
