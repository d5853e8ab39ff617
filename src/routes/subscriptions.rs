use std::fmt::Debug;

use actix_web::error::InternalError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use actix_web_flash_messages::Level;
use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::error_chain_fmt;
use super::landing_page;
use super::SignupFormValues;
use crate::domain::Broadcast;
use crate::domain::NewSubscriber;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriberName;
use crate::domain::PRODUCT_NAME;
use crate::email_client::EmailClient;
use crate::notifications::deliver;
use crate::startup::AppBaseUrl;
use crate::utils::notice_html;
use crate::utils::redirect;

/// Every field is optional at the http level: a missing field is reported to
/// the visitor like an empty one, instead of a bare 400 from the extractor.
/// An unchecked checkbox is simply absent from the form body.
#[derive(Deserialize)]
pub struct FormData {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    email: String,
    notify: Option<String>,
}

impl FormData {
    fn values(&self) -> SignupFormValues<'_> {
        SignupFormValues {
            first_name: &self.first_name,
            email: &self.email,
            notify: self.consented(),
        }
    }

    /// Browsers send `on` for a checked box without a `value`
    fn consented(&self) -> bool {
        matches!(
            self.notify.as_deref().map(str::trim),
            Some("on" | "true" | "yes" | "1")
        )
    }
}

impl TryFrom<&FormData> for NewSubscriber {
    type Error = SubscribeError;
    fn try_from(value: &FormData) -> Result<Self, Self::Error> {
        if value.first_name.trim().is_empty() || value.email.trim().is_empty() || !value.consented()
        {
            return Err(SubscribeError::MissingInformation);
        }
        let first_name =
            SubscriberName::parse(value.first_name.clone()).map_err(SubscribeError::InvalidInformation)?;
        let email =
            SubscriberEmail::parse(value.email.clone()).map_err(SubscribeError::InvalidInformation)?;
        Ok(NewSubscriber { first_name, email })
    }
}

/// Only the first two variants are the visitor's fault; both are caught before
/// the db is touched.
#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Please fill in all required fields and check the notification box.")]
    MissingInformation,
    #[error("{0}")]
    InvalidInformation(String),
    #[error("Something went wrong. Please try again.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for SubscribeError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingInformation | Self::InvalidInformation(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn notice(&self) -> String {
        match self {
            Self::MissingInformation => {
                notice_html(Level::Warning, &format!("Missing Information: {self}"))
            }
            Self::InvalidInformation(_) => {
                notice_html(Level::Warning, &format!("Invalid Information: {self}"))
            }
            Self::UnexpectedError(_) => notice_html(Level::Error, &format!("Error: {self}")),
        }
    }
}

/// Whether a row was added to `email_subscribers`
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadySubscribed,
}

/// The unique constraint on `email` is the only duplicate check; a conflicting
/// insert is an expected outcome, not an error.
#[tracing::instrument(name = "Saving new subscriber in the database", skip(new_sub, pool))]
pub async fn insert_subscriber(
    new_sub: &NewSubscriber,
    pool: &PgPool,
) -> Result<InsertOutcome, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO email_subscribers (id, email, first_name, is_active, created_at)
        VALUES ($1, $2, $3, true, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_sub.email.as_ref())
    .bind(new_sub.first_name.as_ref())
    .bind(Utc::now())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Ok(InsertOutcome::AlreadySubscribed)
        }
        Err(e) => {
            tracing::error!("bad query: {e:?}");
            Err(e)
        }
    }
}

/// Best effort: the subscription stands even if the email or its log row
/// fails, so errors are only logged.
#[tracing::instrument(
    name = "Sending welcome email to new subscriber",
    skip(pool, email_client, new_sub, base_url)
)]
async fn send_welcome_email(
    pool: &PgPool,
    email_client: &EmailClient,
    new_sub: &NewSubscriber,
    base_url: &str,
) {
    let welcome = Broadcast::welcome();
    if let Err(e) = deliver(
        pool,
        email_client,
        &welcome,
        &new_sub.email,
        Some(&new_sub.first_name),
        base_url,
    )
    .await
    {
        tracing::warn!(
            error.cause_chain = ?e,
            error.message = %e,
            "could not record welcome notification"
        );
    }
}

/// `POST /subscriptions`
///
/// `first_name`, `email` and the `notify` checkbox are all required. Outcomes:
///
/// - missing or malformed field: 400, page re-rendered with the form filled
///   in, nothing stored
/// - new email: subscriber stored, welcome email sent and logged, 303 to `/`
///   with a success message
/// - known email: nothing stored, 303 to `/` with an "already subscribed"
///   message
/// - anything else: 500, page re-rendered with the form filled in
///
/// ```sh
///     curl -v --data 'first_name=Ana&email=ana%40campus.edu&notify=on' http://127.0.0.1:8000/subscriptions
/// ```
#[tracing::instrument(
    name = "Adding new subscriber",
    skip(form, pool, email_client, base_url),
    fields(
        subscriber_email = %form.email,
        subscriber_name = %form.first_name,
    )
)]
pub async fn subscribe(
    form: web::Form<FormData>,
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<AppBaseUrl>,
) -> Result<HttpResponse, InternalError<SubscribeError>> {
    let form = form.into_inner();
    match try_subscribe(&form, &pool, &email_client, &base_url.0).await {
        Ok(resp) => Ok(resp),
        Err(e) => {
            let resp = HttpResponse::build(e.status_code())
                .content_type(ContentType::html())
                .body(landing_page(&form.values(), &e.notice()));
            Err(InternalError::from_response(e, resp))
        }
    }
}

async fn try_subscribe(
    form: &FormData,
    pool: &PgPool,
    email_client: &EmailClient,
    base_url: &str,
) -> Result<HttpResponse, SubscribeError> {
    let new_sub: NewSubscriber = form.try_into()?;
    let name = new_sub.first_name.as_ref();

    let outcome = insert_subscriber(&new_sub, pool)
        .await
        .context("Failed to insert new subscriber in the database")?;

    match outcome {
        InsertOutcome::AlreadySubscribed => {
            tracing::info!("subscriber already on the waitlist");
            FlashMessage::info(format!(
                "Already Subscribed! {name}, you're already on our list! \
                 We'll notify you when {PRODUCT_NAME} launches."
            ))
            .send();
        }
        InsertOutcome::Inserted => {
            tracing::info!("new subscriber saved");
            send_welcome_email(pool, email_client, &new_sub, base_url).await;
            FlashMessage::success(format!(
                "Success! Thanks {name}! We'll notify you at {} when {PRODUCT_NAME} launches.",
                new_sub.email
            ))
            .send();
        }
    }

    Ok(redirect("/"))
}
