use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

/// A row of `email_subscribers`, as read back for the admin dashboard. Never
/// mutated after insert.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub email: String,
    pub first_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscriber {
    /// `M/D/YYYY`, e.g. "6/3/2025"
    pub fn subscribed_on(&self) -> String { self.created_at.format("%-m/%-d/%Y").to_string() }
}
