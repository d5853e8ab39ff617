use serde::Serialize;

/// Derived counts for the dashboard; computed on every request, never stored
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Active rows in `email_subscribers`
    pub total_subscribers: i64,
    /// All rows in `notifications_sent`, successful or not
    pub total_notifications: i64,
}
