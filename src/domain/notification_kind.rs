use std::fmt::Display;

/// Value of the `type` column in `notifications_sent`. The table has a CHECK
/// constraint with the same three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Welcome,
    Update,
    Launch,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Welcome => "welcome",
            NotificationKind::Update => "update",
            NotificationKind::Launch => "launch",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
