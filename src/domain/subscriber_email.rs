use std::fmt::Display;

use validator::ValidateEmail;

/// A syntactically valid email address. Used for subscribers (recipients) as
/// well as the configured sender.
///
/// Stored lowercased, so that the unique constraint on `email_subscribers`
/// treats `Ana@Campus.edu` and `ana@campus.edu` as the same subscriber.
/// Uniqueness itself is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        let email = email.trim().to_lowercase();
        match ValidateEmail::validate_email(&email) {
            true => Ok(Self(email)),
            false => Err(format!("{email:?} is not a valid email address.")),
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl Display for SubscriberEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
