use super::SubscriberEmail;
use super::SubscriberName;

/// A signup that has passed parsing, ready to be inserted into
/// `email_subscribers`. Consent is implied; a form without it never gets this
/// far.
#[derive(Debug)]
pub struct NewSubscriber {
    pub first_name: SubscriberName,
    pub email: SubscriberEmail,
}
