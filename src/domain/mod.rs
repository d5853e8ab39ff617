mod broadcast;
mod new_subscriber;
mod notification_kind;
mod stats;
mod subscriber;
mod subscriber_email;
mod subscriber_name;
// allow external `use` statements to skip `new_subscriber` etc
pub use broadcast::Broadcast;
pub use broadcast::PRODUCT_NAME;
pub use new_subscriber::NewSubscriber;
pub use notification_kind::NotificationKind;
pub use stats::Stats;
pub use subscriber::Subscriber;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
