use htmlescape::encode_minimal;

use super::NotificationKind;
use super::SubscriberName;

/// Shown in page headers and baked into the fixed welcome/launch messages.
pub const PRODUCT_NAME: &str = "CampusConnect";

/// A notification that can be delivered to any number of subscribers. Each
/// delivery is logged as one row in `notifications_sent`, carrying `kind`,
/// `title` and `content` verbatim.
#[derive(Debug, Clone)]
pub struct Broadcast {
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
}

impl Broadcast {
    /// Custom update written by an admin. Both fields are required; a
    /// whitespace-only field counts as missing.
    pub fn update(
        title: String,
        content: String,
    ) -> Result<Self, String> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err("Please fill in both title and content for the update.".to_string());
        }
        Ok(Self {
            kind: NotificationKind::Update,
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    /// Fixed message sent to every subscriber on launch day
    pub fn launch() -> Self {
        Self {
            kind: NotificationKind::Launch,
            title: format!("{PRODUCT_NAME} is live!"),
            content: format!(
                "The wait is over: {PRODUCT_NAME} is now live and available. \
                 Events, clubs, services and student tools, all in one place."
            ),
        }
    }

    /// Sent once, right after a visitor joins the waitlist
    pub fn welcome() -> Self {
        Self {
            kind: NotificationKind::Welcome,
            title: format!("Welcome to {PRODUCT_NAME}!"),
            content: format!("Thank you for subscribing to {PRODUCT_NAME} updates."),
        }
    }

    /// Plain text body. `greeting` is only used for the welcome email, where
    /// we know who we are talking to.
    pub fn text_body(
        &self,
        greeting: Option<&SubscriberName>,
        base_url: &str,
    ) -> String {
        let hello = match greeting {
            Some(name) => format!("Hi {},\n\n", name.as_ref()),
            None => String::new(),
        };
        format!(
            "{hello}{}\n\n\
             You are receiving this because you joined the {PRODUCT_NAME} waitlist at {base_url}.",
            self.content
        )
    }

    pub fn html_body(
        &self,
        greeting: Option<&SubscriberName>,
        base_url: &str,
    ) -> String {
        let hello = match greeting {
            Some(name) => format!("<p>Hi {},</p>", encode_minimal(name.as_ref())),
            None => String::new(),
        };
        format!(
            "<h1>{}</h1>{hello}<p>{}</p>\
             <p><small>You are receiving this because you joined the {PRODUCT_NAME} waitlist \
             at <a href=\"{base_url}\">{base_url}</a>.</small></p>",
            encode_minimal(&self.title),
            encode_minimal(&self.content),
        )
    }
}
