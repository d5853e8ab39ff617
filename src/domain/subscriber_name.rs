use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// The first name a visitor typed into the signup form.
///
/// Must be instantiated with `SubscriberName::parse`, which rejects
/// empty/whitespace names, names longer than 256 graphemes, and a handful of
/// characters that have no business in a name (`/()"<>\{}`). The field is
/// private so `parse` cannot be bypassed.
#[derive(Debug, Clone)]
pub struct SubscriberName(String);

impl SubscriberName {
    const MAX_GRAPHEMES: usize = 256;

    pub fn parse(name: String) -> Result<Self, String> {
        let name = name.trim().to_string();
        let bad_chars: HashSet<char> = r#"/()"<>\{}"#.chars().collect();

        if name.is_empty() {
            return Err("First name cannot be empty.".to_string());
        }
        if name.graphemes(true).count() > Self::MAX_GRAPHEMES {
            return Err(format!(
                "First name cannot be longer than {} characters.",
                Self::MAX_GRAPHEMES
            ));
        }
        match name.chars().find(|c| bad_chars.contains(c)) {
            Some(c) => Err(format!("First name cannot contain {c:?}.")),
            None => Ok(Self(name)),
        }
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str { &self.0 }
}
