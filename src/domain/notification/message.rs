use crate::domain::notification::value_objects::AuthorId;
use std::fmt;

/// Text shown to a subscriber for one published article.
///
/// The article title is best-effort: when the lookup comes back empty the
/// message degrades to an untitled form instead of blocking the dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage(String);

impl NotificationMessage {
    pub fn compose(title: Option<&str>, author_id: AuthorId) -> Self {
        match title {
            Some(title) => Self(format!("New article '{title}' from author {author_id}")),
            None => Self(format!("New article from author {author_id}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
