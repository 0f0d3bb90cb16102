// src/domain/event.rs
use crate::domain::notification::{ArticleId, AuthorId};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// One "article published" event, validated and ready for dispatch.
///
/// The transport delivers at least once, so the same event may show up
/// again after a crash or an unacknowledged delivery; downstream logic must
/// treat it as idempotent input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedArticleEvent {
    pub author_id: AuthorId,
    pub article_id: ArticleId,
}

/// Why an inbound payload could not become a [`PublishedArticleEvent`].
///
/// Both variants are permanent: retrying a malformed message cannot fix it,
/// so the consumer rejects without requeue either way.
#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("malformed event payload: {0}")]
    Malformed(String),
    #[error("invalid event schema: {0}")]
    Invalid(String),
}

/// Wire shape of the queue message. Field names are fixed by the publisher:
/// the article id travels as `post_id`.
#[derive(Debug, Deserialize)]
struct WireEvent {
    author_id: Uuid,
    post_id: Uuid,
}

impl PublishedArticleEvent {
    pub fn decode(body: &[u8]) -> Result<Self, EventDecodeError> {
        let wire: WireEvent = serde_json::from_slice(body)
            .map_err(|err| EventDecodeError::Malformed(err.to_string()))?;

        let author_id =
            AuthorId::new(wire.author_id).map_err(|err| EventDecodeError::Invalid(err.to_string()))?;
        let article_id =
            ArticleId::new(wire.post_id).map_err(|err| EventDecodeError::Invalid(err.to_string()))?;

        Ok(Self {
            author_id,
            article_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_payload() {
        let author = Uuid::new_v4();
        let article = Uuid::new_v4();
        let body = format!(r#"{{"author_id": "{author}", "post_id": "{article}"}}"#);

        let event = PublishedArticleEvent::decode(body.as_bytes()).unwrap();
        assert_eq!(Uuid::from(event.author_id), author);
        assert_eq!(Uuid::from(event.article_id), article);
    }

    #[test]
    fn rejects_invalid_json() {
        let err = PublishedArticleEvent::decode(b"not json at all").unwrap_err();
        assert!(matches!(err, EventDecodeError::Malformed(_)));
    }

    #[test]
    fn rejects_non_uuid_ids() {
        let body = br#"{"author_id": "not-a-uuid", "post_id": "also-not"}"#;
        let err = PublishedArticleEvent::decode(body).unwrap_err();
        assert!(matches!(err, EventDecodeError::Malformed(_)));
    }

    #[test]
    fn rejects_missing_fields() {
        let author = Uuid::new_v4();
        let body = format!(r#"{{"author_id": "{author}"}}"#);
        let err = PublishedArticleEvent::decode(body.as_bytes()).unwrap_err();
        assert!(matches!(err, EventDecodeError::Malformed(_)));
    }

    #[test]
    fn rejects_legacy_integer_ids() {
        // The older event schema used integer ids; it is not supported.
        let body = br#"{"author_id": 7, "post_id": 42}"#;
        let err = PublishedArticleEvent::decode(body).unwrap_err();
        assert!(matches!(err, EventDecodeError::Malformed(_)));
    }

    #[test]
    fn rejects_nil_ids() {
        let article = Uuid::new_v4();
        let body = format!(
            r#"{{"author_id": "00000000-0000-0000-0000-000000000000", "post_id": "{article}"}}"#
        );
        let err = PublishedArticleEvent::decode(body.as_bytes()).unwrap_err();
        assert!(matches!(err, EventDecodeError::Invalid(_)));
    }
}
