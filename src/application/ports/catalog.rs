use crate::domain::errors::DomainResult;
use crate::domain::notification::ArticleId;
use async_trait::async_trait;

/// Article lookup owned by the backend service. Only the display title is
/// needed here; a missing article degrades the message, it does not fail
/// the dispatch.
#[async_trait]
pub trait ArticleCatalog: Send + Sync {
    async fn title_of(&self, article_id: ArticleId) -> DomainResult<Option<String>>;
}
