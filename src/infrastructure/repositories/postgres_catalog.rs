// src/infrastructure/repositories/postgres_catalog.rs
use super::map_sqlx;
use crate::application::ports::ArticleCatalog;
use crate::domain::errors::DomainResult;
use crate::domain::notification::ArticleId;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Article title lookup against the backend service database.
#[derive(Clone)]
pub struct PostgresArticleCatalog {
    pool: PgPool,
}

impl PostgresArticleCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleCatalog for PostgresArticleCatalog {
    async fn title_of(&self, article_id: ArticleId) -> DomainResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT title FROM articles WHERE id = $1")
            .bind(Uuid::from(article_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }
}
