// src/infrastructure/repositories/mod.rs
mod error;
mod postgres_catalog;
mod postgres_directory;
mod postgres_ledger;

use error::map_sqlx;

pub use postgres_catalog::PostgresArticleCatalog;
pub use postgres_directory::PostgresSubscriberDirectory;
pub use postgres_ledger::PostgresNotificationLedger;
