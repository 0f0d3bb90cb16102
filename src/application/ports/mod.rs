// src/application/ports/mod.rs
pub mod catalog;
pub mod directory;
pub mod ledger;
pub mod push;

pub use catalog::ArticleCatalog;
pub use directory::SubscriberDirectory;
pub use ledger::NotificationLedger;
pub use push::{PushError, PushGateway};
