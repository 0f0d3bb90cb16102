pub mod message;
pub mod value_objects;

pub use message::NotificationMessage;
pub use value_objects::{ArticleId, AuthorId, SubscriberId, SubscriptionKey};
