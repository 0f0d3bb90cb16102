pub mod errors;
pub mod event;
pub mod notification;
