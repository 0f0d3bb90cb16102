pub mod database;
pub mod push;
pub mod repositories;
