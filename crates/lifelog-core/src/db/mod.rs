//! Database layer for Lifelog

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{find_owned, list_owned, owner_of, RecordStore};
