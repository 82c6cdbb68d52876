pub mod catalog;
pub mod db;
pub mod feeds;
pub mod models;
pub mod relations;
pub mod schema;
pub mod search_index;
pub mod users;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
