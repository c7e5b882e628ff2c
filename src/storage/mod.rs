mod categories;
mod countries;
mod feeds;
mod import;
mod schema;
mod types;

pub use schema::Database;
pub use types::{
    Category, Country, DatabaseError, ImportDefaults, ImportError, ImportSummary, NewFeed,
    StoredFeed,
};
