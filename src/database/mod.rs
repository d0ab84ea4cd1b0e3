//! Database module providing organized access to all database operations
//!
//! - `connection`: pool construction, SQLite pragmas, migrations
//! - `coffees`: coffee queries, writes, and the cascading delete
//! - `brews`: brew queries joined with their coffee, and rating upkeep
//! - `introspection`: table descriptions for the debug endpoint
//! - `service`: `DatabaseService`, the single handle the rest of the crate holds

pub mod brews;
pub mod coffees;
pub mod connection;
pub mod introspection;
pub mod service;

pub use brews::{BrewOperations, BrewWriteOutcome};
pub use coffees::CoffeeOperations;
pub use connection::{DbConnection, DbPool, MIGRATIONS};
pub use introspection::IntrospectionOperations;
pub use service::DatabaseService;
