//! SQLite persistence for the ECN super-condition analyzer: connection
//! management, migrations, observation and run queries, margin windows,
//! and the collaborator implementations the driver consumes.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;
pub mod window;

pub use connection::DatabaseManager;
pub use store::{SqliteObservationSink, SqliteObservationSource, SqliteWindowSource};
