//! Infrastructure layer - database connection, migrations and probing.

mod db;
pub mod migrations;
mod probe;

pub use db::Database;
pub use migrations::Migrator;
pub use probe::{ConnectivityProbe, DatabaseInfo};

#[cfg(test)]
pub use probe::MockConnectivityProbe;
