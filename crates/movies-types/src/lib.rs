pub mod config;

/// Name of the database, used as the file stem of the default database file
pub const DATABASE_NAME: &str = "MoviesDatabase";

/// Newest schema version this build knows how to open
pub const SCHEMA_VERSION: u32 = 1;
