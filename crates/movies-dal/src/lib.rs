pub mod error;
pub mod movie;
mod schema;
pub mod store;

pub use error::{Error, OpenError, Operation};
pub use movie::{Movie, MovieKey, MovieRepository, MovieRepositoryImpl, MovieSummary};
pub use movies_types::SCHEMA_VERSION;
pub use sqlx::Error as SqlxError;
pub use store::{MovieStore, StoreOptions};

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;
