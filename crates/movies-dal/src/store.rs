use movies_types::config::StoreConfig;
use tokio::sync::OnceCell;
use tracing::{debug, error, trace};

use crate::{
    Error, Pool, SCHEMA_VERSION,
    error::Result,
    movie::{Movie, MovieKey, MovieRepository},
    schema,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub url: String,
    pub version: u32,
    pub max_connections: u32,
}

impl StoreOptions {
    pub fn new(url: impl Into<String>) -> Self {
        StoreOptions {
            url: url.into(),
            version: SCHEMA_VERSION,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        StoreOptions::new(config.database_url())
            .with_version(config.schema_version)
            .with_max_connections(config.max_connections)
    }
}

fn settle<T>(result: Result<T>, what: impl FnOnce() -> String) -> Result<T> {
    match &result {
        Ok(_) => trace!("settled ok: {}", what()),
        Err(e) => error!("settled error: {}: {e}", what()),
    }
    result
}

/// Movie store adapter, owns the database handle.
///
/// The handle is opened lazily by [`MovieStore::open`] and by all operations
/// except [`MovieStore::add`], which requires the store to be open already
/// and fails with [`Error::NotInitialized`] otherwise.
/// Each operation is a single request, there are no retries.
pub struct MovieStore {
    options: StoreOptions,
    handle: OnceCell<Pool>,
}

impl MovieStore {
    pub fn new(options: StoreOptions) -> Self {
        MovieStore {
            options,
            handle: OnceCell::new(),
        }
    }

    /// Creates store and opens it right away
    pub async fn connect(options: StoreOptions) -> Result<Self> {
        let store = MovieStore::new(options);
        store.open().await?;
        Ok(store)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Opens the database if not opened yet, concurrent callers share one open
    pub async fn open(&self) -> Result<&Pool> {
        let pool = self
            .handle
            .get_or_try_init(|| async {
                trace!("opening");
                schema::open(&self.options).await.map_err(Error::from)
            })
            .await?;
        if pool.is_closed() {
            return Err(Error::Closed);
        }
        Ok(pool)
    }

    /// Opened and not closed
    pub fn is_ready(&self) -> bool {
        self.handle.get().is_some_and(|pool| !pool.is_closed())
    }

    fn ready(&self) -> Result<&Pool> {
        match self.handle.get() {
            None => Err(Error::NotInitialized),
            Some(pool) if pool.is_closed() => Err(Error::Closed),
            Some(pool) => Ok(pool),
        }
    }

    fn repository(pool: &Pool) -> MovieRepository {
        trace!("transacting");
        MovieRepository::new(pool.clone())
    }

    /// Adds new movie, store assigns its id (any id in `movie` is ignored)
    pub async fn add(&self, movie: &Movie) -> Result<()> {
        let result = async {
            let pool = self.ready()?;
            trace!("requesting");
            let id = Self::repository(pool).insert(movie).await?;
            debug!("Added movie {} with id {id}", movie.title);
            Ok::<_, Error>(())
        }
        .await;
        settle(result, || format!("add movie {}", movie.title))
    }

    pub async fn get_by_id(&self, key: impl Into<MovieKey>) -> Result<Movie> {
        let key = key.into();
        debug!("Fetching movie with id: {key}");
        let result = async {
            let pool = self.open().await?;
            trace!("requesting");
            Self::repository(pool).get(&key).await
        }
        .await;
        settle(result, || format!("get movie {key}"))
    }

    /// Replaces movie with the same id or inserts it when there is none,
    /// returns the stored key
    pub async fn update(&self, movie: &Movie) -> Result<i64> {
        let result = async {
            let pool = self.open().await?;
            trace!("requesting");
            Self::repository(pool).put(movie).await
        }
        .await;
        settle(result, || format!("update movie {:?}", movie.id))
    }

    /// Deletes movie, string key is coerced to number, succeeds also when
    /// there was nothing to delete
    pub async fn delete_by_id(&self, key: impl Into<MovieKey>) -> Result<()> {
        let key = key.into();
        let result = async {
            let pool = self.open().await?;
            let Some(id) = key.numeric()? else {
                debug!("Key {key} cannot match any movie, nothing to delete");
                return Ok(());
            };
            debug!("Deleting movie with id: {id}");
            trace!("requesting");
            let deleted = Self::repository(pool).delete(id).await?;
            if deleted == 0 {
                debug!("No movie with id {id} to delete");
            }
            Ok::<_, Error>(())
        }
        .await;
        settle(result, || format!("delete movie {key}"))
    }

    /// Closes the database handle, the store cannot be reopened afterwards
    /// and all later operations fail with [`Error::Closed`]
    pub async fn close(&self) {
        if let Some(pool) = self.handle.get() {
            debug!("Closing database {}", self.options.url);
            pool.close().await;
        }
    }
}
