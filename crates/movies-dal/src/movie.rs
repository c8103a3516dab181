use std::{convert::Infallible, fmt::Display, num::IntErrorKind, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{Pool, types::Json};
use tracing::debug;

use crate::{
    Error,
    error::{Operation, Result},
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Movie {
    /// Assigned by the store, absent on new records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub director: String,
    pub summary: String,
    #[sqlx(json)]
    pub genres: Vec<String>,
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        summary: impl Into<String>,
        genres: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Movie {
            id: None,
            title: title.into(),
            director: director.into(),
            summary: summary.into(),
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Projection used by list views
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MovieSummary {
    pub title: String,
    pub genres: Vec<String>,
}

impl From<Movie> for MovieSummary {
    fn from(movie: Movie) -> Self {
        MovieSummary {
            title: movie.title,
            genres: movie.genres,
        }
    }
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        MovieSummary {
            title: movie.title.clone(),
            genres: movie.genres.clone(),
        }
    }
}

/// Movie identifier as given by caller, either number or string.
///
/// Keys are typed: a `Text` key is looked up as text and will not match
/// numeric ids assigned by the store. Use [`MovieKey::numeric`] to coerce.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum MovieKey {
    Number(i64),
    Text(String),
}

fn radix_prefix(s: &str) -> Option<(u32, &str)> {
    [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| s.strip_prefix(prefix).map(|digits| (radix, digits)))
}

impl MovieKey {
    /// Coerces key to number the way numeric strings are read: surrounding
    /// whitespace is ignored, empty string is 0, `0x`/`0o`/`0b` prefixes,
    /// float notation and `Infinity` are accepted. Signs are not allowed
    /// with radix prefixes.
    ///
    /// Returns `Ok(None)` for numbers which can never be a stored id
    /// (fractional, infinite or out of range).
    pub fn numeric(&self) -> Result<Option<i64>> {
        let s = match self {
            MovieKey::Number(n) => return Ok(Some(*n)),
            MovieKey::Text(s) => s.trim(),
        };
        let invalid = || Error::InvalidKey(s.to_string());
        if s.is_empty() {
            return Ok(Some(0));
        }

        if let Some((radix, digits)) = radix_prefix(s) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return Err(invalid());
            }
            return match u64::from_str_radix(digits, radix) {
                Ok(n) => Ok(i64::try_from(n).ok()),
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(None),
                Err(_) => Err(invalid()),
            };
        }

        let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
        if unsigned == "Infinity" {
            return Ok(None);
        }
        // rejects spellings like inf or NaN which float parsing would accept
        if !unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        {
            return Err(invalid());
        }
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Some(n));
        }
        match s.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Ok(Some(f as i64))
            }
            Ok(_) => Ok(None),
            Err(_) => Err(invalid()),
        }
    }
}

impl Display for MovieKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieKey::Number(n) => write!(f, "{}", n),
            MovieKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for MovieKey {
    fn from(value: i64) -> Self {
        MovieKey::Number(value)
    }
}

impl From<i32> for MovieKey {
    fn from(value: i32) -> Self {
        MovieKey::Number(value.into())
    }
}

impl From<&str> for MovieKey {
    fn from(value: &str) -> Self {
        MovieKey::Text(value.to_string())
    }
}

impl From<String> for MovieKey {
    fn from(value: String) -> Self {
        MovieKey::Text(value)
    }
}

/// Parses user input, integers become `Number`, anything else `Text`
impl FromStr for MovieKey {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(MovieKey::Number)
            .unwrap_or_else(|_| MovieKey::Text(s.to_string())))
    }
}

const SELECT_BY_ID: &str = "SELECT id, title, director, summary, genres FROM movies WHERE id = ?";
// unary plus drops column affinity, so text key is compared as text
const SELECT_BY_TEXT_KEY: &str =
    "SELECT id, title, director, summary, genres FROM movies WHERE +id = ?";
const INSERT: &str = "INSERT INTO movies (title, director, summary, genres) VALUES (?, ?, ?, ?)";
const UPSERT: &str = r#"
    INSERT INTO movies (id, title, director, summary, genres) VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        title = excluded.title,
        director = excluded.director,
        summary = excluded.summary,
        genres = excluded.genres
    RETURNING id
"#;
const DELETE: &str = "DELETE FROM movies WHERE id = ?";

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

/// Single statement primitives over the `movies` table
pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Inserts new record, `id` of the movie is ignored, returns assigned key
    pub async fn insert(&self, movie: &Movie) -> Result<i64> {
        let result = sqlx::query(INSERT)
            .bind(&movie.title)
            .bind(&movie.director)
            .bind(&movie.summary)
            .bind(Json(&movie.genres))
            .execute(&self.executor)
            .await
            .map_err(Error::request(Operation::Add))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get(&self, key: &MovieKey) -> Result<Movie> {
        let query = match key {
            MovieKey::Number(id) => sqlx::query_as::<_, Movie>(SELECT_BY_ID).bind(*id),
            MovieKey::Text(text) => sqlx::query_as::<_, Movie>(SELECT_BY_TEXT_KEY).bind(text),
        };
        query
            .fetch_optional(&self.executor)
            .await
            .map_err(Error::request(Operation::Get))?
            .ok_or_else(|| Error::NotFound(key.clone()))
    }

    /// Replaces record with same `id` or inserts it, when `id` is missing
    /// the key is assigned by the store
    pub async fn put(&self, movie: &Movie) -> Result<i64> {
        match movie.id {
            Some(id) => {
                let id: i64 = sqlx::query_scalar(UPSERT)
                    .bind(id)
                    .bind(&movie.title)
                    .bind(&movie.director)
                    .bind(&movie.summary)
                    .bind(Json(&movie.genres))
                    .fetch_one(&self.executor)
                    .await
                    .map_err(Error::request(Operation::Put))?;
                Ok(id)
            }
            None => {
                debug!("Movie without id, store will assign new key");
                let result = sqlx::query(INSERT)
                    .bind(&movie.title)
                    .bind(&movie.director)
                    .bind(&movie.summary)
                    .bind(Json(&movie.genres))
                    .execute(&self.executor)
                    .await
                    .map_err(Error::request(Operation::Put))?;
                Ok(result.last_insert_rowid())
            }
        }
    }

    /// Returns number of removed records, 0 is not an error
    pub async fn delete(&self, id: i64) -> Result<u64> {
        let res = sqlx::query(DELETE)
            .bind(id)
            .execute(&self.executor)
            .await
            .map_err(Error::request(Operation::Delete))?;
        Ok(res.rows_affected())
    }
}
