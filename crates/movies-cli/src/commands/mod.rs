pub mod add;
pub mod delete;
pub mod get;
pub mod update;

use std::{io::Read as _, path::PathBuf};

use anyhow::Context as _;
use clap::Args;
use movies_dal::{Movie, MovieKey, MovieStore, StoreOptions};
use movies_types::config::StoreConfig;
use tracing::debug;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

pub(crate) async fn open_store(config: &StoreConfig) -> anyhow::Result<MovieStore> {
    config.ensure_data_dir()?;
    let options = StoreOptions::from(config);
    debug!("Using database {}", options.url);
    let store = MovieStore::connect(options).await?;
    Ok(store)
}

/// Positional keys are parsed like typed ones, digits give a numeric key
pub(crate) fn parse_key(s: &str) -> Result<MovieKey, std::convert::Infallible> {
    s.parse()
}

#[derive(Args, Debug)]
pub struct MovieArgs {
    #[arg(
        long,
        help = "Read movie from JSON file, use - for stdin",
        conflicts_with_all = ["title", "director", "summary", "genres"]
    )]
    json: Option<PathBuf>,
    #[arg(short, long, required_unless_present = "json", help = "Movie title")]
    title: Option<String>,
    #[arg(short, long, required_unless_present = "json", help = "Movie director")]
    director: Option<String>,
    #[arg(short, long, help = "Short summary of the movie")]
    summary: Option<String>,
    #[arg(short, long = "genre", num_args = 0.., value_delimiter = ',', help = "Genres of the movie, comma separated or used multiple times")]
    genres: Vec<String>,
}

impl MovieArgs {
    pub fn into_movie(self) -> anyhow::Result<Movie> {
        match self.json {
            Some(path) => {
                let data = if path.as_os_str() == "-" {
                    let mut data = String::new();
                    std::io::stdin().read_to_string(&mut data)?;
                    data
                } else {
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("Cannot read {}", path.display()))?
                };
                let movie = serde_json::from_str(&data).context("Invalid movie JSON")?;
                Ok(movie)
            }
            None => Ok(Movie::new(
                self.title.unwrap_or_default(),
                self.director.unwrap_or_default(),
                self.summary.unwrap_or_default(),
                self.genres,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCmd {
        #[command(flatten)]
        movie: MovieArgs,
    }

    #[test]
    fn test_movie_args() {
        let cmd = TestCmd::try_parse_from([
            "test", "-t", "Dune", "-d", "Villeneuve", "-s", "...", "-g", "sci-fi,drama", "-g",
            "epic",
        ])
        .unwrap();
        let movie = cmd.movie.into_movie().unwrap();
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.director, "Villeneuve");
        assert_eq!(movie.genres, vec!["sci-fi", "drama", "epic"]);
        assert_eq!(movie.id, None);
    }

    #[test]
    fn test_movie_args_required() {
        assert!(TestCmd::try_parse_from(["test", "-t", "Dune"]).is_err());
        assert!(TestCmd::try_parse_from(["test", "--json", "movie.json", "-t", "Dune"]).is_err());
    }

    #[test]
    fn test_movie_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.json");
        std::fs::write(
            &path,
            r#"{"id": 3, "title":"Alien","director":"Scott","summary":"","genres":["horror"]}"#,
        )
        .unwrap();
        let cmd = TestCmd::try_parse_from(["test", "--json", path.to_str().unwrap()]).unwrap();
        let movie = cmd.movie.into_movie().unwrap();
        assert_eq!(movie.id, Some(3));
        assert_eq!(movie.title, "Alien");
    }
}
