use clap::Parser;
use movies_types::config::StoreConfig;

use crate::commands::{Executor, MovieArgs, open_store};

#[derive(Parser, Debug)]
pub struct UpdateCmd {
    #[command(flatten)]
    store: StoreConfig,
    #[arg(help = "Movie id, overrides id from JSON input, if missing new id is assigned")]
    id: Option<i64>,
    #[command(flatten)]
    movie: MovieArgs,
}

impl Executor for UpdateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let mut movie = self.movie.into_movie()?;
        if let Some(id) = self.id {
            movie.id = Some(id);
        }
        let store = open_store(&self.store).await?;
        let res = store.update(&movie).await;
        store.close().await;
        println!("{}", res?);
        Ok(())
    }
}
