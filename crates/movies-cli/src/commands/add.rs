use clap::Parser;
use movies_types::config::StoreConfig;

use crate::commands::{Executor, MovieArgs, open_store};

#[derive(Parser, Debug)]
pub struct AddCmd {
    #[command(flatten)]
    store: StoreConfig,
    #[command(flatten)]
    movie: MovieArgs,
}

impl Executor for AddCmd {
    async fn run(self) -> anyhow::Result<()> {
        let movie = self.movie.into_movie()?;
        let store = open_store(&self.store).await?;
        let res = store.add(&movie).await;
        store.close().await;
        res?;
        Ok(())
    }
}
