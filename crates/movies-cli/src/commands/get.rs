use clap::Parser;
use movies_dal::MovieKey;
use movies_types::config::StoreConfig;

use crate::commands::{Executor, open_store, parse_key};

#[derive(Parser, Debug)]
pub struct GetCmd {
    #[command(flatten)]
    store: StoreConfig,
    #[arg(value_parser = parse_key, help = "Movie id")]
    id: MovieKey,
    #[arg(long, help = "Print only title and genres")]
    short: bool,
}

impl Executor for GetCmd {
    async fn run(self) -> anyhow::Result<()> {
        let store = open_store(&self.store).await?;
        let res = store.get_by_id(self.id).await;
        store.close().await;
        let movie = res?;
        let output = if self.short {
            serde_json::to_string_pretty(&movies_dal::MovieSummary::from(movie))?
        } else {
            serde_json::to_string_pretty(&movie)?
        };
        println!("{output}");
        Ok(())
    }
}
