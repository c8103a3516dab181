use clap::Parser;
use movies_dal::MovieKey;
use movies_types::config::StoreConfig;

use crate::commands::{Executor, open_store, parse_key};

#[derive(Parser, Debug)]
pub struct DeleteCmd {
    #[command(flatten)]
    store: StoreConfig,
    #[arg(value_parser = parse_key, help = "Movie id")]
    id: MovieKey,
}

impl Executor for DeleteCmd {
    async fn run(self) -> anyhow::Result<()> {
        let store = open_store(&self.store).await?;
        let res = store.delete_by_id(self.id).await;
        store.close().await;
        res?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_args() {
        let cmd =
            DeleteCmd::try_parse_from(["delete", "--database-url", "sqlite::memory:", "42"]).unwrap();
        assert_eq!(cmd.id, MovieKey::Number(42));
        let cmd = DeleteCmd::try_parse_from(["delete", "--database-url", "sqlite::memory:", "0x2a"])
            .unwrap();
        assert_eq!(cmd.id, MovieKey::Text("0x2a".into()));
    }
}
