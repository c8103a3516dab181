use clap::Parser as _;
use movies_cli::{config::CliConfig, run::run};
use movies_dal::{MovieStore, StoreOptions};

fn database_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}", dir.path().join("movies.db").display())
}

async fn run_cmd(args: &[&str]) -> anyhow::Result<()> {
    let config = CliConfig::try_parse_from(args)?;
    run(config).await
}

#[tokio::test]
async fn test_add_update_delete() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);

    run_cmd(&[
        "movies-cli",
        "add",
        "--database-url",
        &url,
        "-t",
        "Dune",
        "-d",
        "Villeneuve",
        "-s",
        "...",
        "-g",
        "sci-fi",
    ])
    .await
    .unwrap();
    run_cmd(&["movies-cli", "get", "--database-url", &url, "1"])
        .await
        .unwrap();
    run_cmd(&["movies-cli", "get", "--database-url", &url, "--short", "1"])
        .await
        .unwrap();

    let store = MovieStore::connect(StoreOptions::new(url.clone()))
        .await
        .unwrap();
    let movie = store.get_by_id(1).await.unwrap();
    assert_eq!(movie.title, "Dune");
    assert_eq!(movie.director, "Villeneuve");
    assert_eq!(movie.genres, vec!["sci-fi".to_string()]);
    store.close().await;

    run_cmd(&[
        "movies-cli",
        "update",
        "--database-url",
        &url,
        "1",
        "-t",
        "Dune: Part One",
        "-d",
        "Villeneuve",
    ])
    .await
    .unwrap();

    let store = MovieStore::connect(StoreOptions::new(url.clone()))
        .await
        .unwrap();
    let movie = store.get_by_id(1).await.unwrap();
    assert_eq!(movie.title, "Dune: Part One");
    assert!(movie.genres.is_empty());
    store.close().await;

    run_cmd(&["movies-cli", "delete", "--database-url", &url, "1"])
        .await
        .unwrap();
    let res = run_cmd(&["movies-cli", "get", "--database-url", &url, "1"]).await;
    assert!(res.is_err());
    // deleting again is fine
    run_cmd(&["movies-cli", "delete", "--database-url", &url, "1"])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_delete_key() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);
    let res = run_cmd(&["movies-cli", "delete", "--database-url", &url, "abc"]).await;
    let err = res.unwrap_err();
    assert!(err.to_string().contains("Invalid key"));
}
