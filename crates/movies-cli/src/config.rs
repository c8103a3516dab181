use clap::{Parser, Subcommand};

use crate::commands::{add::AddCmd, delete::DeleteCmd, get::GetCmd, update::UpdateCmd};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for movies - add, show, update and delete records in local movies database."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Add(AddCmd),
    Get(GetCmd),
    Update(UpdateCmd),
    Delete(DeleteCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Add(cmd) => cmd.run().await,
            Command::Get(cmd) => cmd.run().await,
            Command::Update(cmd) => cmd.run().await,
            Command::Delete(cmd) => cmd.run().await,
        }
    }
}
