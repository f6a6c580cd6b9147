//! JSpace - command-line entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jspace::cli::{Cli, Command};
use jspace::{
    Console, FileStore, GameSession, HighscoreRepository, HttpScoreboard, HttpTokenizer,
    JspaceConfig, LocalTokenizer, PersistenceGateway, ScoreSink, SqliteScoreboard, TokenSource,
};
use jspace_tasks::TaskCatalog;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,jspace=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = JspaceConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Play { name, server_url } => {
            run_play(config.with_overrides(name, server_url)).await
        }
        Command::Serve {
            port,
            host,
            db_path,
        } => {
            let db_path = db_path.unwrap_or_else(|| config.database_path().clone());
            jspace::server::serve(host, port, db_path).await
        }
        Command::Tokenize { source, file } => run_tokenize(source, file),
        Command::Reset => run_reset(&config),
    }
}

/// Plays in the terminal.
#[instrument(skip(config), fields(player = %config.player_name()))]
async fn run_play(config: JspaceConfig) -> Result<()> {
    let (tokenizer, scoreboard): (Arc<dyn TokenSource>, Arc<dyn ScoreSink>) =
        match config.server_url() {
            Some(url) => {
                info!(url = %url, "Using remote backend");
                (
                    Arc::new(HttpTokenizer::new(url.clone())),
                    Arc::new(HttpScoreboard::new(url.clone())),
                )
            }
            None => {
                let repository = HighscoreRepository::new(config.database_path().clone())
                    .context("Failed to open highscore database")?;
                (Arc::new(LocalTokenizer), Arc::new(SqliteScoreboard::new(repository)))
            }
        };

    let mut session = GameSession::new(
        TaskCatalog::standard(),
        config.player_name(),
        tokenizer,
        Box::new(FileStore::new(config.storage_path())),
        scoreboard,
    );

    let console = Console::new();
    let outcome = session.start(console.ports());
    for fault in outcome.faults() {
        warn!(%fault, "Problem while starting");
    }
    println!(
        "Type your code, finish with an empty line. Commands: {}, {}, {}",
        jspace::NEXT_COMMAND,
        jspace::TOKENS_COMMAND,
        jspace::QUIT_COMMAND
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console.run(&mut session, stdin).await
}

/// Prints the token stream as JSON.
#[instrument]
fn run_tokenize(source: Option<String>, file: Option<std::path::PathBuf>) -> Result<()> {
    let source = match (source, file) {
        (_, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (Some(source), None) => source,
        (None, None) => String::new(),
    };
    let tokens = jspace_tasks::tokenize(&source);
    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(())
}

/// Clears saved progress.
#[instrument(skip(config))]
fn run_reset(config: &JspaceConfig) -> Result<()> {
    FileStore::new(config.storage_path()).reset()?;
    println!("Progress cleared.");
    Ok(())
}
