//! Command-line interface for jspace.

use clap::{Parser, Subcommand};

/// JSpace - learn to code by flying a spaceship
#[derive(Parser, Debug)]
#[command(name = "jspace")]
#[command(about = "Coding exercise game with a tokenizer-backed task checker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "jspace.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Player name (overrides the config file)
        #[arg(short, long)]
        name: Option<String>,

        /// Backend URL for tokenizing and highscores. Local when absent.
        #[arg(long)]
        server_url: Option<String>,
    },

    /// Run the HTTP backend
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Highscore database (overrides the config file)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Print the token stream of some source as JSON
    Tokenize {
        /// Source text to tokenize
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        source: Option<String>,

        /// Read the source from a file instead
        #[arg(short, long)]
        file: Option<std::path::PathBuf>,
    },

    /// Forget saved progress
    Reset,
}
