//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    ask::AskArgs, chat::ChatArgs, index::IndexArgs, init::InitArgs, plan::PlanArgs,
    search::SearchArgs,
};

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "codecanvas")]
#[command(about = "Codecanvas - reasoning chat assistant with a running code artifact", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (replaces .codecanvas/config.yaml and local.yaml)
    #[arg(long, global = true, env = "CODECANVAS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize codecanvas configuration and vector store
    Init(InitArgs),

    /// Answer a single query, optionally proposing code
    Ask(AskArgs),

    /// Interactive session with a running code artifact
    Chat(ChatArgs),

    /// Add text files to the knowledge base
    Index(IndexArgs),

    /// Search the knowledge base
    Search(SearchArgs),

    /// Break a request into smaller subqueries
    Plan(PlanArgs),
}
