//! Codecanvas CLI entry point.

use clap::Parser;

use codecanvas::cli::commands::{self, load_config};
use codecanvas::cli::{handle_error, Cli, Commands};
use codecanvas::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, cli.json).await,
        Commands::Ask(args) => commands::ask::execute(args, &config, cli.json).await,
        Commands::Chat(args) => commands::chat::execute(args, &config, cli.json).await,
        Commands::Index(args) => commands::index::execute(args, &config, cli.json).await,
        Commands::Search(args) => commands::search::execute(args, &config, cli.json).await,
        Commands::Plan(args) => commands::plan::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
