//! Implementation of the `codecanvas search` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

use crate::adapters::logging::TracingLogger;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, RetrievedDocument};
use crate::domain::ports::VectorIndex;
use crate::infrastructure::setup::open_vector_index;
use crate::services::SimilarityRetriever;

/// Arguments of `codecanvas search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to search for
    pub query: String,

    /// Number of passages to return
    #[arg(short, long, default_value_t = 3)]
    pub k: usize,
}

/// Passages matching a query.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    /// Search text
    pub query: String,
    /// Nearest passages, closest first
    pub documents: Vec<RetrievedDocument>,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if self.documents.is_empty() {
            return "No matching passages.".to_string();
        }
        TableFormatter::new().format_documents(&self.documents)
    }
}

/// Run `codecanvas search`.
pub async fn execute(args: SearchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let index: Arc<dyn VectorIndex> = open_vector_index(config).await?;
    let retriever = SimilarityRetriever::new(index, Arc::new(TracingLogger::new()));

    let documents = retriever.search(&args.query, args.k).await;

    output(
        &SearchOutput {
            query: args.query,
            documents,
        },
        json_mode,
    );
    Ok(())
}
