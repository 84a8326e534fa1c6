//! Implementation of the `codecanvas plan` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::progress::{spinner_for, ProgressBarExt};
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::setup::Runtime;

/// Arguments of `codecanvas plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Request to break down
    pub query: String,
}

/// Subqueries of a request.
#[derive(Debug, Serialize)]
pub struct PlanOutput {
    /// Original request
    pub query: String,
    /// Subqueries in order
    pub subqueries: Vec<String>,
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        if self.subqueries.is_empty() {
            return "No subqueries produced.".to_string();
        }
        TableFormatter::new().format_subqueries(&self.subqueries)
    }
}

/// Run `codecanvas plan`.
pub async fn execute(args: PlanArgs, config: &Config, json_mode: bool) -> Result<()> {
    let runtime = Runtime::build(config).await?;

    let spinner = spinner_for(json_mode, "Planning...");
    let subqueries = runtime.orchestrator.decompose(&args.query).await;
    if subqueries.is_empty() {
        spinner.finish_warning("no subqueries");
    } else {
        spinner.finish_success(format!("{} subqueries", subqueries.len()));
    }

    output(
        &PlanOutput {
            query: args.query,
            subqueries,
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_output_json() {
        let out = PlanOutput {
            query: "build a parser".to_string(),
            subqueries: vec!["tokenize".to_string(), "parse".to_string()],
        };
        let json = out.to_json();
        assert_eq!(json["subqueries"][1], "parse");
        assert!(out.to_human().contains("tokenize"));
    }
}
