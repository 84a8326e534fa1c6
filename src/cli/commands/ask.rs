//! Implementation of the `codecanvas ask` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::{artifact_code, read_code_file};
use crate::cli::output::progress::{spinner_for, ProgressBarExt};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Complexity, Config, SynthesisPath};
use crate::infrastructure::setup::Runtime;
use crate::services::QueryOrchestrator;

/// Arguments of `codecanvas ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question or request
    pub query: String,

    /// Current code artifact
    #[arg(long, short)]
    pub code: Option<PathBuf>,

    /// Earlier conversation, one line per message
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Skip the code synthesis step
    #[arg(long)]
    pub no_code: bool,

    /// Write a non-empty code proposal back to the --code file
    #[arg(long, requires = "code")]
    pub apply: bool,
}

/// Answer to a single query.
#[derive(Debug, Serialize)]
pub struct AskOutput {
    /// Classification of the query
    pub complexity: Complexity,
    /// Direct answer
    pub final_answer: String,
    /// Raw chain-of-thought text
    pub reasoning_trace: Vec<String>,
    /// Code step result, absent with `--no-code`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeOutput>,
}

/// Code proposed for the turn.
#[derive(Debug, Serialize)]
pub struct CodeOutput {
    /// Fresh or modification path
    pub path: SynthesisPath,
    /// Normalized proposal, fenced
    pub code: String,
    /// Whether the proposal was written to the code file
    pub applied: bool,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("[{}]", self.complexity),
            self.final_answer.clone(),
        ];
        if let Some(code) = &self.code {
            if code.code.trim().is_empty() {
                lines.push(format!("\nNo code change ({}).", code.path));
            } else {
                lines.push(format!("\nProposed code ({}):", code.path));
                lines.push(code.code.clone());
                if code.applied {
                    lines.push("\nWritten back to the code file.".to_string());
                }
            }
        }
        lines.join("\n")
    }
}

/// Run `codecanvas ask`.
pub async fn execute(args: AskArgs, config: &Config, json_mode: bool) -> Result<()> {
    let runtime = Runtime::build(config).await?;
    let output_data = answer(&runtime.orchestrator, &args, json_mode).await?;
    output(&output_data, json_mode);
    Ok(())
}

/// Run one turn for `args` and, unless disabled, the code synthesis step.
pub async fn answer(
    orchestrator: &QueryOrchestrator,
    args: &AskArgs,
    json_mode: bool,
) -> Result<AskOutput> {
    let code = read_code_file(args.code.as_deref()).await?;
    let history = match &args.history {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read history file {}", path.display()))?
            .lines()
            .map(ToString::to_string)
            .collect(),
        None => Vec::new(),
    };

    let spinner = spinner_for(json_mode, "Thinking...");
    let outcome = orchestrator
        .process_query(&args.query, &history, Some(&code))
        .await;
    spinner.finish_success(format!("Answered ({})", outcome.complexity));

    let code_output = if args.no_code {
        None
    } else {
        let spinner = spinner_for(json_mode, "Writing code...");
        let proposal = orchestrator.synthesize_code(&args.query, &outcome, &code).await;
        spinner.finish_success(format!("Code step finished ({})", proposal.path));

        let mut applied = false;
        if args.apply && !proposal.is_empty() {
            if let Some(path) = &args.code {
                tokio::fs::write(path, artifact_code(&proposal))
                    .await
                    .with_context(|| format!("Failed to write code file {}", path.display()))?;
                applied = true;
            }
        }
        Some(CodeOutput {
            path: proposal.path,
            code: proposal.code,
            applied,
        })
    };

    Ok(AskOutput {
        complexity: outcome.complexity,
        final_answer: outcome.final_answer,
        reasoning_trace: outcome.reasoning_trace,
        code: code_output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generation::ScriptedBackend;
    use std::sync::Arc;

    async fn runtime(dir: &tempfile::TempDir, backend: Arc<ScriptedBackend>) -> Runtime {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 1;
        config.retry.max_backoff_ms = 1;
        config.vector_store.path = dir.path().join("index.db").to_string_lossy().into_owned();
        Runtime::with_backend(&config, backend).await.unwrap()
    }

    fn args(query: &str) -> AskArgs {
        AskArgs {
            query: query.to_string(),
            code: None,
            history: None,
            no_code: true,
            apply: false,
        }
    }

    #[tokio::test]
    async fn test_answer_without_code_step() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::with_fallback("simple"));
        let runtime = runtime(&dir, Arc::clone(&backend)).await;

        let result = answer(&runtime.orchestrator, &args("What is 2+2?"), true)
            .await
            .unwrap();

        assert_eq!(result.complexity, Complexity::Simple);
        assert_eq!(result.reasoning_trace.len(), 1);
        assert!(result.code.is_none());
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_apply_writes_proposal() {
        let dir = tempfile::tempdir().unwrap();
        let code_path = dir.path().join("main.py");
        std::fs::write(&code_path, "print('old')\n").unwrap();
        let backend = Arc::new(ScriptedBackend::with_fallback(
            "```python\nprint('new')\n```",
        ));
        let runtime = runtime(&dir, backend).await;

        let mut ask = args("Print something new");
        ask.code = Some(code_path.clone());
        ask.no_code = false;
        ask.apply = true;

        let result = answer(&runtime.orchestrator, &ask, true).await.unwrap();

        let code = result.code.unwrap();
        assert_eq!(code.path, SynthesisPath::Modification);
        assert!(code.applied);
        let written = std::fs::read_to_string(&code_path).unwrap();
        assert!(!written.starts_with("```"), "file must hold source, not markdown");
        assert!(!written.contains("```"));
        assert!(written.contains("print('new')"));
        assert!(code.code.starts_with("```python"));
    }
}
