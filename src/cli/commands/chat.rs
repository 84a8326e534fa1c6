//! Implementation of the `codecanvas chat` command.
//!
//! The session owns the conversation history and the current code artifact
//! and hands copies to the orchestrator on every turn.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::commands::{artifact_code, read_code_file};
use crate::cli::output::progress::{spinner_for, ProgressBarExt};
use crate::domain::models::Config;
use crate::infrastructure::setup::Runtime;
use crate::services::QueryOrchestrator;

const HELP: &str = "Commands:
  /code           show the current code
  /load <file>    replace the code with a file's content
  /save <file>    write the code to a file
  /plan <text>    break a request into subqueries
  /reset          clear history and code
  /quit           leave the session";

/// Arguments of `codecanvas chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Start with this file as the code artifact
    #[arg(long, short)]
    pub code: Option<PathBuf>,
}

/// What the REPL should do after a line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// Print this text and keep reading.
    Continue(String),
    /// Leave the session.
    Quit,
}

/// Host-side state of an interactive session.
#[derive(Debug, Default)]
pub struct ChatSession {
    history: Vec<String>,
    code: String,
}

impl ChatSession {
    /// Session starting from `code` with an empty history.
    pub fn new(code: String) -> Self {
        Self {
            history: Vec::new(),
            code,
        }
    }

    /// Transcript lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Current code artifact.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Handle one input line: a slash command or a user turn.
    pub async fn handle_line(
        &mut self,
        orchestrator: &QueryOrchestrator,
        line: &str,
        show_progress: bool,
    ) -> Result<ChatReply> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ChatReply::Continue(String::new()));
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let reply = match command {
            "/quit" | "/exit" => return Ok(ChatReply::Quit),
            "/help" => HELP.to_string(),
            "/code" => {
                if self.code.trim().is_empty() {
                    "(no code yet)".to_string()
                } else {
                    self.code.clone()
                }
            }
            "/load" => {
                let path = required_path(rest, "/load")?;
                self.code = read_code_file(Some(&path)).await?;
                format!("Loaded {}", path.display())
            }
            "/save" => {
                let path = required_path(rest, "/save")?;
                tokio::fs::write(&path, &self.code)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                format!("Saved code to {}", path.display())
            }
            "/plan" => {
                if rest.is_empty() {
                    "Usage: /plan <text>".to_string()
                } else {
                    let subqueries = orchestrator.decompose(rest).await;
                    if subqueries.is_empty() {
                        "No subqueries produced.".to_string()
                    } else {
                        subqueries
                            .iter()
                            .enumerate()
                            .map(|(n, subquery)| format!("{}. {subquery}", n + 1))
                            .collect::<Vec<_>>()
                            .join("\n")
                    }
                }
            }
            "/reset" => {
                self.history.clear();
                self.code.clear();
                "Session cleared.".to_string()
            }
            other if other.starts_with('/') => format!("Unknown command {other}. Type /help."),
            _ => self.turn(orchestrator, line, show_progress).await,
        };

        Ok(ChatReply::Continue(reply))
    }

    async fn turn(&mut self, orchestrator: &QueryOrchestrator, query: &str, show_progress: bool) -> String {
        self.history.push(format!("User: {query}"));

        let spinner = spinner_for(!show_progress, "Thinking...");
        let outcome = orchestrator
            .process_query(query, &self.history, Some(&self.code))
            .await;
        spinner.finish_and_clear();

        self.history
            .extend(outcome.final_answer.lines().map(|line| format!("Assistant: {line}")));

        let spinner = spinner_for(!show_progress, "Updating code...");
        let proposal = orchestrator
            .synthesize_code(query, &outcome, &self.code)
            .await;

        let mut reply = outcome.final_answer.clone();
        if proposal.is_empty() {
            spinner.finish_and_clear();
        } else {
            spinner.finish_success(format!("Code updated ({})", proposal.path));
            self.code = artifact_code(&proposal);
            reply.push_str("\n\n(code updated, /code to show it)");
        }
        reply
    }
}

fn required_path(rest: &str, command: &str) -> Result<PathBuf> {
    if rest.is_empty() {
        anyhow::bail!("Usage: {command} <file>");
    }
    Ok(PathBuf::from(rest))
}

/// Run the interactive session on stdin.
pub async fn execute(args: ChatArgs, config: &Config, json_mode: bool) -> Result<()> {
    let runtime = Runtime::build(config).await?;
    let code = read_code_file(args.code.as_deref()).await?;
    let mut session = ChatSession::new(code);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{} ({} passages indexed). Type /help for commands.",
        style("codecanvas chat").bold(),
        runtime.index.count().await.unwrap_or(0)
    );

    loop {
        stdout.write_all(style("> ").cyan().to_string().as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match session
            .handle_line(&runtime.orchestrator, &line, !json_mode)
            .await
        {
            Ok(ChatReply::Continue(text)) if text.is_empty() => {}
            Ok(ChatReply::Continue(text)) => println!("{text}"),
            Ok(ChatReply::Quit) => break,
            Err(err) => eprintln!("{} {err:#}", style("Error:").red()),
        }
    }

    Ok(())
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

    #[tokio::test]
    async fn test_turn_updates_history_and_code() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::with_fallback("```python\nx = 1\n```"));
        let runtime = runtime(&dir, backend).await;
        let mut session = ChatSession::default();

        let reply = session
            .handle_line(&runtime.orchestrator, "Set x to one", false)
            .await
            .unwrap();

        assert!(matches!(reply, ChatReply::Continue(text) if text.contains("code updated")));
        assert_eq!(session.history()[0], "User: Set x to one");
        assert!(session.history()[1].starts_with("Assistant: "));
        assert!(session.code().contains("x = 1"));
        assert!(!session.code().starts_with("```"));

        let saved = dir.path().join("saved.py");
        session
            .handle_line(&runtime.orchestrator, &format!("/save {}", saved.display()), false)
            .await
            .unwrap();
        let written = std::fs::read_to_string(&saved).unwrap();
        assert_eq!(written, session.code());
        assert!(!written.contains("```"));
    }

    #[tokio::test]
    async fn test_slash_commands() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::with_fallback("- read input\n- print it"));
        let runtime = runtime(&dir, backend).await;
        let code_path = dir.path().join("code.py");
        std::fs::write(&code_path, "print(1)\n").unwrap();
        let mut session = ChatSession::default();
        let orchestrator = &runtime.orchestrator;

        let load = format!("/load {}", code_path.display());
        session.handle_line(orchestrator, &load, false).await.unwrap();
        assert_eq!(session.code(), "print(1)\n");

        let reply = session.handle_line(orchestrator, "/plan echo", false).await.unwrap();
        assert_eq!(
            reply,
            ChatReply::Continue("1. read input\n2. print it".to_string())
        );

        session.handle_line(orchestrator, "/reset", false).await.unwrap();
        assert!(session.code().is_empty());
        assert!(session.history().is_empty());

        assert_eq!(
            session.handle_line(orchestrator, "/quit", false).await.unwrap(),
            ChatReply::Quit
        );
        assert!(session.handle_line(orchestrator, "/save", false).await.is_err());
    }
}
