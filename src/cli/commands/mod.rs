//! Command implementations.

pub mod ask;
pub mod chat;
pub mod index;
pub mod init;
pub mod plan;
pub mod search;

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::models::{CodeProposal, Config};
use crate::infrastructure::config::ConfigLoader;
use crate::services::fence;

/// Load configuration from an explicit file, or from the project in the
/// current directory.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
    .context("Failed to load configuration")
}

/// Read an optional code artifact from disk; a missing argument means empty.
pub async fn read_code_file(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read code file {}", path.display())),
        None => Ok(String::new()),
    }
}

/// Source text of a proposal as it goes into the editor or onto disk: the
/// fence is removed and the text ends with a newline.
pub fn artifact_code(proposal: &CodeProposal) -> String {
    let mut code = fence::single_body(&proposal.code);
    if !code.ends_with('\n') {
        code.push('\n');
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SynthesisPath;

    #[test]
    fn test_load_config_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Config file not found"));
    }

    #[test]
    fn test_artifact_code_drops_fence() {
        let proposal = CodeProposal {
            path: SynthesisPath::Modification,
            code: "```python\n\"\"\"\nDescription: d\n\"\"\"\nprint('new')\n```".to_string(),
        };

        let code = artifact_code(&proposal);
        assert!(!code.starts_with("```"));
        assert!(!code.contains("```"));
        assert!(code.contains("print('new')"));
        assert!(code.ends_with("print('new')\n"));
    }

    #[tokio::test]
    async fn test_read_code_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.py");
        std::fs::write(&path, "print('hi')\n").unwrap();

        assert_eq!(read_code_file(Some(&path)).await.unwrap(), "print('hi')\n");
        assert_eq!(read_code_file(None).await.unwrap(), "");
    }
}
