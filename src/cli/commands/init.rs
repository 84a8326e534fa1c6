//! Implementation of the `codecanvas init` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::setup::{
    create_config_dir, create_config_file, open_vector_index, SetupPaths,
};

/// Arguments of `codecanvas init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Result of project initialization.
#[derive(Debug, Serialize)]
pub struct InitOutput {
    /// Always true when returned
    pub success: bool,
    /// Summary line
    pub message: String,
    /// Project root
    pub initialized_path: PathBuf,
    /// Whether `config.yaml` was (re)written
    pub config_written: bool,
    /// Resolved vector store path
    pub vector_store: PathBuf,
    /// Passages already in the store
    pub passages: i64,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!(
                "\nConfiguration written to {}",
                self.initialized_path.join(".codecanvas/config.yaml").display()
            ));
        }
        lines.push(format!(
            "Vector store at {} ({} passages)",
            self.vector_store.display(),
            self.passages
        ));
        lines.join("\n")
    }
}

/// Run `codecanvas init`.
pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let paths = SetupPaths::for_root(&target_path);
    let already_initialized = paths.is_initialized();

    create_config_dir(&paths)?;
    let config_written = create_config_file(&paths, args.force)?;

    let mut config = ConfigLoader::load_from_dir(&target_path)?;
    let vector_store = resolve_against(&target_path, &config.vector_store.path);
    config.vector_store.path = vector_store.to_string_lossy().into_owned();

    let index = open_vector_index(&config).await?;
    let passages = index.count().await.context("Failed to read vector store")?;

    let message = match (already_initialized, config_written) {
        (false, _) => "Project initialized successfully.",
        (true, true) => "Project reinitialized successfully.",
        (true, false) => "Project already initialized. Use --force to overwrite the configuration.",
    };

    let output_data = InitOutput {
        success: true,
        message: message.to_string(),
        initialized_path: target_path,
        config_written,
        vector_store,
        passages,
    };

    output(&output_data, json_mode);
    Ok(())
}

fn resolve_against(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
