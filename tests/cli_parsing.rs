use clap::Parser;
use std::path::PathBuf;

use codecanvas::cli::{Cli, Commands};

#[test]
fn test_parse_ask_with_code_and_apply() {
    let cli = Cli::try_parse_from([
        "codecanvas",
        "ask",
        "Add error handling",
        "--code",
        "main.py",
        "--apply",
    ])
    .unwrap();

    match cli.command {
        Commands::Ask(args) => {
            assert_eq!(args.query, "Add error handling");
            assert_eq!(args.code, Some(PathBuf::from("main.py")));
            assert!(args.apply);
            assert!(!args.no_code);
        }
        other => panic!("Wrong top-level command: {other:?}"),
    }
}

#[test]
fn test_apply_requires_code() {
    assert!(Cli::try_parse_from(["codecanvas", "ask", "question", "--apply"]).is_err());
}

#[test]
fn test_parse_index_multiple_paths() {
    let cli = Cli::try_parse_from([
        "codecanvas",
        "index",
        "docs/a.md",
        "docs/b.md",
        "--chunk-size",
        "500",
    ])
    .unwrap();

    match cli.command {
        Commands::Index(args) => {
            assert_eq!(args.paths.len(), 2);
            assert_eq!(args.chunk_size, 500);
        }
        other => panic!("Wrong top-level command: {other:?}"),
    }
}

#[test]
fn test_parse_index_default_chunk_size() {
    let cli = Cli::try_parse_from(["codecanvas", "index", "notes.txt"]).unwrap();
    match cli.command {
        Commands::Index(args) => assert_eq!(args.chunk_size, 1000),
        other => panic!("Wrong top-level command: {other:?}"),
    }
}

#[test]
fn test_parse_search_k() {
    let cli = Cli::try_parse_from(["codecanvas", "--json", "search", "closures", "-k", "5"]).unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.query, "closures");
            assert_eq!(args.k, 5);
        }
        other => panic!("Wrong top-level command: {other:?}"),
    }
}

#[test]
fn test_parse_init_defaults() {
    let cli = Cli::try_parse_from(["codecanvas", "init"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert!(!args.force);
            assert_eq!(args.path, PathBuf::from("."));
        }
        other => panic!("Wrong top-level command: {other:?}"),
    }
}

#[test]
fn test_parse_chat_and_plan() {
    let cli = Cli::try_parse_from(["codecanvas", "chat", "--code", "app.rs"]).unwrap();
    assert!(matches!(cli.command, Commands::Chat(ref args) if args.code.is_some()));

    let cli = Cli::try_parse_from(["codecanvas", "plan", "build a todo app"]).unwrap();
    assert!(matches!(cli.command, Commands::Plan(ref args) if args.query == "build a todo app"));
}

#[test]
fn test_unknown_command_fails() {
    assert!(Cli::try_parse_from(["codecanvas", "task", "list"]).is_err());
}
