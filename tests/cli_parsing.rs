//! Tests for CLI subcommand parsing.

use std::path::PathBuf;

use clap::Parser;
use memento_damage::config::SEMAPHORE_LIMIT;
use memento_damage::{Cli, Command, LogFormat, LogLevel};

#[test]
fn test_compute_defaults() {
    let cli = Cli::try_parse_from([
        "memento_damage",
        "compute",
        "http://example.com/",
        "--cache-dir",
        "/tmp/cache",
    ])
    .expect("parse");

    assert!(matches!(cli.log_level, LogLevel::Info));
    assert!(matches!(cli.log_format, LogFormat::Plain));
    let Command::Compute(args) = cli.command else {
        panic!("expected compute");
    };
    assert_eq!(args.uri, "http://example.com/");
    assert_eq!(args.cache_dir, PathBuf::from("/tmp/cache"));
    assert!(args.background_color.is_none());
    assert!(!args.use_window_size);
    assert!(args.output.is_none());
}

#[test]
fn test_compute_with_options() {
    let cli = Cli::try_parse_from([
        "memento_damage",
        "compute",
        "http://example.com/",
        "--cache-dir",
        "cache",
        "--background-color",
        "EEEEEE",
        "--use-window-size",
        "--output",
        "result.json",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("parse");

    assert!(matches!(cli.log_level, LogLevel::Debug));
    assert!(matches!(cli.log_format, LogFormat::Json));
    let Command::Compute(args) = cli.command else {
        panic!("expected compute");
    };
    assert_eq!(args.background_color.as_deref(), Some("EEEEEE"));
    assert!(args.use_window_size);
    assert_eq!(args.output, Some(PathBuf::from("result.json")));
}

#[test]
fn test_batch_defaults() {
    let cli = Cli::try_parse_from([
        "memento_damage",
        "batch",
        "uris.txt",
        "--cache-dir",
        "cache",
    ])
    .expect("parse");

    let Command::Batch(args) = cli.command else {
        panic!("expected batch");
    };
    assert_eq!(args.file, PathBuf::from("uris.txt"));
    assert_eq!(args.background_color, "FFFFFF");
    assert_eq!(args.max_concurrency, SEMAPHORE_LIMIT);
    assert_eq!(args.timeout_seconds, 600);
}

#[test]
fn test_global_flags_before_subcommand() {
    let cli = Cli::try_parse_from([
        "memento_damage",
        "--log-level",
        "warn",
        "batch",
        "-",
        "--cache-dir",
        "cache",
        "--max-concurrency",
        "16",
    ])
    .expect("parse");

    assert!(matches!(cli.log_level, LogLevel::Warn));
    let Command::Batch(args) = cli.command else {
        panic!("expected batch");
    };
    assert_eq!(args.file, PathBuf::from("-"));
    assert_eq!(args.max_concurrency, 16);
}

#[test]
fn test_missing_cache_dir_is_rejected() {
    assert!(Cli::try_parse_from(["memento_damage", "compute", "http://example.com/"]).is_err());
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let result = Cli::try_parse_from([
        "memento_damage",
        "--log-level",
        "verbose",
        "compute",
        "http://example.com/",
        "--cache-dir",
        "cache",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["memento_damage", "scan", "uris.txt"]).is_err());
}
