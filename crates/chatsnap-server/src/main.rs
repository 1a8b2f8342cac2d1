//! Chatsnap — capture a chat conversation as a JSON export and a context transcript.

use std::path::PathBuf;
use std::process::ExitCode;

use chatsnap_core::ChatsnapConfig;
use chatsnap_server::commands::{self, InitialPage, PopupAction};
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!("Chatsnap — chat conversation exporter");
    println!();
    println!("Usage: chatsnap [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Start the page host");
    println!("  serve [page.html] [--url <url>] Start the page host, optionally with a page loaded");
    println!("  extract <page.html> [--json <out>]");
    println!("                                  Print the transcript of a saved page");
    println!("  popup [show|copy|save] [--out <dir>]");
    println!("                                  Ask the running host for the active page's export");
    println!("  help                            Show this help message");
}

/// Value following `flag`, if present.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Arguments that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
        } else if arg.starts_with("--") {
            skip = true;
        } else {
            out.push(arg);
        }
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ChatsnapConfig::from_env();
    let command = args.first().map(String::as_str).unwrap_or("serve");
    let rest = if args.is_empty() { &args[..] } else { &args[1..] };

    match command {
        "serve" => {
            let initial = match positional(rest).first() {
                Some(path) => Some(InitialPage::from_file(
                    &PathBuf::from(path.as_str()),
                    flag_value(rest, "--url"),
                )?),
                None => None,
            };
            commands::serve(config, initial).await?;
            Ok(ExitCode::SUCCESS)
        }
        "extract" => {
            let Some(path) = positional(rest).first().map(|p| PathBuf::from(p.as_str())) else {
                eprintln!("Usage: chatsnap extract <page.html> [--json <out>]");
                return Ok(ExitCode::FAILURE);
            };
            let snapshot = commands::extract_file(&config, &path)?;
            if let Some(out) = flag_value(rest, "--json") {
                let body = serde_json::to_string_pretty(&snapshot.json)?;
                std::fs::write(&out, body)?;
                eprintln!("Wrote {}", out);
            }
            println!("{}", snapshot.transcript.unwrap_or_default());
            Ok(ExitCode::SUCCESS)
        }
        "popup" => {
            let name = positional(rest).first().map(|s| s.as_str()).unwrap_or("show");
            let Some(action) = PopupAction::parse(name) else {
                eprintln!("Unknown popup action: {}. Use show, copy or save.", name);
                return Ok(ExitCode::FAILURE);
            };
            let out_dir = flag_value(rest, "--out")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let produced = commands::popup(&config, action, out_dir).await?;
            Ok(if produced {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        "--help" | "-h" | "help" => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }
        other => {
            eprintln!("Unknown command: {}. Use 'chatsnap help' for usage.", other);
            Ok(ExitCode::FAILURE)
        }
    }
}
