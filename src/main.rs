// src/main.rs
// =============================================================================
// This is the entry point of gist-search.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and the GitHub gist client
// 3. Dispatch to the subcommand: run the HTTP service, or run one search
// 4. Exit with proper code (0 = success, 1 = no matches, 2 = error)
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use gist_search::cli::{Cli, Commands, GlobalOpts};
use gist_search::gist::{GistApi, GistSession, HttpGistClient};
use gist_search::{logging, search, server};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(&cli.global.log_level, cli.global.log_json);

    let client = HttpGistClient::new(cli.global.client_config())
        .context("failed to build the GitHub client")?;
    let api: Arc<dyn GistApi> = Arc::new(client);

    match cli.command {
        Commands::Serve { bind } => {
            let state = server::AppState {
                api,
                session: cli.global.session_options(),
                gist_base_url: cli.global.gist_url.clone(),
            };
            server::serve(bind, state).await?;
            Ok(0)
        }
        Commands::Search {
            username,
            pattern,
            json,
            strict,
        } => handle_search(api, &cli.global, &username, &pattern, json, strict).await,
    }
}

// Handles the 'search' subcommand
//
// Runs the same pipeline as POST /api/v1/search, but prints the result.
// Returns 1 when nothing matched so scripts can branch on it.
async fn handle_search(
    api: Arc<dyn GistApi>,
    global: &GlobalOpts,
    username: &str,
    pattern: &str,
    json: bool,
    strict: bool,
) -> Result<i32> {
    let mut session = GistSession::new(api, username, global.session_options());
    let matches = search::search(&mut session, pattern, !strict, &global.gist_url)
        .await
        .with_context(|| format!("search of {username}'s gists failed"))?;

    if json {
        let output = server::SearchResponse {
            status: "success",
            username: username.to_string(),
            pattern: pattern.to_string(),
            matches: matches.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_matches(username, &matches);
    }

    Ok(if matches.is_empty() { 1 } else { 0 })
}

fn print_matches(username: &str, matches: &[String]) {
    if matches.is_empty() {
        println!("No gists of {username} matched");
        return;
    }

    println!("{} matching gist(s) of {}:", matches.len(), username);
    for url in matches {
        println!("  {url}");
    }
}
