// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Every global option can also come from an environment variable, so the
// server can be configured entirely through its environment when it runs
// in a container.
//
//   gist-search serve --bind 0.0.0.0:9876
//   gist-search search octocat "import requests" --json
// =============================================================================

use crate::gist::{ClientConfig, SessionOptions, DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_PER_PAGE};
use crate::search::DEFAULT_GIST_URL;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "gist-search",
    version,
    about = "Search a GitHub user's public gists with a regular expression",
    long_about = "gist-search lists every public gist of a GitHub user, fetches each one and reports \
                  the gists that have a file whose content matches a regular expression. \
                  It runs as a small HTTP service or as a one-shot command."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by all subcommands
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Base URL of the GitHub REST API
    #[arg(long, global = true, env = "GIST_SEARCH_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Base URL used to build the returned gist links
    #[arg(long, global = true, env = "GIST_SEARCH_GIST_URL", default_value = DEFAULT_GIST_URL)]
    pub gist_url: String,

    /// GitHub token, raises the API rate limit when set
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Gists requested per listing page (GitHub allows up to 100)
    #[arg(
        long,
        global = true,
        env = "GIST_SEARCH_PER_PAGE",
        default_value_t = DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub per_page: u32,

    /// Timeout for each request to GitHub, in seconds (at least 1)
    #[arg(
        long,
        global = true,
        env = "GIST_SEARCH_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Maximum number of gists fetched in parallel during one search
    #[arg(
        long,
        global = true,
        env = "GIST_SEARCH_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = parse_concurrency
    )]
    pub concurrency: usize,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, env = "GIST_SEARCH_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl GlobalOpts {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            per_page: self.per_page,
            concurrency: self.concurrency,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    ///
    /// Example: gist-search serve --bind 127.0.0.1:9876
    Serve {
        /// Address to listen on
        #[arg(long, env = "GIST_SEARCH_BIND", default_value = "0.0.0.0:9876")]
        bind: SocketAddr,
    },

    /// Search one user's gists and print the matches
    ///
    /// Example: gist-search search octocat "import requests"
    Search {
        /// GitHub username
        username: String,

        /// Regular expression, matched at the start of each file
        pattern: String,

        /// Output results in JSON format instead of a list
        #[arg(long)]
        json: bool,

        /// Fail instead of stopping early when GitHub refuses a listing page
        #[arg(long)]
        strict: bool,
    },
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
