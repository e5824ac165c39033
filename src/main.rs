// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the ghcard binary.
//!
//! The CLI fetches profile card data for one user (`stats`, `top-langs`) or
//! for every entry of a YAML batch document (`batch`) and prints JSON on
//! stdout. Logs go to stderr and honour `RUST_LOG`.

use std::{io, path::PathBuf, process};

use clap::{ArgAction, Args, Parser, Subcommand};
use ghcard::{
    Error, ExponentialRank, FetchConfig, LanguageWeights, OctocrabExecutor, StatsOptions,
    fetch_stats, fetch_top_languages, load_requests, parse_flag, run_batch,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Command line interface for fetching GitHub profile card data.
#[derive(Debug, Parser,)]
#[command(name = "ghcard", version, about = "Fetch GitHub stats and top languages")]
struct Cli
{
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args,)]
struct GlobalArgs
{
    /// Personal access token used for the GitHub API.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String,>,

    /// Follow starred repository pages past the first one.
    #[arg(
        long = "multi-page-stars",
        env = "FETCH_MULTI_PAGE_STARS",
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = parse_flag_arg,
        default_value = "false",
        global = true
    )]
    multi_page_stars: bool,

    /// Attempts per API call, including the first. Overrides the batch
    /// document's `fetch.retry.max_attempts` when given.
    #[arg(long = "max-attempts", value_name = "N", global = true)]
    max_attempts: Option<u32,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue, global = true)]
    pretty: bool,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Fetch the contribution statistics record.
    Stats(StatsArgs,),
    /// Fetch the weighted language ranking.
    #[command(name = "top-langs")]
    TopLangs(TopLangsArgs,),
    /// Run every request of a YAML batch document.
    Batch(BatchArgs,),
}

#[derive(Debug, Args,)]
struct StatsArgs
{
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    /// Repositories left out of the star total.
    #[arg(long = "exclude-repo", value_name = "NAME", value_delimiter = ',')]
    exclude_repo: Vec<String,>,

    /// Count all-time commits instead of the current year's.
    #[arg(long = "include-all-commits", action = ArgAction::SetTrue)]
    include_all_commits: bool,

    #[arg(long = "include-merged-pull-requests", action = ArgAction::SetTrue)]
    include_merged_pull_requests: bool,

    #[arg(long = "include-discussions", action = ArgAction::SetTrue)]
    include_discussions: bool,

    #[arg(long = "include-discussions-answers", action = ArgAction::SetTrue)]
    include_discussions_answers: bool,
}

#[derive(Debug, Args,)]
struct TopLangsArgs
{
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    /// Repositories left out of the ranking.
    #[arg(long = "exclude-repo", value_name = "NAME", value_delimiter = ',')]
    exclude_repo: Vec<String,>,

    /// Exponent applied to byte size.
    #[arg(long = "size-weight", default_value_t = 1.0)]
    size_weight: f64,

    /// Exponent applied to repository count.
    #[arg(long = "count-weight", default_value_t = 0.0)]
    count_weight: f64,
}

#[derive(Debug, Args,)]
struct BatchArgs
{
    /// Path to the YAML batch document.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run(Cli::parse(),).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

impl GlobalArgs
{
    /// Layers the command line settings over `fetch`.
    fn apply(&self, fetch: &mut FetchConfig,)
    {
        fetch.multi_page_stars |= self.multi_page_stars;
        if let Some(max_attempts,) = self.max_attempts {
            fetch.retry.max_attempts = max_attempts;
        }
    }
}

fn parse_flag_arg(value: &str,) -> Result<bool, String,>
{
    parse_flag(value,).map_err(|error| error.to_display_string(),)
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors from argument validation, fetching and serialization.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let mut fetch = FetchConfig::default();
    cli.global.apply(&mut fetch,);
    let pretty = cli.global.pretty;
    let token = cli.global.token.as_deref().unwrap_or_default();

    match cli.command {
        Command::Stats(args,) => {
            let executor = OctocrabExecutor::new(token, fetch.retry.clone(),)?;
            let options = StatsOptions {
                include_all_commits:          args.include_all_commits,
                exclude_repo:                 args.exclude_repo,
                include_merged_pull_requests: args.include_merged_pull_requests,
                include_discussions:          args.include_discussions,
                include_discussions_answers:  args.include_discussions_answers,
            };
            let record = fetch_stats(&executor, &ExponentialRank, &args.user, &options, &fetch,).await?;
            write_json(&mut io::stdout().lock(), &record, pretty,)
        }
        Command::TopLangs(args,) => {
            let weights = LanguageWeights::new(args.size_weight, args.count_weight,)?;
            let executor = OctocrabExecutor::new(token, fetch.retry.clone(),)?;
            let ranking = fetch_top_languages(&executor, &args.user, &args.exclude_repo, weights,).await?;
            write_json(&mut io::stdout().lock(), &ranking, pretty,)
        }
        Command::Batch(args,) => {
            let mut document = load_requests(&args.config,)?;
            cli.global.apply(&mut document.fetch,);
            let executor = OctocrabExecutor::new(token, document.fetch.retry.clone(),)?;
            let outputs = run_batch(&executor, &ExponentialRank, &document,).await?;
            write_json(&mut io::stdout().lock(), &outputs, pretty,)
        }
    }
}

fn write_json<W, T,>(writer: &mut W, value: &T, pretty: bool,) -> Result<(), Error,>
where
    W: io::Write,
    T: Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(writer, value,)?;
    } else {
        serde_json::to_writer(writer, value,)?;
    }

    Ok((),)
}
