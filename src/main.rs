// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the clir binary.
//!
//! `contributions` (the default) renders the authored-lines badge and record;
//! `languages` renders the repository-wide language footprint instead.

use std::{path::PathBuf, process};

use clap::{Args, Parser, Subcommand};
use clir::{
    AggregateSummary, BadgeModel, ContributionRecord, Error, FOOTPRINT_TOP_N, Forge, FootprintRecord,
    GithubForge, LanguageFootprint, RECORD_TOP_N, RunConfig, aggregate, collect_footprint,
    credential_from_env, estimate_lines, executable_dir, format_number, load_config,
    write_artifacts,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line interface for rendering contribution language statistics.
#[derive(Debug, Parser,)]
#[command(name = "clir", version, about = "Render language statistics of your GitHub contributions")]
struct Cli
{
    #[command(subcommand)]
    command: Option<Command,>,

    #[command(flatten)]
    options: GlobalArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Count lines added by the author across all accessible repositories.
    Contributions,
    /// Sum the forge-reported language bytes of all accessible repositories.
    Languages,
}

/// Options shared by every command.
#[derive(Debug, Default, Args,)]
struct GlobalArgs
{
    /// Path to an optional YAML run configuration.
    #[arg(long = "config", value_name = "PATH", env = "CLIR_CONFIG", global = true)]
    config: Option<PathBuf,>,

    /// Login whose commits are counted; defaults to the token owner.
    #[arg(long = "author", value_name = "LOGIN", global = true)]
    author: Option<String,>,

    /// Directory receiving the SVG and JSON artifacts.
    #[arg(long = "output", value_name = "DIR", global = true)]
    output: Option<PathBuf,>,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter,)
        .with_writer(std::io::stderr,)
        .with_target(false,)
        .try_init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, credential, discovery and artifact errors.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();
    let config = resolve_config(&cli.options,)?;
    let token = credential_from_env()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::service(format!("failed to start async runtime: {e}"),),)?;

    runtime.block_on(execute(cli.command.unwrap_or(Command::Contributions,), &config, &token,),)
}

/// Merges the optional configuration file with command-line overrides.
fn resolve_config(options: &GlobalArgs,) -> Result<RunConfig, Error,>
{
    let mut config = match options.config.as_deref() {
        Some(path,) => load_config(path,)?,
        None => RunConfig::default(),
    };

    if let Some(author,) = options.author.as_deref() {
        config.author = Some(author.trim().to_owned(),);
    }
    if let Some(output,) = options.output.as_ref() {
        config.output_dir = Some(output.clone(),);
    }

    config.validate()?;
    Ok(config,)
}

async fn execute(command: Command, config: &RunConfig, token: &str,) -> Result<(), Error,>
{
    let forge = GithubForge::new(token, config.request_timeout(),)?;
    let paths = config.artifact_paths(&executable_dir(),);
    let progress = progress_bar();

    match command {
        Command::Contributions => {
            let author = resolve_author(&forge, config,).await?;
            info!("Collecting contributions of {}", author);

            let summary = aggregate(&forge, &author, &config.scan, &config.pacing, &progress,).await?;

            write_artifacts(
                &paths,
                &BadgeModel::contributions(&summary,),
                &ContributionRecord::from_summary(&summary,),
            )?;
            report_contributions(&summary,);
        }
        Command::Languages => {
            let footprint =
                collect_footprint(&forge, config.scan.page_size, &config.pacing, &progress,).await?;

            write_artifacts(
                &paths,
                &BadgeModel::footprint(&footprint,),
                &FootprintRecord::from_footprint(&footprint,),
            )?;
            report_footprint(&footprint,);
        }
    }

    info!("Wrote {}", paths.svg_path.display());
    info!("Wrote {}", paths.json_path.display());
    Ok((),)
}

/// Uses the configured author, or asks the forge who owns the credential.
async fn resolve_author<F,>(forge: &F, config: &RunConfig,) -> Result<String, Error,>
where
    F: Forge,
{
    if let Some(author,) = config.author.as_deref() {
        return Ok(author.to_owned(),);
    }

    forge
        .authenticated_login()
        .await
        .map_err(|e| Error::discovery(format!("failed to resolve the authenticated user: {e}"),),)
}

fn progress_bar() -> ProgressBar
{
    let pb = ProgressBar::new(0,);
    if let Ok(style,) =
        ProgressStyle::default_bar().template("{spinner:.yellow} [{elapsed_precise}] {pos}/{len} {msg}",)
    {
        pb.set_style(style,);
    }
    pb
}

fn report_contributions(summary: &AggregateSummary,)
{
    info!(
        "{} lines added in {} commits across {} repositories",
        format_number(summary.total_lines_added,),
        summary.total_commits,
        summary.repos_with_contributions
    );
    for entry in summary.ranked(RECORD_TOP_N,) {
        info!("  {:<12} {:>10} lines  {:>5.1}%", entry.name, entry.amount, entry.percentage);
    }
}

fn report_footprint(footprint: &LanguageFootprint,)
{
    info!(
        "~{} lines across {} repositories",
        format_number(footprint.total_lines(),),
        footprint.total_repos
    );
    for entry in footprint.ranked(FOOTPRINT_TOP_N,) {
        info!(
            "  {:<12} ~{:>9} lines  {:>5.1}%",
            entry.name,
            estimate_lines(entry.amount,),
            entry.percentage
        );
    }
}
