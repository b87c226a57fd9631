// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Contribution aggregation across every accessible repository.
//!
//! Discovers repositories once, scans them in discovery order and folds each
//! [`RepoScanResult`] into an explicit [`AggregateSummary`] accumulator.

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::info;

use crate::{
    error::Error,
    forge::{Forge, discover_repositories},
    pacing::PacingPolicy,
    ranking::{RankedLanguageEntry, rank},
    scanner::{RepoScanResult, ScanLimits, scan_repository},
    totals::LanguageTotals,
};

/// Totals accumulated over all scanned repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize,)]
pub struct AggregateSummary
{
    /// Repositories whose scan completed, with or without contributions.
    pub total_repos_scanned:      u64,
    /// Repositories whose scan found at least one detailed commit.
    pub repos_with_contributions: u64,
    /// Sum of added lines across all repositories.
    pub total_lines_added:        u64,
    /// Sum of detailed commits across all repositories.
    pub total_commits:            u64,
    /// Added lines per language across all repositories.
    pub per_language:             LanguageTotals,
}

impl AggregateSummary
{
    /// Combines the accumulator with one repository result.
    ///
    /// Every result counts as scanned. Results without commits leave the
    /// contribution counters untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use clir::{AggregateSummary, RepoScanResult};
    ///
    /// let summary = AggregateSummary::default()
    ///     .fold(&RepoScanResult::default(),)
    ///     .fold(&RepoScanResult {
    ///         total_lines_added: 5,
    ///         commit_count: 1,
    ///         per_language: [("Rust", 5,),].into_iter().collect(),
    ///     },);
    ///
    /// assert_eq!(summary.total_repos_scanned, 2);
    /// assert_eq!(summary.repos_with_contributions, 1);
    /// ```
    pub fn fold(mut self, result: &RepoScanResult,) -> Self
    {
        self.total_repos_scanned += 1;

        if result.commit_count == 0 {
            return self;
        }

        self.repos_with_contributions += 1;
        self.total_commits = self.total_commits.saturating_add(result.commit_count,);
        self.total_lines_added = self.total_lines_added.saturating_add(result.total_lines_added,);
        self.per_language.merge(&result.per_language,);
        self
    }

    /// Ranked top-`top_n` view of the per-language totals.
    pub fn ranked(&self, top_n: usize,) -> Vec<RankedLanguageEntry,>
    {
        rank(&self.per_language, top_n,)
    }
}

/// Scans every repository accessible to the credential for commits by
/// `author` and returns the folded totals.
///
/// Repositories are scanned one at a time with `pacing.repository_pause`
/// between them. Only discovery failures abort the run; failures inside a
/// repository reduce its contribution to zero.
///
/// # Errors
///
/// Returns [`Error::Discovery`] when the repository list cannot be fetched.
///
/// # Example
///
/// ```no_run
/// use clir::{GithubForge, PacingPolicy, ScanLimits, aggregate};
/// use indicatif::ProgressBar;
///
/// # async fn example() -> Result<(), clir::Error> {
/// let forge = GithubForge::new("token", std::time::Duration::from_secs(30),)?;
/// let summary = aggregate(
///     &forge,
///     "octocat",
///     &ScanLimits::default(),
///     &PacingPolicy::default(),
///     &ProgressBar::hidden(),
/// )
/// .await?;
/// println!("{} lines in {} commits", summary.total_lines_added, summary.total_commits);
/// # Ok(())
/// # }
/// ```
pub async fn aggregate<F,>(
    forge: &F,
    author: &str,
    limits: &ScanLimits,
    pacing: &PacingPolicy,
    progress: &ProgressBar,
) -> Result<AggregateSummary, Error,>
where
    F: Forge,
{
    progress.set_message("Discovering repositories...",);
    let repositories = discover_repositories(forge, limits.page_size,).await?;
    let count = repositories.len();
    progress.set_length(count as u64,);

    let mut summary = AggregateSummary::default();

    for (index, repository,) in repositories.iter().enumerate() {
        if index > 0 {
            pacing.pause_between_repositories().await;
        }

        progress.set_message(format!("Scanning {repository}"),);
        info!("[{}/{}] Scanning {}...", index + 1, count, repository);

        let result = scan_repository(forge, repository, author, limits, pacing,).await;

        if result.commit_count == 0 {
            info!("{}: no contributions", repository);
        } else {
            info!(
                "{}: {} commits, +{} lines",
                repository, result.commit_count, result.total_lines_added
            );
        }

        summary = summary.fold(&result,);
        progress.inc(1,);
    }

    progress.finish_and_clear();
    info!(
        "Scanned {} repositories, {} with contributions: {} commits, +{} lines",
        summary.total_repos_scanned,
        summary.repos_with_contributions,
        summary.total_commits,
        summary.total_lines_added
    );

    Ok(summary,)
}
