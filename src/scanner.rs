// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-repository contribution scanning.
//!
//! Walks the commits a user authored in one repository, fetches each commit's
//! file breakdown and accumulates added lines per classified language. Remote
//! failures never abort the scan: a failed commit listing ends pagination and
//! a failed detail request skips that commit.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    forge::{FileChange, Forge, PAGE_SIZE, RepositoryRef},
    language::classify,
    pacing::PacingPolicy,
    totals::LanguageTotals,
};

/// Bounds applied to paginated commit listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(default)]
pub struct ScanLimits
{
    /// Items requested per page (default: 100).
    pub page_size:        u8,
    /// Maximum commit pages fetched per repository (default: 10).
    ///
    /// Commits beyond `page_size * max_commit_pages` are not scanned.
    pub max_commit_pages: u32,
}

impl Default for ScanLimits
{
    fn default() -> Self
    {
        Self {
            page_size: PAGE_SIZE, max_commit_pages: 10,
        }
    }
}

/// Contribution totals for a single repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize,)]
pub struct RepoScanResult
{
    /// Added lines per classified language.
    pub per_language:      LanguageTotals,
    /// Sum of `per_language`.
    pub total_lines_added: u64,
    /// Commits whose detail was fetched successfully.
    pub commit_count:      u64,
}

impl RepoScanResult
{
    /// Records one successfully detailed commit.
    ///
    /// Only changes whose path classifies to a known language and that add at
    /// least one line are counted. The commit itself is always counted, even
    /// when none of its changes qualify.
    pub fn record_commit(&mut self, changes: &[FileChange],)
    {
        for change in changes {
            if change.lines_added == 0 {
                continue;
            }
            let Some(language,) = classify(&change.path,) else {
                continue;
            };

            self.per_language.add(language, change.lines_added,);
            self.total_lines_added = self.total_lines_added.saturating_add(change.lines_added,);
        }

        self.commit_count += 1;
    }
}

/// Scans the commits `author` made in `repository`.
///
/// Commit pages are requested until a page comes back shorter than
/// `limits.page_size` or `limits.max_commit_pages` pages were read. After
/// every `pacing.commit_batch` detail requests the scan sleeps for the
/// configured batch pause.
///
/// # Example
///
/// ```no_run
/// use clir::{GithubForge, PacingPolicy, RepositoryRef, ScanLimits, scan_repository};
///
/// # async fn example() -> Result<(), masterror::AppError> {
/// let forge = GithubForge::new("token", std::time::Duration::from_secs(30),)?;
/// let repository = RepositoryRef::new("octocat", "hello-world",);
/// let result = scan_repository(
///     &forge,
///     &repository,
///     "octocat",
///     &ScanLimits::default(),
///     &PacingPolicy::default(),
/// )
/// .await;
/// println!("{} commits, +{} lines", result.commit_count, result.total_lines_added);
/// # Ok(())
/// # }
/// ```
pub async fn scan_repository<F,>(
    forge: &F,
    repository: &RepositoryRef,
    author: &str,
    limits: &ScanLimits,
    pacing: &PacingPolicy,
) -> RepoScanResult
where
    F: Forge,
{
    let mut result = RepoScanResult::default();
    let mut requested = 0usize;

    for page in 1..=limits.max_commit_pages {
        let commits =
            match forge.list_authored_commits(repository, author, page, limits.page_size,).await {
                Ok(commits,) => commits,
                Err(error,) => {
                    warn!("Listing commits of {} failed on page {}: {}", repository, page, error);
                    break;
                }
            };

        let fetched = commits.len();
        debug!("{}: page {} returned {} commits", repository, page, fetched);

        for commit in &commits {
            match forge.commit_detail(repository, &commit.sha,).await {
                Ok(changes,) => result.record_commit(&changes,),
                Err(error,) => {
                    warn!("Skipping commit {} in {}: {}", commit.sha, repository, error);
                }
            }

            requested += 1;
            if pacing.completes_batch(requested,) {
                pacing.pause_after_batch(requested,).await;
            }
        }

        if fetched < usize::from(limits.page_size,) {
            break;
        }

        if page == limits.max_commit_pages {
            debug!(
                "{}: page ceiling of {} reached, later commits are not scanned",
                repository, limits.max_commit_pages
            );
        }
    }

    result
}
