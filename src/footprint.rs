// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository-wide language footprint.
//!
//! Unlike the contribution scan, the footprint sums the forge's own language
//! byte counts for every accessible repository, regardless of who wrote the
//! code. Lines are estimated from bytes, see [`estimate_lines`].

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    error::Error,
    forge::{Forge, discover_repositories},
    pacing::PacingPolicy,
    ranking::{RankedLanguageEntry, rank},
    totals::LanguageTotals,
};

/// Average bytes per line assumed by [`estimate_lines`].
pub const BYTES_PER_LINE: u64 = 40;
/// Languages kept in the footprint badge and record.
pub const FOOTPRINT_TOP_N: usize = 8;

/// Rough line estimate for a byte count.
///
/// This is a fixed ratio, not a measurement; it only gives the footprint a
/// line-based scale comparable to the contribution badge.
///
/// # Examples
///
/// ```
/// use clir::estimate_lines;
///
/// assert_eq!(estimate_lines(4_000,), 100);
/// assert_eq!(estimate_lines(39,), 0);
/// ```
pub fn estimate_lines(bytes: u64,) -> u64
{
    bytes / BYTES_PER_LINE
}

/// Byte totals per forge-detected language across all repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize,)]
pub struct LanguageFootprint
{
    /// Repositories whose language breakdown was requested.
    pub total_repos:  u64,
    /// Bytes per language.
    pub per_language: LanguageTotals,
}

impl LanguageFootprint
{
    /// Sum of bytes over all languages.
    pub fn total_bytes(&self,) -> u64
    {
        self.per_language.sum()
    }

    /// Estimated total lines, see [`estimate_lines`].
    pub fn total_lines(&self,) -> u64
    {
        estimate_lines(self.total_bytes(),)
    }

    /// Ranked top-`top_n` view ordered by bytes.
    ///
    /// `amount` of each entry is bytes; use [`estimate_lines`] to convert for
    /// display.
    pub fn ranked(&self, top_n: usize,) -> Vec<RankedLanguageEntry,>
    {
        rank(&self.per_language, top_n,)
    }
}

/// Collects the language footprint of every accessible repository.
///
/// A failed language request contributes nothing for that repository.
///
/// # Errors
///
/// Returns [`Error::Discovery`] when the repository list cannot be fetched.
pub async fn collect_footprint<F,>(
    forge: &F,
    per_page: u8,
    pacing: &PacingPolicy,
    progress: &ProgressBar,
) -> Result<LanguageFootprint, Error,>
where
    F: Forge,
{
    progress.set_message("Discovering repositories...",);
    let repositories = discover_repositories(forge, per_page,).await?;
    let count = repositories.len();
    progress.set_length(count as u64,);

    let mut footprint = LanguageFootprint::default();

    for (index, repository,) in repositories.iter().enumerate() {
        if index > 0 {
            pacing.pause_between_repositories().await;
        }

        progress.set_message(format!("Analyzing {repository}"),);
        info!("[{}/{}] Analyzing {}...", index + 1, count, repository);

        footprint.total_repos += 1;
        match forge.repository_languages(repository,).await {
            Ok(languages,) => {
                for (language, bytes,) in &languages {
                    footprint.per_language.add(language, *bytes,);
                }
            }
            Err(error,) => warn!("Skipping languages of {}: {}", repository, error),
        }

        progress.inc(1,);
    }

    progress.finish_and_clear();
    info!(
        "Total: {} bytes across {} languages",
        footprint.total_bytes(),
        footprint.per_language.len()
    );

    Ok(footprint,)
}
