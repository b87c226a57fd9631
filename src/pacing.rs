// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Request pacing for sequential forge scans.
//!
//! Requests are issued one at a time, so bursts are avoided by slowing the
//! single control thread: a pause after every batch of commit detail
//! requests and a shorter pause between repositories.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::debug;

/// Pacing configuration injected into the scanner and aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(default)]
pub struct PacingPolicy
{
    /// Number of commit detail requests between two pauses (default: 50).
    pub commit_batch:        usize,
    /// Pause after each full batch in milliseconds (default: 1000).
    pub commit_pause_ms:     u64,
    /// Pause between two repositories in milliseconds (default: 200).
    pub repository_pause_ms: u64,
}

impl Default for PacingPolicy
{
    fn default() -> Self
    {
        Self {
            commit_batch: 50, commit_pause_ms: 1000, repository_pause_ms: 200,
        }
    }
}

impl PacingPolicy
{
    /// Policy with zero-length pauses, used for deterministic tests.
    pub fn immediate() -> Self
    {
        Self {
            commit_pause_ms: 0, repository_pause_ms: 0, ..Self::default()
        }
    }

    /// Returns `true` when `processed` detail requests complete a batch.
    ///
    /// # Example
    ///
    /// ```
    /// use clir::PacingPolicy;
    ///
    /// let policy = PacingPolicy::default();
    /// assert!(!policy.completes_batch(49,));
    /// assert!(policy.completes_batch(50,));
    /// assert!(policy.completes_batch(100,));
    /// ```
    pub fn completes_batch(&self, processed: usize,) -> bool
    {
        self.commit_batch > 0 && processed > 0 && processed % self.commit_batch == 0
    }

    /// Pause awaited after a completed batch of commit detail requests.
    pub fn commit_pause(&self,) -> Duration
    {
        Duration::from_millis(self.commit_pause_ms,)
    }

    /// Pause awaited between two repositories.
    pub fn repository_pause(&self,) -> Duration
    {
        Duration::from_millis(self.repository_pause_ms,)
    }

    /// Sleeps for the commit batch pause.
    pub async fn pause_after_batch(&self, processed: usize,)
    {
        debug!("Pacing after {} commit detail requests ({}ms)", processed, self.commit_pause_ms);
        pause(self.commit_pause(),).await;
    }

    /// Sleeps for the inter-repository pause.
    pub async fn pause_between_repositories(&self,)
    {
        pause(self.repository_pause(),).await;
    }
}

async fn pause(duration: Duration,)
{
    if !duration.is_zero() {
        sleep(duration,).await;
    }
}
