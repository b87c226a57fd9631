// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Language statistics for a developer's own contributions on GitHub.
//!
//! The library discovers every repository the authenticated account can see,
//! walks the commits authored by one login, attributes added lines to
//! programming languages by file extension and folds the per-repository
//! results into a single summary. The summary is rendered as an SVG badge and
//! a JSON record.
//!
//! Network access goes through the [`Forge`] trait; [`GithubForge`] is the
//! production implementation. Every pipeline stage is generic over the forge
//! and takes its pacing as a [`PacingPolicy`] value, so the whole pipeline can
//! run against in-memory data with no delays.

mod aggregate;
mod config;
mod error;
mod footprint;
mod forge;
mod github;
mod language;
mod pacing;
mod ranking;
mod render;
mod scanner;
#[cfg(test)]
mod testing;
mod totals;

pub use aggregate::{AggregateSummary, aggregate};
pub use config::{
    FALLBACK_TOKEN_VAR, PRIMARY_TOKEN_VAR, RunConfig, credential_from_env, executable_dir,
    load_config, parse_config, resolve_credential,
};
pub use error::{Error, artifact_io_error, io_error};
pub use footprint::{
    BYTES_PER_LINE, FOOTPRINT_TOP_N, LanguageFootprint, collect_footprint, estimate_lines,
};
pub use forge::{
    CommitRef, FileChange, Forge, PAGE_SIZE, RepositoryListing, RepositoryRef,
    discover_repositories,
};
pub use github::GithubForge;
pub use language::{DEFAULT_COLOR, classify, color_for};
pub use pacing::PacingPolicy;
pub use ranking::{IMAGE_TOP_N, RECORD_TOP_N, RankedLanguageEntry, percentage_of, rank};
pub use render::{
    ArtifactPaths, BadgeModel, BadgeRow, ContributionRecord, FootprintLanguage, FootprintRecord,
    RecordLanguage, build_svg_content, format_number, write_artifacts,
};
pub use scanner::{RepoScanResult, ScanLimits, scan_repository};
pub use totals::LanguageTotals;
