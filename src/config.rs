// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Run configuration and credential resolution.
//!
//! A run is configured from three sources, in increasing precedence: built-in
//! defaults, an optional YAML document, and command-line overrides applied by
//! the binary. The forge credential is never read from the YAML document; it
//! only comes from the environment.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    forge::PAGE_SIZE,
    pacing::PacingPolicy,
    render::ArtifactPaths,
    scanner::ScanLimits,
};

/// Environment variable consulted first for the forge credential.
pub const PRIMARY_TOKEN_VAR: &str = "METRICS_TOKEN";
/// Environment variable consulted when [`PRIMARY_TOKEN_VAR`] is unset.
pub const FALLBACK_TOKEN_VAR: &str = "GITHUB_TOKEN";

const DEFAULT_SVG_FILE: &str = "code-stats.svg";
const DEFAULT_JSON_FILE: &str = "stats.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings for one run of the pipeline.
///
/// # Examples
///
/// ```
/// use clir::RunConfig;
///
/// let yaml = r#"
/// author: octocat
/// pacing:
///   commit_pause_ms: 250
/// "#;
/// let config: RunConfig = clir::parse_config(yaml,).expect("valid configuration",);
/// assert_eq!(config.author.as_deref(), Some("octocat"));
/// assert_eq!(config.pacing.commit_pause_ms, 250);
/// assert_eq!(config.scan.max_commit_pages, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig
{
    /// Login whose commits are counted. Defaults to the credential owner.
    pub author:               Option<String,>,
    /// Directory receiving the artifacts. Defaults to the executable's
    /// directory.
    pub output_dir:           Option<PathBuf,>,
    /// File name of the SVG badge.
    pub svg_file:             String,
    /// File name of the JSON record.
    pub json_file:            String,
    /// Upper bound for a single forge request in seconds.
    pub request_timeout_secs: u64,
    /// Commit listing bounds.
    pub scan:                 ScanLimits,
    /// Request pacing.
    pub pacing:               PacingPolicy,
}

impl Default for RunConfig
{
    fn default() -> Self
    {
        Self {
            author:               None,
            output_dir:           None,
            svg_file:             DEFAULT_SVG_FILE.to_owned(),
            json_file:            DEFAULT_JSON_FILE.to_owned(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            scan:                 ScanLimits::default(),
            pacing:               PacingPolicy::default(),
        }
    }
}

impl RunConfig
{
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self,) -> Duration
    {
        Duration::from_secs(self.request_timeout_secs,)
    }

    /// Resolves artifact locations, using `fallback_dir` when no output
    /// directory is configured.
    pub fn artifact_paths(&self, fallback_dir: &Path,) -> ArtifactPaths
    {
        let directory = self.output_dir.as_deref().unwrap_or(fallback_dir,);
        ArtifactPaths {
            svg_path:  directory.join(&self.svg_file,),
            json_path: directory.join(&self.json_file,),
        }
    }

    /// Checks the invariants the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) describing the first
    /// violated invariant.
    pub fn validate(&self,) -> Result<(), Error,>
    {
        if self.scan.page_size == 0 || self.scan.page_size > PAGE_SIZE {
            return Err(Error::validation(format!(
                "scan.page_size must be between 1 and {PAGE_SIZE}, got {}",
                self.scan.page_size
            ),),);
        }
        if self.scan.max_commit_pages == 0 {
            return Err(Error::validation("scan.max_commit_pages must be at least 1",),);
        }
        if self.pacing.commit_batch == 0 {
            return Err(Error::validation("pacing.commit_batch must be at least 1",),);
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::validation("request_timeout_secs must be at least 1",),);
        }
        if let Some(author,) = self.author.as_deref() {
            validate_login(author,)?;
        }
        validate_file_name(&self.svg_file, "svg_file",)?;
        validate_file_name(&self.json_file, "json_file",)?;

        Ok((),)
    }
}

/// Loads and validates a run configuration from a YAML file.
///
/// # Errors
///
/// Returns [`Error::Io`](Error::Io) when the file cannot be read,
/// [`Error::Parse`](Error::Parse) when it is not a valid document and
/// [`Error::Validation`](Error::Validation) when values are out of range.
pub fn load_config(path: &Path,) -> Result<RunConfig, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses and validates a run configuration from a YAML string.
///
/// An empty document yields the defaults.
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(contents: &str,) -> Result<RunConfig, Error,>
{
    let config: RunConfig = if contents.trim().is_empty() {
        RunConfig::default()
    } else {
        serde_yaml::from_str(contents,)?
    };
    config.validate()?;
    Ok(config,)
}

/// Picks the forge credential from an environment lookup.
///
/// [`PRIMARY_TOKEN_VAR`] wins over [`FALLBACK_TOKEN_VAR`]; blank values count
/// as unset.
///
/// # Errors
///
/// Returns [`Error::Precondition`](Error::Precondition) when neither variable
/// holds a value.
///
/// # Examples
///
/// ```
/// use clir::resolve_credential;
///
/// let token = resolve_credential(|name| (name == "GITHUB_TOKEN").then(|| "ghp_x".to_owned(),),)
///     .expect("fallback is used",);
/// assert_eq!(token, "ghp_x");
/// ```
pub fn resolve_credential<F,>(lookup: F,) -> Result<String, Error,>
where
    F: Fn(&str,) -> Option<String,>,
{
    [PRIMARY_TOKEN_VAR, FALLBACK_TOKEN_VAR,]
        .into_iter()
        .filter_map(|name| lookup(name,),)
        .map(|value| value.trim().to_owned(),)
        .find(|value| !value.is_empty(),)
        .ok_or_else(|| {
            Error::precondition(format!(
                "no GitHub token found, set {PRIMARY_TOKEN_VAR} or {FALLBACK_TOKEN_VAR}"
            ),)
        },)
}

/// Reads the forge credential from the process environment.
///
/// # Errors
///
/// See [`resolve_credential`].
pub fn credential_from_env() -> Result<String, Error,>
{
    resolve_credential(|name| std::env::var(name,).ok(),)
}

/// Directory containing the running executable, or the working directory
/// when it cannot be determined.
pub fn executable_dir() -> PathBuf
{
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(Path::to_path_buf,),)
        .unwrap_or_else(|| PathBuf::from(".",),)
}

fn validate_login(login: &str,) -> Result<(), Error,>
{
    let trimmed = login.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("author must not be empty",),);
    }
    if !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-',) {
        return Err(Error::validation(format!(
            "author '{trimmed}' may only contain ASCII letters, digits and hyphens"
        ),),);
    }
    Ok((),)
}

fn validate_file_name(value: &str, field: &str,) -> Result<(), Error,>
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} must not be empty"),),);
    }
    if trimmed.contains(['/', '\\',],) || trimmed == "." || trimmed == ".." {
        return Err(Error::validation(format!("{field} must be a plain file name, got '{trimmed}'"),),);
    }
    Ok((),)
}
