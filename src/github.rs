// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! GitHub REST implementation of [`Forge`].
//!
//! Every call is a single authenticated GET issued through octocrab and
//! bounded by a request timeout. Payloads are decoded into private raw types
//! so malformed records surface as missing fields.

use std::{collections::BTreeMap, future::Future, time::Duration};

use masterror::AppError;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use crate::forge::{CommitRef, FileChange, Forge, RepositoryListing, RepositoryRef};

/// Affiliations requested during repository discovery.
const AFFILIATIONS: &str = "owner,collaborator,organization_member";

#[derive(Debug, Serialize,)]
struct RepositoryQuery<'a,>
{
    affiliation: &'a str,
    per_page:    u8,
    page:        u32,
}

#[derive(Debug, Serialize,)]
struct CommitQuery<'a,>
{
    author:   &'a str,
    per_page: u8,
    page:     u32,
}

#[derive(Debug, Deserialize,)]
struct RawUser
{
    login: String,
}

#[derive(Debug, Deserialize,)]
struct RawRepository
{
    #[serde(default)]
    name:  Option<String,>,
    #[serde(default)]
    owner: Option<RawOwner,>,
}

#[derive(Debug, Deserialize,)]
struct RawOwner
{
    #[serde(default)]
    login: Option<String,>,
}

#[derive(Debug, Deserialize,)]
struct RawCommit
{
    sha: String,
}

#[derive(Debug, Deserialize,)]
struct RawCommitDetail
{
    #[serde(default)]
    files: Vec<RawFile,>,
}

#[derive(Debug, Deserialize,)]
struct RawFile
{
    filename:  String,
    #[serde(default)]
    additions: u64,
}

impl From<RawRepository,> for RepositoryListing
{
    fn from(raw: RawRepository,) -> Self
    {
        Self {
            owner: raw.owner.and_then(|owner| owner.login,), name: raw.name,
        }
    }
}

impl From<RawCommitDetail,> for Vec<FileChange,>
{
    fn from(raw: RawCommitDetail,) -> Self
    {
        raw.files
            .into_iter()
            .map(|file| FileChange {
                path: file.filename, lines_added: file.additions,
            },)
            .collect()
    }
}

/// [`Forge`] backed by the GitHub REST API.
#[derive(Clone,)]
pub struct GithubForge
{
    client:          Octocrab,
    request_timeout: Duration,
}

impl GithubForge
{
    /// Builds an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the underlying HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    ///
    /// use clir::GithubForge;
    ///
    /// # fn example() -> Result<(), masterror::AppError> {
    /// let forge = GithubForge::new("ghp_token", Duration::from_secs(30),)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: &str, request_timeout: Duration,) -> Result<Self, AppError,>
    {
        let client = Octocrab::builder()
            .personal_token(token.to_owned(),)
            .add_retry_config(RetryConfig::None,)
            .build()
            .map_err(|e| AppError::service(format!("failed to initialize GitHub client: {e}"),),)?;

        Ok(Self {
            client,
            request_timeout,
        },)
    }
}

impl Forge for GithubForge
{
    async fn authenticated_login(&self,) -> Result<String, AppError,>
    {
        let user: RawUser =
            bounded(self.request_timeout, "/user", self.client.get("/user", None::<&(),>,),)
                .await?;
        Ok(user.login,)
    }

    async fn list_repositories_page(
        &self,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<RepositoryListing,>, AppError,>
    {
        let query = RepositoryQuery {
            affiliation: AFFILIATIONS,
            per_page,
            page,
        };
        let repositories: Vec<RawRepository,> = bounded(
            self.request_timeout,
            "/user/repos",
            self.client.get("/user/repos", Some(&query,),),
        )
        .await?;

        Ok(repositories.into_iter().map(RepositoryListing::from,).collect(),)
    }

    async fn list_authored_commits(
        &self,
        repository: &RepositoryRef,
        author: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<CommitRef,>, AppError,>
    {
        let route = format!("/repos/{}/{}/commits", repository.owner, repository.name);
        let query = CommitQuery {
            author,
            per_page,
            page,
        };

        let response: Result<Vec<RawCommit,>, octocrab::Error,> =
            within_timeout(self.request_timeout, &route, self.client.get(&route, Some(&query,),),)
                .await?;
        let commits = match response {
            Ok(commits,) => commits,
            Err(error,) if is_unavailable_repository(&error,) => {
                debug!("{} has no listable commits: {}", repository, error);
                return Ok(Vec::new(),);
            }
            Err(error,) => return Err(map_octocrab_error(&route, &error,),),
        };

        Ok(commits
            .into_iter()
            .map(|commit| CommitRef {
                sha: commit.sha,
            },)
            .collect(),)
    }

    async fn commit_detail(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<Vec<FileChange,>, AppError,>
    {
        let route = format!("/repos/{}/{}/commits/{sha}", repository.owner, repository.name);
        let detail: RawCommitDetail =
            bounded(self.request_timeout, &route, self.client.get(&route, None::<&(),>,),).await?;
        Ok(detail.into(),)
    }

    async fn repository_languages(
        &self,
        repository: &RepositoryRef,
    ) -> Result<BTreeMap<String, u64,>, AppError,>
    {
        let route = format!("/repos/{}/{}/languages", repository.owner, repository.name);
        bounded(self.request_timeout, &route, self.client.get(&route, None::<&(),>,),).await
    }
}

/// Awaits `request` for at most `limit`.
///
/// Expiry is reported as a service error; the forge response itself is
/// returned untouched so callers can inspect its status.
async fn within_timeout<T, Fut,>(
    limit: Duration,
    operation: &str,
    request: Fut,
) -> Result<Result<T, octocrab::Error,>, AppError,>
where
    Fut: Future<Output = Result<T, octocrab::Error,>,>,
{
    debug!("GET {}", operation);
    timeout(limit, request,).await.map_err(|_| {
        AppError::service(format!("{operation} timed out after {}s", limit.as_secs()),)
    },)
}

/// Like [`within_timeout`], with forge errors mapped through
/// [`map_octocrab_error`].
async fn bounded<T, Fut,>(limit: Duration, operation: &str, request: Fut,) -> Result<T, AppError,>
where
    Fut: Future<Output = Result<T, octocrab::Error,>,>,
{
    within_timeout(limit, operation, request,)
        .await?
        .map_err(|error| map_octocrab_error(operation, &error,),)
}

fn status_code(error: &octocrab::Error,) -> Option<u16,>
{
    match error {
        octocrab::Error::GitHub {
            source, ..
        } => Some(source.status_code.as_u16(),),
        _ => None,
    }
}

/// Empty (409), forbidden (403), missing (404) and legally blocked (451)
/// repositories have no commits to list.
fn is_unavailable_status(status: u16,) -> bool
{
    matches!(status, 403 | 404 | 409 | 451)
}

fn is_unavailable_repository(error: &octocrab::Error,) -> bool
{
    status_code(error,).is_some_and(is_unavailable_status,)
}

fn map_octocrab_error(operation: &str, error: &octocrab::Error,) -> AppError
{
    match status_code(error,) {
        Some(401,) => AppError::unauthorized(format!("{operation} rejected the credential: {error}"),),
        Some(status,) => AppError::service(format!("{operation} failed with HTTP {status}: {error}"),),
        None => AppError::service(format!("{operation} failed: {error}"),),
    }
}
