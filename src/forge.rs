// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Forge abstraction consumed by the scanning pipeline.
//!
//! The [`Forge`] trait exposes one method per remote call. Each call either
//! returns decoded data or a [`masterror::AppError`]; pagination, partial
//! failure handling and pacing are layered on top by the callers so they can
//! be exercised without a network.

use std::collections::BTreeMap;

use masterror::AppError;
use tracing::{debug, info, warn};

use crate::error::Error;

/// Number of items requested per page from paginated endpoints.
pub const PAGE_SIZE: u8 = 100;

/// Identifies a forge repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub struct RepositoryRef
{
    /// Account or organization that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name:  String,
}

impl RepositoryRef
{
    /// Creates a repository reference from owner and name.
    pub fn new(owner: impl Into<String,>, name: impl Into<String,>,) -> Self
    {
        Self {
            owner: owner.into(), name: name.into(),
        }
    }
}

impl std::fmt::Display for RepositoryRef
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Raw repository record returned by discovery.
///
/// Owner and name are optional because the forge payload is not trusted;
/// listings missing either field are skipped by [`discover_repositories`].
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct RepositoryListing
{
    /// Owner login, when present in the payload.
    pub owner: Option<String,>,
    /// Repository name, when present in the payload.
    pub name:  Option<String,>,
}

impl RepositoryListing
{
    /// Converts the listing into a [`RepositoryRef`] when both owner and name
    /// are present and non-blank.
    pub fn reference(&self,) -> Option<RepositoryRef,>
    {
        let owner = self.owner.as_deref().map(str::trim,).filter(|value| !value.is_empty(),)?;
        let name = self.name.as_deref().map(str::trim,).filter(|value| !value.is_empty(),)?;
        Some(RepositoryRef::new(owner, name,),)
    }
}

/// Identifies one commit inside a repository.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct CommitRef
{
    /// Full commit hash.
    pub sha: String,
}

/// One file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct FileChange
{
    /// Repository-relative path of the file.
    pub path:        String,
    /// Lines added to the file by the commit.
    pub lines_added: u64,
}

/// Remote operations required by the contribution and footprint pipelines.
///
/// Every method issues a single authenticated GET request. Implementations
/// must not retry or cache; callers decide how failures propagate.
#[allow(async_fn_in_trait)]
pub trait Forge
{
    /// Returns the login of the account owning the credential.
    async fn authenticated_login(&self,) -> Result<String, AppError,>;

    /// Lists one page of repositories accessible to the authenticated user,
    /// across owner, collaborator and organization-member affiliations.
    async fn list_repositories_page(
        &self,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<RepositoryListing,>, AppError,>;

    /// Lists one page of commits in `repository` authored by `author`.
    ///
    /// Empty or inaccessible repositories yield an empty page rather than an
    /// error.
    async fn list_authored_commits(
        &self,
        repository: &RepositoryRef,
        author: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<CommitRef,>, AppError,>;

    /// Returns the per-file change breakdown of a single commit.
    async fn commit_detail(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<Vec<FileChange,>, AppError,>;

    /// Returns the forge-detected language byte counts of a repository.
    async fn repository_languages(
        &self,
        repository: &RepositoryRef,
    ) -> Result<BTreeMap<String, u64,>, AppError,>;
}

/// Lists every repository accessible to the authenticated user.
///
/// Pages are requested until one comes back shorter than `per_page`. A
/// failure on the first page means nothing could be listed and is returned as
/// [`Error::Discovery`]; a failure on a later page stops discovery and keeps
/// what was already collected. Malformed listings are skipped with a warning.
///
/// # Errors
///
/// Returns [`Error::Discovery`] when the first page cannot be fetched.
pub async fn discover_repositories<F,>(forge: &F, per_page: u8,) -> Result<Vec<RepositoryRef,>, Error,>
where
    F: Forge,
{
    let mut repositories = Vec::new();
    let mut page = 1u32;

    loop {
        let listings = match forge.list_repositories_page(page, per_page,).await {
            Ok(listings,) => listings,
            Err(error,) if page == 1 => {
                return Err(Error::discovery(error.to_string(),),);
            }
            Err(error,) => {
                warn!("Repository discovery stopped at page {}: {}", page, error);
                break;
            }
        };

        let fetched = listings.len();
        debug!("Discovery page {} returned {} repositories", page, fetched);

        for listing in &listings {
            match listing.reference() {
                Some(repository,) => repositories.push(repository,),
                None => warn!("Skipping repository with malformed metadata: {:?}", listing),
            }
        }

        if fetched < usize::from(per_page,) {
            break;
        }

        page += 1;
    }

    info!("Found {} repositories", repositories.len());

    Ok(repositories,)
}
