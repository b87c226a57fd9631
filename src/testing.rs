// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory forge used by pipeline tests.

use std::{
    cell::Cell,
    collections::{BTreeMap, HashMap, HashSet},
};

use masterror::AppError;

use crate::forge::{CommitRef, FileChange, Forge, RepositoryListing, RepositoryRef};

/// Login every [`MemoryForge`] commit is authored by unless stated otherwise.
pub(crate) const AUTHOR: &str = "octocat";

struct StoredCommit
{
    author:  String,
    sha:     String,
    changes: Option<Vec<FileChange,>,>,
}

/// Deterministic [`Forge`] backed by in-memory fixtures.
#[derive(Default)]
pub(crate) struct MemoryForge
{
    repository_pages:   Vec<Vec<RepositoryListing,>,>,
    discovery_failure:  Option<u32,>,
    commits:            HashMap<RepositoryRef, Vec<StoredCommit,>,>,
    failing_listings:   HashSet<(RepositoryRef, u32,),>,
    languages:          HashMap<RepositoryRef, Option<BTreeMap<String, u64,>,>,>,
    repository_calls:   Cell<usize,>,
    listing_calls:      Cell<usize,>,
    detail_calls:       Cell<usize,>,
}

impl MemoryForge
{
    pub(crate) fn new() -> Self
    {
        Self::default()
    }

    pub(crate) fn with_discovery_failure_at(mut self, page: u32,) -> Self
    {
        self.discovery_failure = Some(page,);
        self
    }

    pub(crate) fn push_repository_page(&mut self, listings: Vec<RepositoryListing,>,)
    {
        self.repository_pages.push(listings,);
    }

    /// Registers repositories on a single discovery page.
    pub(crate) fn with_repositories(mut self, repositories: &[RepositoryRef],) -> Self
    {
        let listings = repositories
            .iter()
            .map(|repository| RepositoryListing {
                owner: Some(repository.owner.clone(),),
                name:  Some(repository.name.clone(),),
            },)
            .collect();
        self.push_repository_page(listings,);
        self
    }

    pub(crate) fn add_commit(&mut self, repository: &RepositoryRef, changes: Vec<FileChange,>,)
    {
        self.store(repository, AUTHOR, Some(changes,),);
    }

    pub(crate) fn add_foreign_commit(
        &mut self,
        repository: &RepositoryRef,
        author: &str,
        changes: Vec<FileChange,>,
    )
    {
        self.store(repository, author, Some(changes,),);
    }

    /// Registers a commit whose detail request fails.
    pub(crate) fn add_broken_commit(&mut self, repository: &RepositoryRef,)
    {
        self.store(repository, AUTHOR, None,);
    }

    pub(crate) fn fail_listing(&mut self, repository: &RepositoryRef, page: u32,)
    {
        self.failing_listings.insert((repository.clone(), page,),);
    }

    pub(crate) fn set_languages(&mut self, repository: &RepositoryRef, languages: &[(&str, u64,)],)
    {
        let map = languages.iter().map(|(name, bytes,)| ((*name).to_owned(), *bytes,),).collect();
        self.languages.insert(repository.clone(), Some(map,),);
    }

    pub(crate) fn fail_languages(&mut self, repository: &RepositoryRef,)
    {
        self.languages.insert(repository.clone(), None,);
    }

    pub(crate) fn repository_page_requests(&self,) -> usize
    {
        self.repository_calls.get()
    }

    pub(crate) fn listing_requests(&self,) -> usize
    {
        self.listing_calls.get()
    }

    pub(crate) fn detail_requests(&self,) -> usize
    {
        self.detail_calls.get()
    }

    fn store(&mut self, repository: &RepositoryRef, author: &str, changes: Option<Vec<FileChange,>,>,)
    {
        let commits = self.commits.entry(repository.clone(),).or_default();
        let sha = format!("{:040x}", commits.len() + 1);
        commits.push(StoredCommit {
            author: author.to_owned(),
            sha,
            changes,
        },);
    }
}

/// Builds file changes from `(path, lines_added)` pairs.
pub(crate) fn changes(entries: &[(&str, u64,)],) -> Vec<FileChange,>
{
    entries
        .iter()
        .map(|(path, lines_added,)| FileChange {
            path:        (*path).to_owned(),
            lines_added: *lines_added,
        },)
        .collect()
}

fn bump(counter: &Cell<usize,>,)
{
    counter.set(counter.get() + 1,);
}

impl Forge for MemoryForge
{
    async fn authenticated_login(&self,) -> Result<String, AppError,>
    {
        Ok(AUTHOR.to_owned(),)
    }

    async fn list_repositories_page(
        &self,
        page: u32,
        _per_page: u8,
    ) -> Result<Vec<RepositoryListing,>, AppError,>
    {
        bump(&self.repository_calls,);
        if self.discovery_failure == Some(page,) {
            return Err(AppError::service("HTTP 502 while listing repositories",),);
        }

        let index = page.saturating_sub(1,) as usize;
        Ok(self.repository_pages.get(index,).cloned().unwrap_or_default(),)
    }

    async fn list_authored_commits(
        &self,
        repository: &RepositoryRef,
        author: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<CommitRef,>, AppError,>
    {
        bump(&self.listing_calls,);
        if self.failing_listings.contains(&(repository.clone(), page,),) {
            return Err(AppError::service(format!("HTTP 500 listing commits of {repository}"),),);
        }

        let Some(commits,) = self.commits.get(repository,) else {
            return Ok(Vec::new(),);
        };

        let per_page = usize::from(per_page,);
        let skip = page.saturating_sub(1,) as usize * per_page;

        Ok(commits
            .iter()
            .filter(|commit| commit.author == author,)
            .skip(skip,)
            .take(per_page,)
            .map(|commit| CommitRef {
                sha: commit.sha.clone(),
            },)
            .collect(),)
    }

    async fn commit_detail(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<Vec<FileChange,>, AppError,>
    {
        bump(&self.detail_calls,);
        self.commits
            .get(repository,)
            .and_then(|commits| commits.iter().find(|commit| commit.sha == sha,),)
            .and_then(|commit| commit.changes.clone(),)
            .ok_or_else(|| AppError::service(format!("HTTP 500 fetching {repository}@{sha}"),),)
    }

    async fn repository_languages(
        &self,
        repository: &RepositoryRef,
    ) -> Result<BTreeMap<String, u64,>, AppError,>
    {
        match self.languages.get(repository,) {
            Some(Some(languages,),) => Ok(languages.clone(),),
            Some(None,) => Err(AppError::service(format!("HTTP 500 fetching languages of {repository}"),),),
            None => Ok(BTreeMap::new(),),
        }
    }
}
