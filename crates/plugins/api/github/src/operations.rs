//! The `Operations` facade.
//!
//! One method per GitHub concept, each answering `None` when anything goes
//! wrong. The failure is logged and then dropped; callers that need the
//! error use the matching inherent method on [`GitHubClient`] instead.
//! `create_pull_request` and `download` are the exceptions and return
//! [`Result`].

use async_trait::async_trait;
use ghkit_core::Result;
use tracing::warn;

use crate::client::GitHubClient;
use crate::types::{
    Branch, CommitsComparison, GitCommit, GitHubUser, PullRequest, Reference, ReferenceKind,
    RepoFilter, Repository, RepositoryCommit, RepositoryTag, Tree,
};

/// Simplified GitHub operations scoped to the client's organization.
#[async_trait]
pub trait Operations: Send + Sync {
    /// Git commit object by SHA.
    async fn commit(&self, repo: &str, sha: &str) -> Option<GitCommit>;

    /// Comparison of `base...head`.
    async fn compare(&self, repo: &str, base: &str, head: &str) -> Option<CommitsComparison>;

    /// Merge `head` into `base`. `None` also when there was nothing to merge.
    async fn merge(
        &self,
        repo: &str,
        base: &str,
        head: &str,
        message: &str,
    ) -> Option<RepositoryCommit>;

    /// Organization repositories (all pages when the client says so).
    async fn repositories(&self, filter: &RepoFilter) -> Option<Vec<Repository>>;

    async fn repository(&self, repo: &str) -> Option<Repository>;

    async fn branches(&self, repo: &str) -> Option<Vec<Branch>>;

    async fn branch(&self, repo: &str, branch: &str) -> Option<Branch>;

    async fn tags(&self, repo: &str) -> Option<Vec<RepositoryTag>>;

    /// Tag with exactly this name, searching every page.
    async fn tag_by_name(&self, repo: &str, tag: &str) -> Option<RepositoryTag>;

    /// Reference under `refs/branch/`.
    async fn reference_by_branch(&self, repo: &str, branch: &str) -> Option<Reference>;

    /// Reference under `refs/heads/`.
    async fn reference_by_heads(&self, repo: &str, branch: &str) -> Option<Reference>;

    /// Reference under `refs/tags/`.
    async fn reference_by_tag(&self, repo: &str, tag: &str) -> Option<Reference>;

    /// Create branch `refs/heads/{branch}` at `sha`.
    async fn create_refs(&self, repo: &str, branch: &str, sha: &str) -> Option<Reference>;

    /// Tree of comma-separated local files on top of `reference`.
    async fn tree(&self, repo: &str, source_files: &str, reference: &Reference) -> Option<Tree>;

    async fn users(&self) -> Option<Vec<GitHubUser>>;

    /// User by login; empty login for the authenticated user.
    async fn user(&self, login: &str) -> Option<GitHubUser>;

    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// `None` without a request when `reviewers` is empty.
    async fn assign_reviewers(
        &self,
        number: u64,
        repo: &str,
        reviewers: &[String],
    ) -> Option<PullRequest>;

    /// Raw contents of `file_path` at `reference`, body unread.
    async fn download(
        &self,
        repo: &str,
        reference: &str,
        file_path: &str,
    ) -> Result<reqwest::Response>;
}

fn lossy<T>(operation: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(operation = operation, error = %e, "GitHub operation failed");
            None
        }
    }
}

#[async_trait]
impl Operations for GitHubClient {
    async fn commit(&self, repo: &str, sha: &str) -> Option<GitCommit> {
        lossy("commit", self.get_commit(repo, sha).await)
    }

    async fn compare(&self, repo: &str, base: &str, head: &str) -> Option<CommitsComparison> {
        lossy("compare", self.compare_commits(repo, base, head).await)
    }

    async fn merge(
        &self,
        repo: &str,
        base: &str,
        head: &str,
        message: &str,
    ) -> Option<RepositoryCommit> {
        lossy(
            "merge",
            self.merge_branches(repo, base, head, message).await,
        )
        .flatten()
    }

    async fn repositories(&self, filter: &RepoFilter) -> Option<Vec<Repository>> {
        lossy("repositories", self.list_repositories(filter).await)
    }

    async fn repository(&self, repo: &str) -> Option<Repository> {
        lossy("repository", self.get_repository(repo).await)
    }

    async fn branches(&self, repo: &str) -> Option<Vec<Branch>> {
        lossy("branches", self.list_branches(repo).await)
    }

    async fn branch(&self, repo: &str, branch: &str) -> Option<Branch> {
        lossy("branch", self.get_branch(repo, branch).await)
    }

    async fn tags(&self, repo: &str) -> Option<Vec<RepositoryTag>> {
        lossy("tags", self.list_tags(repo).await)
    }

    async fn tag_by_name(&self, repo: &str, tag: &str) -> Option<RepositoryTag> {
        lossy("tag_by_name", self.find_tag(repo, tag).await).flatten()
    }

    async fn reference_by_branch(&self, repo: &str, branch: &str) -> Option<Reference> {
        lossy(
            "reference_by_branch",
            self.get_reference(repo, ReferenceKind::Branch, branch).await,
        )
    }

    async fn reference_by_heads(&self, repo: &str, branch: &str) -> Option<Reference> {
        lossy(
            "reference_by_heads",
            self.get_reference(repo, ReferenceKind::Heads, branch).await,
        )
    }

    async fn reference_by_tag(&self, repo: &str, tag: &str) -> Option<Reference> {
        lossy(
            "reference_by_tag",
            self.get_reference(repo, ReferenceKind::Tag, tag).await,
        )
    }

    async fn create_refs(&self, repo: &str, branch: &str, sha: &str) -> Option<Reference> {
        lossy("create_refs", self.create_reference(repo, branch, sha).await)
    }

    async fn tree(&self, repo: &str, source_files: &str, reference: &Reference) -> Option<Tree> {
        lossy(
            "tree",
            self.create_tree(repo, source_files, reference).await,
        )
    }

    async fn users(&self) -> Option<Vec<GitHubUser>> {
        lossy("users", self.list_users().await)
    }

    async fn user(&self, login: &str) -> Option<GitHubUser> {
        lossy("user", self.get_user(login).await)
    }

    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.open_pull_request(repo, head, base, title, body).await
    }

    async fn assign_reviewers(
        &self,
        number: u64,
        repo: &str,
        reviewers: &[String],
    ) -> Option<PullRequest> {
        if reviewers.is_empty() {
            return None;
        }
        lossy(
            "assign_reviewers",
            self.request_reviewers(number, repo, reviewers).await,
        )
    }

    async fn download(
        &self,
        repo: &str,
        reference: &str,
        file_path: &str,
    ) -> Result<reqwest::Response> {
        self.fetch_file(repo, reference, file_path).await
    }
}
