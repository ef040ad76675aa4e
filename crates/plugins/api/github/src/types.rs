//! GitHub API request and response types.
//!
//! These types mirror the raw JSON of the REST API v3. Only the fields the
//! client uses or callers commonly need are declared; everything else in a
//! response is ignored.

use serde::{Deserialize, Serialize};

// =============================================================================
// User
// =============================================================================

/// GitHub user representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// "User", "Organization" or "Bot"
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
    #[serde(default)]
    pub site_admin: bool,
}

// =============================================================================
// Repository
// =============================================================================

/// GitHub repository representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub owner: Option<GitHubUser>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    pub html_url: String,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub ssh_url: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

/// Query options for listing organization repositories.
///
/// `None` leaves the choice to GitHub (`all` / `created`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoFilter {
    /// all, public, private, forks, sources, member
    pub repo_type: Option<String>,
    /// created, updated, pushed, full_name
    pub sort: Option<String>,
}

impl RepoFilter {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(repo_type) = self.repo_type.as_deref().filter(|s| !s.is_empty()) {
            params.push(("type", repo_type.to_string()));
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            params.push(("sort", sort.to_string()));
        }
        params
    }
}

// =============================================================================
// Branches & Tags
// =============================================================================

/// Pointer to a commit, as embedded in branch and tag listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// GitHub branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: CommitRef,
    #[serde(default)]
    pub protected: bool,
}

/// GitHub lightweight tag listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryTag {
    pub name: String,
    pub commit: CommitRef,
    #[serde(default)]
    pub zipball_url: Option<String>,
    #[serde(default)]
    pub tarball_url: Option<String>,
}

// =============================================================================
// Commits
// =============================================================================

/// Author or committer signature of a git commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Git commit object (`/git/commits`, and nested in repository commits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitCommit {
    /// Absent when nested inside a [`RepositoryCommit`]
    #[serde(default)]
    pub sha: Option<String>,
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
    #[serde(default)]
    pub committer: Option<GitActor>,
    #[serde(default)]
    pub tree: Option<CommitRef>,
    #[serde(default)]
    pub parents: Vec<CommitRef>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// File touched by a commit or comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitFile {
    pub filename: String,
    /// added, removed, modified, renamed, copied, changed, unchanged
    pub status: String,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    #[serde(default)]
    pub changes: u32,
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub previous_filename: Option<String>,
}

/// Commit as seen through the repository API (merges, comparisons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryCommit {
    pub sha: String,
    pub commit: GitCommit,
    #[serde(default)]
    pub author: Option<GitHubUser>,
    #[serde(default)]
    pub committer: Option<GitHubUser>,
    #[serde(default)]
    pub parents: Vec<CommitRef>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

/// Result of comparing two commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitsComparison {
    /// ahead, behind, identical, diverged
    pub status: String,
    pub ahead_by: u32,
    pub behind_by: u32,
    pub total_commits: u32,
    #[serde(default)]
    pub base_commit: Option<RepositoryCommit>,
    #[serde(default)]
    pub merge_base_commit: Option<RepositoryCommit>,
    #[serde(default)]
    pub commits: Vec<RepositoryCommit>,
    #[serde(default)]
    pub files: Vec<CommitFile>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Request body for merging `head` into `base`.
#[derive(Debug, Clone, Serialize)]
pub struct MergeRequest {
    pub base: String,
    pub head: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

// =============================================================================
// References & Trees
// =============================================================================

/// Namespace a reference lookup is performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `refs/branch/...`
    Branch,
    /// `refs/heads/...`
    Heads,
    /// `refs/tags/...`
    Tag,
}

impl ReferenceKind {
    /// Path segment under `refs/`.
    pub fn namespace(self) -> &'static str {
        match self {
            ReferenceKind::Branch => "branch",
            ReferenceKind::Heads => "heads",
            ReferenceKind::Tag => "tags",
        }
    }

    /// Reference path without the `refs/` prefix, as the `git/ref` endpoint wants it.
    pub fn path(self, name: &str) -> String {
        format!("{}/{}", self.namespace(), name)
    }
}

/// Object a reference points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitObject {
    pub sha: String,
    /// commit, tag, tree, blob
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Git reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub object: GitObject,
}

/// Request body for creating a reference.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReferenceRequest {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

/// Entry of a git tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Git tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
}

/// Tree entry sent inline with its content.
#[derive(Debug, Clone, Serialize)]
pub struct NewTreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
}

impl NewTreeEntry {
    /// Regular (non-executable) file blob.
    pub fn blob(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: "100644".to_string(),
            entry_type: "blob".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for creating a tree on top of `base_tree`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTreeRequest {
    pub base_tree: String,
    pub tree: Vec<NewTreeEntry>,
}

// =============================================================================
// Pull Requests
// =============================================================================

/// Head or base of a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// GitHub pull request representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub maintainer_can_modify: bool,
    #[serde(default)]
    pub user: Option<GitHubUser>,
    #[serde(default)]
    pub requested_reviewers: Vec<GitHubUser>,
    pub head: PullRequestRef,
    pub base: PullRequestRef,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for opening a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    /// Source branch, `owner:branch` for cross-repository requests
    pub head: String,
    /// Target branch
    pub base: String,
    pub body: String,
    pub maintainer_can_modify: bool,
}

impl NewPullRequest {
    pub fn new(
        title: impl Into<String>,
        head: impl Into<String>,
        base: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            head: head.into(),
            base: base.into(),
            body: body.into(),
            maintainer_can_modify: true,
        }
    }
}

/// Request body for requesting reviews.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewersRequest {
    pub reviewers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_reviewers: Vec<String>,
}

// =============================================================================
// Contents
// =============================================================================

/// Entry of a directory listing from the contents API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryContent {
    pub name: String,
    pub path: String,
    pub sha: String,
    /// file, dir, symlink, submodule
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl RepositoryContent {
    pub fn is_file(&self) -> bool {
        self.content_type == "file"
    }
}
