//! GitHub API client implementation.

use ghkit_core::{Error, GitHubConfig, PageSizes, Result};
use reqwest::header::LINK;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::pagination::{parse_link_header, Page};
use crate::types::{
    Branch, CommitsComparison, CreateReferenceRequest, CreateTreeRequest, GitCommit, GitHubUser,
    MergeRequest, NewPullRequest, NewTreeEntry, PullRequest, Reference, ReferenceKind, RepoFilter,
    Repository, RepositoryCommit, RepositoryContent, RepositoryTag, ReviewersRequest, Tree,
};
use crate::DEFAULT_GITHUB_URL;

const USER_AGENT: &str = "ghkit";
const API_VERSION: &str = "2022-11-28";

type Query = Vec<(&'static str, String)>;

/// GitHub API client scoped to one organization.
pub struct GitHubClient {
    base_url: String,
    organization: String,
    all_pages: bool,
    token: String,
    page_sizes: PageSizes,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new GitHub client.
    ///
    /// An empty token is accepted; requests are then sent anonymously.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_GITHUB_URL, token)
    }

    /// Create a new GitHub client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            organization: String::new(),
            all_pages: false,
            token: token.into(),
            page_sizes: PageSizes::default(),
            client,
        })
    }

    /// Create a client from the `[github]` section of the config file.
    pub fn from_config(config: &GitHubConfig, token: impl Into<String>) -> Result<Self> {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_GITHUB_URL);
        Ok(Self::with_base_url(base_url, token)?
            .with_organization(config.organization.clone())
            .with_all_pages(config.all_pages)
            .with_page_sizes(config.page_sizes))
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_all_pages(mut self, all_pages: bool) -> Self {
        self.all_pages = all_pages;
        self
    }

    pub fn with_page_sizes(mut self, page_sizes: PageSizes) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    pub fn set_organization(&mut self, organization: impl Into<String>) {
        self.organization = organization.into();
    }

    pub fn set_all_pages(&mut self, all_pages: bool) {
        self.all_pages = all_pages;
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn all_pages(&self) -> bool {
        self.all_pages
    }

    pub fn page_sizes(&self) -> PageSizes {
        self.page_sizes
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Build request with common headers.
    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    fn org(&self) -> Result<&str> {
        if self.organization.is_empty() {
            return Err(Error::Config("organization is not set".to_string()));
        }
        Ok(&self.organization)
    }

    /// Append percent-encoded path segments to the base URL.
    fn url_from_segments<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<String> {
        let invalid = || Error::Config(format!("invalid base URL: {}", self.base_url));
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// Get the repository API URL for a given endpoint.
    ///
    /// `repo` is one path segment; `endpoint` is split on `/` and each part
    /// is escaped, so `#`, `?` and `%` in names stay in the path.
    fn repo_url(&self, repo: &str, endpoint: &str) -> Result<String> {
        let org = self.org()?;
        let segments = ["repos", org, repo].into_iter();
        self.url_from_segments(segments.chain(path_segments(endpoint)))
    }

    /// Get the API URL for a given endpoint (not repository-scoped).
    fn api_url(&self, endpoint: &str) -> Result<String> {
        self.url_from_segments(path_segments(endpoint))
    }

    /// Send a request and turn non-success statuses into errors.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status_code, body = %body, "GitHub API error response");
            return Err(Error::from_status(status_code, body));
        }

        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url = url, "GitHub GET request");

        let mut builder = self.request(Method::GET, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        decode(self.send(builder).await?).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!(url = url, "GitHub POST request");

        let response = self
            .send(self.request(Method::POST, url).json(body))
            .await?;
        decode(response).await
    }

    /// Fetch one page of a list endpoint along with its `Link` header.
    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>> {
        debug!(url = url, "GitHub GET page request");

        let mut builder = self.request(Method::GET, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = self.send(builder).await?;

        let links = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        Ok(Page {
            items: decode(response).await?,
            links,
        })
    }

    /// Fetch the first page, then keep following `next` links while
    /// `all_pages` is set. A failing page fails the whole listing.
    async fn paginate<T: DeserializeOwned>(
        &self,
        url: &str,
        per_page: u32,
        mut query: Query,
    ) -> Result<Vec<T>> {
        query.extend(first_page(per_page));

        let mut page: Page<T> = self.get_page(url, &query).await?;
        let mut items = std::mem::take(&mut page.items);

        while self.all_pages {
            let Some(next) = page.links.next_url.take() else {
                break;
            };
            debug!(
                page = ?page.links.next_page,
                last_page = ?page.links.last_page,
                "Following next page"
            );
            page = self.get_page(&next, &[]).await?;
            items.append(&mut page.items);
        }

        debug!(url = url, count = items.len(), "Collected list results");
        Ok(items)
    }

    // =========================================================================
    // Commits
    // =========================================================================

    /// Get a git commit object by SHA.
    pub async fn get_commit(&self, repo: &str, sha: &str) -> Result<GitCommit> {
        let url = self.repo_url(repo, &format!("/git/commits/{}", sha))?;
        self.get(&url, &[]).await
    }

    /// Compare two commits, branches or tags.
    pub async fn compare_commits(
        &self,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<CommitsComparison> {
        let url = self.repo_url(repo, &format!("/compare/{}...{}", base, head))?;
        self.get(&url, &[]).await
    }

    /// Merge `head` into `base`.
    ///
    /// Returns `Ok(None)` when GitHub answers 204, i.e. `base` already
    /// contains `head`. An empty message lets GitHub pick its default.
    pub async fn merge_branches(
        &self,
        repo: &str,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<Option<RepositoryCommit>> {
        let url = self.repo_url(repo, "/merges")?;
        let request = MergeRequest {
            base: base.to_string(),
            head: head.to_string(),
            commit_message: (!message.is_empty()).then(|| message.to_string()),
        };

        debug!(url = url.as_str(), base = base, head = head, "GitHub merge request");
        let response = self
            .send(self.request(Method::POST, &url).json(&request))
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            debug!(base = base, head = head, "Nothing to merge");
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    /// List the organization's repositories.
    pub async fn list_repositories(&self, filter: &RepoFilter) -> Result<Vec<Repository>> {
        let url = self.api_url(&format!("/orgs/{}/repos", self.org()?))?;
        self.paginate(&url, self.page_sizes.repositories, filter.query())
            .await
    }

    pub async fn get_repository(&self, repo: &str) -> Result<Repository> {
        let url = self.repo_url(repo, "")?;
        self.get(&url, &[]).await
    }

    // =========================================================================
    // Branches & Tags
    // =========================================================================

    pub async fn list_branches(&self, repo: &str) -> Result<Vec<Branch>> {
        let url = self.repo_url(repo, "/branches")?;
        self.paginate(&url, self.page_sizes.branches, vec![]).await
    }

    pub async fn get_branch(&self, repo: &str, branch: &str) -> Result<Branch> {
        let url = self.repo_url(repo, &format!("/branches/{}", branch))?;
        self.get(&url, &[]).await
    }

    pub async fn list_tags(&self, repo: &str) -> Result<Vec<RepositoryTag>> {
        let url = self.repo_url(repo, "/tags")?;
        self.paginate(&url, self.page_sizes.tags, vec![]).await
    }

    /// Find a tag by exact name.
    ///
    /// Walks pages until the tag shows up, whether or not `all_pages` is set.
    pub async fn find_tag(&self, repo: &str, tag: &str) -> Result<Option<RepositoryTag>> {
        let url = self.repo_url(repo, "/tags")?;
        let mut page: Page<RepositoryTag> = self
            .get_page(&url, &first_page(self.page_sizes.tag_search))
            .await?;

        loop {
            if let Some(found) = page.items.into_iter().find(|t| t.name == tag) {
                return Ok(Some(found));
            }
            let Some(next) = page.links.next_url else {
                debug!(repo = repo, tag = tag, "Tag not found");
                return Ok(None);
            };
            page = self.get_page(&next, &[]).await?;
        }
    }

    // =========================================================================
    // References & Trees
    // =========================================================================

    /// Get a git reference, e.g. `(Heads, "main")` for `refs/heads/main`.
    pub async fn get_reference(
        &self,
        repo: &str,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Reference> {
        let url = self.repo_url(repo, &format!("/git/ref/{}", kind.path(name)))?;
        self.get(&url, &[]).await
    }

    /// Create `refs/heads/{branch}` pointing at `sha`.
    pub async fn create_reference(&self, repo: &str, branch: &str, sha: &str) -> Result<Reference> {
        let url = self.repo_url(repo, "/git/refs")?;
        let request = CreateReferenceRequest {
            ref_name: format!("refs/{}", ReferenceKind::Heads.path(branch)),
            sha: sha.to_string(),
        };
        self.post(&url, &request).await
    }

    /// Create a tree on top of `reference`'s object from local files.
    ///
    /// `source_files` is a comma-separated list of paths. Each file is read
    /// from disk and committed under the same path as a regular blob.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub async fn create_tree(
        &self,
        repo: &str,
        source_files: &str,
        reference: &Reference,
    ) -> Result<Tree> {
        let url = self.repo_url(repo, "/git/trees")?;

        let mut entries = Vec::new();
        for path in source_files
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            let content = tokio::fs::read(path).await.map_err(|e| {
                warn!(path = path, error = %e, "Failed to read tree source file");
                Error::Io(e)
            })?;
            entries.push(NewTreeEntry::blob(path, String::from_utf8_lossy(&content)));
        }

        if entries.is_empty() {
            return Err(Error::InvalidData("no source files given".to_string()));
        }

        let request = CreateTreeRequest {
            base_tree: reference.object.sha.clone(),
            tree: entries,
        };
        self.post(&url, &request).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List organization members, or all GitHub users when no organization is set.
    pub async fn list_users(&self) -> Result<Vec<GitHubUser>> {
        let url = if self.organization.is_empty() {
            self.api_url("/users")?
        } else {
            self.api_url(&format!("/orgs/{}/members", self.organization))?
        };
        self.paginate(&url, self.page_sizes.users, vec![]).await
    }

    /// Get a user by login. An empty login means the authenticated user.
    pub async fn get_user(&self, login: &str) -> Result<GitHubUser> {
        let url = if login.is_empty() {
            self.api_url("/user")?
        } else {
            self.api_url(&format!("/users/{}", login))?
        };
        self.get(&url, &[]).await
    }

    // =========================================================================
    // Pull Requests
    // =========================================================================

    /// Open a pull request from `head` into `base`.
    pub async fn open_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        if repo.is_empty() || head.is_empty() || title.is_empty() {
            return Err(Error::InvalidData(
                "repo, head branch and title are required".to_string(),
            ));
        }

        let url = self.repo_url(repo, "/pulls")?;
        let request = NewPullRequest::new(title, head, base, body);
        self.post(&url, &request).await
    }

    /// Request reviews from the given users.
    pub async fn request_reviewers(
        &self,
        number: u64,
        repo: &str,
        reviewers: &[String],
    ) -> Result<PullRequest> {
        if reviewers.is_empty() {
            return Err(Error::InvalidData("no reviewers given".to_string()));
        }

        let url = self.repo_url(repo, &format!("/pulls/{}/requested_reviewers", number))?;
        let request = ReviewersRequest {
            reviewers: reviewers.to_vec(),
            team_reviewers: vec![],
        };
        self.post(&url, &request).await
    }

    // =========================================================================
    // Contents
    // =========================================================================

    /// Download a file at `reference` (branch, tag or SHA; empty for the
    /// default branch).
    ///
    /// Looks the file up in its directory listing and fetches its raw
    /// download URL. The response body is left unread.
    pub async fn fetch_file(
        &self,
        repo: &str,
        reference: &str,
        file_path: &str,
    ) -> Result<reqwest::Response> {
        if repo.is_empty() {
            return Err(Error::InvalidData("repo cannot be empty".to_string()));
        }
        let (dir, name) = split_file_path(file_path);
        if name.is_empty() {
            return Err(Error::InvalidData("file path cannot be empty".to_string()));
        }

        let endpoint = if dir.is_empty() {
            "/contents".to_string()
        } else {
            format!("/contents/{}", dir)
        };
        let url = self.repo_url(repo, &endpoint)?;

        let mut query = vec![];
        if !reference.is_empty() {
            query.push(("ref", reference.to_string()));
        }

        let entries: Vec<RepositoryContent> = self.get(&url, &query).await?;
        let entry = entries
            .into_iter()
            .find(|e| e.is_file() && e.name == name)
            .ok_or_else(|| Error::NotFound(format!("file {} not found", name)))?;

        let download_url = entry
            .download_url
            .ok_or_else(|| Error::InvalidData(format!("file {} has no download URL", name)))?;

        debug!(url = download_url.as_str(), "Downloading file");
        self.send(self.client.get(&download_url)).await
    }
}

// =============================================================================
// Helper functions
// =============================================================================

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Http(format!("Failed to read response: {}", e)))?;
    Ok(serde_json::from_slice(&body)?)
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn first_page(per_page: u32) -> Query {
    vec![
        ("per_page", per_page.clamp(1, PageSizes::MAX).to_string()),
        ("page", "1".to_string()),
    ]
}

/// Split `dir/sub/name` into `("dir/sub", "name")`; top-level files get an empty dir.
fn split_file_path(path: &str) -> (&str, &str) {
    let path = path.trim_matches('/');
    path.rsplit_once('/').unwrap_or(("", path))
}
