//! Convenience client for the GitHub REST API.
//!
//! [`GitHubClient`] wraps repositories, branches, tags, git references,
//! trees, users, pull requests and file downloads for one organization.
//! Every operation is available twice: as a fallible inherent method, and
//! through the [`Operations`] facade, which turns failures into `None`.
//!
//! ```ignore
//! use ghkit_github::{GitHubClient, Operations};
//!
//! let client = GitHubClient::new(token)?
//!     .with_organization("meteora-pro")
//!     .with_all_pages(true);
//!
//! let branches = client.branches("ghkit").await.unwrap_or_default();
//! ```

mod client;
mod operations;
pub mod pagination;
mod types;

pub use client::GitHubClient;
pub use operations::Operations;
pub use pagination::{parse_link_header, LinkPagination, Page};
pub use types::*;

/// Default GitHub API URL.
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
