//! Error handling and configuration shared by the ghkit crates.
//!
//! The GitHub client itself lives in `ghkit-github`; this crate only holds
//! what both the client and the CLI need.

pub mod config;
pub mod error;

pub use config::{Config, GitHubConfig, PageSizes};
pub use error::{Error, Result};
