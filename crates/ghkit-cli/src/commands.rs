//! Command handlers.
//!
//! API commands only talk to [`Operations`], so they run against the real
//! client in `main` and against a mock in tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Subcommand, ValueEnum};
use ghkit_core::Config;
use ghkit_github::{Operations, RepoFilter};
use serde::Serialize;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ApiCommand {
    /// List organization repositories
    Repos {
        /// all, public, private, forks, sources, member
        #[arg(long = "type")]
        repo_type: Option<String>,
        /// created, updated, pushed, full_name
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one repository
    Repo { repo: String },

    /// List branches of a repository
    Branches { repo: String },

    /// Show one branch
    Branch { repo: String, name: String },

    /// List tags of a repository
    Tags { repo: String },

    /// Find a tag by name
    Tag { repo: String, name: String },

    /// Show a git reference
    Ref {
        repo: String,
        name: String,
        #[arg(long, value_enum, default_value = "heads")]
        kind: RefKind,
    },

    /// Create a branch reference pointing at a commit
    CreateRef {
        repo: String,
        branch: String,
        sha: String,
    },

    /// Show a git commit
    Commit { repo: String, sha: String },

    /// Compare two commits, branches or tags
    Compare {
        repo: String,
        base: String,
        head: String,
    },

    /// Merge head into base
    Merge {
        repo: String,
        base: String,
        head: String,
        #[arg(short, long, default_value = "")]
        message: String,
    },

    /// Create a tree from local files on top of a branch
    Tree {
        repo: String,
        /// Comma-separated list of local files
        files: String,
        #[arg(long, default_value = "main")]
        branch: String,
    },

    /// List organization members (all users without an organization)
    Users,

    /// Show a user (the authenticated one when omitted)
    User { login: Option<String> },

    /// Pull request commands
    Pr {
        #[command(subcommand)]
        command: PrCommand,
    },

    /// Download a file from a repository
    Download {
        repo: String,
        path: String,
        /// Branch, tag or SHA (default branch when omitted)
        #[arg(long = "ref", default_value = "")]
        reference: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// Open a pull request
    Create {
        repo: String,
        /// Source branch (`owner:branch` for forks)
        head: String,
        /// Target branch
        base: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        body: String,
    },

    /// Request reviews on a pull request
    Reviewers {
        repo: String,
        number: u64,
        #[arg(required = true)]
        reviewers: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a value, e.g. `github.organization acme`
    Set { key: String, value: String },

    /// Get a value
    Get { key: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefKind {
    Heads,
    Tag,
    Branch,
}

fn print_json<T: Serialize>(out: &mut dyn Write, what: &str, value: Option<T>) -> anyhow::Result<()> {
    let value = value.ok_or_else(|| anyhow!("{} not found", what))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

/// Run one API command and print its result as JSON.
pub async fn run(ops: &dyn Operations, command: ApiCommand, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        ApiCommand::Repos { repo_type, sort } => {
            let filter = RepoFilter { repo_type, sort };
            print_json(out, "repositories", ops.repositories(&filter).await)
        }
        ApiCommand::Repo { repo } => print_json(out, "repository", ops.repository(&repo).await),
        ApiCommand::Branches { repo } => print_json(out, "branches", ops.branches(&repo).await),
        ApiCommand::Branch { repo, name } => {
            print_json(out, "branch", ops.branch(&repo, &name).await)
        }
        ApiCommand::Tags { repo } => print_json(out, "tags", ops.tags(&repo).await),
        ApiCommand::Tag { repo, name } => {
            print_json(out, "tag", ops.tag_by_name(&repo, &name).await)
        }
        ApiCommand::Ref { repo, name, kind } => {
            let reference = match kind {
                RefKind::Heads => ops.reference_by_heads(&repo, &name).await,
                RefKind::Tag => ops.reference_by_tag(&repo, &name).await,
                RefKind::Branch => ops.reference_by_branch(&repo, &name).await,
            };
            print_json(out, "reference", reference)
        }
        ApiCommand::CreateRef { repo, branch, sha } => print_json(
            out,
            "created reference",
            ops.create_refs(&repo, &branch, &sha).await,
        ),
        ApiCommand::Commit { repo, sha } => print_json(out, "commit", ops.commit(&repo, &sha).await),
        ApiCommand::Compare { repo, base, head } => print_json(
            out,
            "comparison",
            ops.compare(&repo, &base, &head).await,
        ),
        ApiCommand::Merge {
            repo,
            base,
            head,
            message,
        } => print_json(
            out,
            "merge commit",
            ops.merge(&repo, &base, &head, &message).await,
        ),
        ApiCommand::Tree {
            repo,
            files,
            branch,
        } => {
            let reference = ops
                .reference_by_heads(&repo, &branch)
                .await
                .ok_or_else(|| anyhow!("branch {} not found", branch))?;
            print_json(out, "tree", ops.tree(&repo, &files, &reference).await)
        }
        ApiCommand::Users => print_json(out, "users", ops.users().await),
        ApiCommand::User { login } => print_json(
            out,
            "user",
            ops.user(login.as_deref().unwrap_or_default()).await,
        ),
        ApiCommand::Pr { command } => match command {
            PrCommand::Create {
                repo,
                head,
                base,
                title,
                body,
            } => {
                let pr = ops
                    .create_pull_request(&repo, &head, &base, &title, &body)
                    .await?;
                info!(number = pr.number, url = pr.html_url.as_str(), "Pull request opened");
                print_json(out, "pull request", Some(pr))
            }
            PrCommand::Reviewers {
                repo,
                number,
                reviewers,
            } => print_json(
                out,
                "pull request",
                ops.assign_reviewers(number, &repo, &reviewers).await,
            ),
        },
        ApiCommand::Download {
            repo,
            path,
            reference,
            output,
        } => {
            let response = ops.download(&repo, &reference, &path).await?;
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read {}", path))?;
            match output {
                Some(target) => {
                    tokio::fs::write(&target, &bytes)
                        .await
                        .with_context(|| format!("Failed to write {}", target.display()))?;
                    info!(path = %target.display(), size = bytes.len(), "File downloaded");
                }
                None => out.write_all(&bytes)?,
            }
            Ok(())
        }
    }
}

/// Run a config command against the file at `path`.
pub fn run_config(
    config: &mut Config,
    path: &Path,
    command: ConfigCommand,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Show => {
            writeln!(out, "# {}", path.display())?;
            write!(out, "{}", toml::to_string_pretty(&*config)?)?;
        }
        ConfigCommand::Set { key, value } => {
            config.set(&key, &value)?;
            config.save_to(path)?;
            info!(key = key.as_str(), "Config updated");
        }
        ConfigCommand::Get { key } => match config.get(&key)? {
            Some(value) => writeln!(out, "{}", value)?,
            None => writeln!(out, "(not set)")?,
        },
    }
    Ok(())
}
