//! Base revision resolution.
//!
//! Tiers, first hit wins:
//! 1. explicit `BASE_REVISION`
//! 2. base branch of the pull request (optional, failures are soft)
//! 3. newest first-parent commit already shared with another branch,
//!    searched one time window at a time
//! 4. `HEAD~1`

use crate::config::{GitHubLookup, Lookback, SelectionConfig};
use crate::error::SelectError;
use crate::github::{PullBaseSource, PullRequestRef, parse_pull_number};
use crate::output::log_block;
use monoselect_git::{GitClient, GitError, TimeUnit, TimeWindow};

pub const FALLBACK_BASE: &str = "HEAD~1";
const TAGS_REMOTE: &str = "tags";

/// History queries the heuristic tier needs.
pub trait History {
    fn default_remote(&self) -> Result<Option<String>, GitError>;

    fn first_parent_commits(
        &self,
        reference: &str,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<String>, GitError>;

    fn branches_containing(&self, commit: &str) -> Result<Vec<String>, GitError>;
}

impl History for GitClient {
    fn default_remote(&self) -> Result<Option<String>, GitError> {
        GitClient::default_remote(self)
    }

    fn first_parent_commits(
        &self,
        reference: &str,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<String>, GitError> {
        GitClient::first_parent_commits(self, reference, window)
    }

    fn branches_containing(&self, commit: &str) -> Result<Vec<String>, GitError> {
        GitClient::branches_containing(self, commit)
    }
}

pub fn resolve_base(
    config: &SelectionConfig,
    history: &impl History,
    pulls: &impl PullBaseSource,
) -> Result<String, SelectError> {
    let mut base = config
        .base_revision
        .clone()
        .filter(|base| !base.trim().is_empty());
    let mut message = format!("Base revision set to {}", base.as_deref().unwrap_or_default());

    if base.is_none()
        && let Some(found) = base_from_pull(&config.github, pulls)?
    {
        message = format!("Got base from GitHub pull request: {found}");
        base = Some(found);
    }

    if base.is_none() {
        if let Some(reference) = history_reference(history, &config.branch, &config.tag)? {
            base = find_parent_commit(
                history,
                &reference,
                config.lookback,
                config.lookback_unit,
            )?;
            message = format!("Got base commit: {}", base.as_deref().unwrap_or_default());
        } else {
            tracing::warn!("neither branch nor tag is set; skipping history search");
        }
    }

    let base = base.unwrap_or_else(|| {
        message = format!("No base found! Will use {FALLBACK_BASE} as base.");
        FALLBACK_BASE.to_string()
    });
    log_block("base_revision", &message);
    Ok(base)
}

/// Base branch declared on the pull request, when the lookup is enabled and
/// succeeds. Only a malformed pull request URL is fatal.
fn base_from_pull(
    lookup: &GitHubLookup,
    pulls: &impl PullBaseSource,
) -> Result<Option<String>, SelectError> {
    if !lookup.enabled {
        return Ok(None);
    }
    let Some(pull_url) = lookup.pull_request_url.as_deref() else {
        return Ok(None);
    };
    let Some(token) = lookup.token.as_deref() else {
        log_block(
            "get base from github",
            "GET_BASE_FROM_GITHUB environment variable is set, but GITHUB_TOKEN is missing. \
             Cannot proceed to get the base from GitHub pull request.",
        );
        return Ok(None);
    };

    let pull = PullRequestRef {
        org: lookup.org.clone().unwrap_or_default(),
        repo: lookup.repo.clone().unwrap_or_default(),
        number: parse_pull_number(pull_url)?,
    };
    match pulls.base_ref(&pull, token) {
        Ok(reference) if !reference.is_empty() => Ok(Some(reference)),
        Ok(_) => {
            log_block(
                "get base from github",
                format!("pull request #{} has no base ref", pull.number),
            );
            Ok(None)
        }
        Err(err) => {
            log_block("get base from github FAILED", err);
            Ok(None)
        }
    }
}

/// Ref whose first-parent line is searched: `<remote>/<branch>`, or
/// `tags/<tag>` when only a tag is known.
fn history_reference(
    history: &impl History,
    branch: &str,
    tag: &str,
) -> Result<Option<String>, SelectError> {
    let (name, remote) = if !branch.is_empty() {
        (branch, history.default_remote()?)
    } else if !tag.is_empty() {
        (tag, Some(TAGS_REMOTE.to_string()))
    } else {
        return Ok(None);
    };

    Ok(Some(match remote {
        Some(remote) if !remote.is_empty() => {
            format!("{}/{name}", remote.trim_end_matches('/'))
        }
        _ => name.to_string(),
    }))
}

/// Walk `reference` one window at a time, newest first, and return the first
/// commit that more than one branch contains.
pub fn find_parent_commit(
    history: &impl History,
    reference: &str,
    lookback: Lookback,
    unit: TimeUnit,
) -> Result<Option<String>, SelectError> {
    let mut since = 1;
    loop {
        let window = match lookback {
            Lookback::Unlimited => None,
            Lookback::Windows(max) if since <= max => Some(TimeWindow::new(since, unit)),
            Lookback::Windows(_) => return Ok(None),
        };

        let commits = history.first_parent_commits(reference, window.as_ref())?;
        tracing::info!(
            "{} commits to go through. Was looking at {}",
            commits.len(),
            window.map(|window| window.to_string()).unwrap_or_default()
        );

        for commit in &commits {
            tracing::debug!("Checking {commit}");
            let branches = history.branches_containing(commit)?;
            if branches.len() > 1 {
                log_block(
                    "base commit",
                    format!("{commit}\npresent in: {branches:?} branches"),
                );
                return Ok(Some(commit.clone()));
            }
        }

        // Without a window the whole history was just searched.
        if window.is_none() {
            return Ok(None);
        }
        since += 1;
    }
}
