//! Pull-request base lookup against the GitHub REST API.

use crate::error::SelectError;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

fn pull_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"pull/(?P<pull_num>\d+)").expect("pull number regex must compile")
    })
}

/// Failures of the optional lookup. Callers log these and move on.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{status} returned by {url}")]
    Status { url: String, status: u16 },

    #[error("unable to decode pull request payload from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Repository coordinates plus pull request number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub org: String,
    pub repo: String,
    pub number: u64,
}

/// Extract the number from a pull request URL such as
/// `https://github.com/org/repo/pull/42`.
pub fn parse_pull_number(url: &str) -> Result<u64, SelectError> {
    pull_number_re()
        .captures(url)
        .and_then(|caps| caps.name("pull_num"))
        .and_then(|number| number.as_str().parse().ok())
        .ok_or_else(|| SelectError::InvalidPullRequestUrl(url.to_string()))
}

/// Source of a pull request's declared base branch.
pub trait PullBaseSource {
    /// Base branch name; empty when the payload carries none.
    fn base_ref(&self, pull: &PullRequestRef, token: &str) -> Result<String, GitHubError>;
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    #[serde(default)]
    base: Option<PullBase>,
}

#[derive(Debug, Deserialize)]
struct PullBase {
    #[serde(default, rename = "ref")]
    reference: Option<String>,
}

/// Blocking REST client.
pub struct GitHubClient {
    api_base_url: String,
    http_client: reqwest::blocking::Client,
}

impl GitHubClient {
    pub fn new(api_base_url: impl Into<String>) -> Result<Self, GitHubError> {
        let api_base_url = api_base_url.into();
        let http_client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|err| GitHubError::Http {
                url: api_base_url.clone(),
                message: err.to_string(),
            })?;
        Ok(Self {
            api_base_url,
            http_client,
        })
    }

    pub fn pull_url(&self, pull: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_base_url.trim_end_matches('/'),
            pull.org,
            pull.repo,
            pull.number
        )
    }
}

impl PullBaseSource for GitHubClient {
    fn base_ref(&self, pull: &PullRequestRef, token: &str) -> Result<String, GitHubError> {
        let url = self.pull_url(pull);
        let user_agent = if pull.org.is_empty() {
            "monoselect"
        } else {
            pull.org.as_str()
        };
        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("token {token}"))
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .map_err(|err| GitHubError::Http {
                url: url.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let payload: PullPayload = response.json().map_err(|err| GitHubError::Decode {
            url: url.clone(),
            message: err.to_string(),
        })?;
        Ok(payload
            .base
            .and_then(|base| base.reference)
            .unwrap_or_default())
    }
}
