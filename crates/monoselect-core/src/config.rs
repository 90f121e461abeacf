//! Run configuration, built once at process start and passed down by
//! reference. Nothing below this module reads the process environment.

use crate::error::SelectError;
use monoselect_git::TimeUnit;
use std::path::PathBuf;

pub const DEFAULT_PARAMS_PATH: &str = "/tmp/pipeline-parameters.json";
pub const DEFAULT_MODULES_PATH: &str = "/tmp/modules.txt";
pub const DEFAULT_HEAD_REVISION: &str = "HEAD";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_AGE: u32 = 4;

/// How far back the history heuristic may look for a shared commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// Search the whole first-parent history in one pass.
    Unlimited,
    /// Search at most this many unit-sized windows, newest first.
    Windows(u32),
}

impl Default for Lookback {
    fn default() -> Self {
        Self::Windows(DEFAULT_MAX_AGE)
    }
}

impl Lookback {
    /// Interpret a raw `MAX_AGE` value: unset is the default window count,
    /// `0` disables the limit, anything else bounds the search.
    pub fn from_max_age(raw: Option<&str>) -> Result<Self, SelectError> {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self::default());
        };
        match raw.parse::<u32>() {
            Ok(0) => Ok(Self::Unlimited),
            Ok(windows) => Ok(Self::Windows(windows)),
            Err(_) => Err(SelectError::InvalidLookback(raw.to_string())),
        }
    }
}

/// Settings for reading the base branch off the pull request.
#[derive(Debug, Clone, Default)]
pub struct GitHubLookup {
    pub enabled: bool,
    pub pull_request_url: Option<String>,
    pub token: Option<String>,
    pub org: Option<String>,
    pub repo: Option<String>,
    pub api_url: String,
}

/// Inputs of `set-parameters`.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub in_ci: bool,
    pub repo_root: PathBuf,
    pub base_revision: Option<String>,
    pub head_revision: String,
    pub lookback: Lookback,
    pub lookback_unit: TimeUnit,
    pub github: GitHubLookup,
    pub branch: String,
    pub tag: String,
    pub mappings: String,
    pub default_params: String,
    pub default_modules: String,
    pub params_path: PathBuf,
    pub modules_path: PathBuf,
    pub fetch: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            in_ci: false,
            repo_root: PathBuf::from("."),
            base_revision: None,
            head_revision: DEFAULT_HEAD_REVISION.to_string(),
            lookback: Lookback::default(),
            lookback_unit: TimeUnit::default(),
            github: GitHubLookup {
                api_url: DEFAULT_GITHUB_API_URL.to_string(),
                ..GitHubLookup::default()
            },
            branch: String::new(),
            tag: String::new(),
            mappings: String::new(),
            default_params: "{}".to_string(),
            default_modules: String::new(),
            params_path: PathBuf::from(DEFAULT_PARAMS_PATH),
            modules_path: PathBuf::from(DEFAULT_MODULES_PATH),
            fetch: true,
        }
    }
}

/// Inputs of `prepare-modules`.
#[derive(Debug, Clone)]
pub struct ModulesConfig {
    pub repo_root: PathBuf,
    pub default_modules: String,
    pub modules_path: PathBuf,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            default_modules: String::new(),
            modules_path: PathBuf::from(DEFAULT_MODULES_PATH),
        }
    }
}

/// Trim a raw option value; blank counts as unset.
pub fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
