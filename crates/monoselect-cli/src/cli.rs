use clap::{Parser, Subcommand};
use monoselect_core::config::{
    DEFAULT_GITHUB_API_URL, DEFAULT_HEAD_REVISION, DEFAULT_MODULES_PATH, DEFAULT_PARAMS_PATH,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "monoselect",
    about = "Monoselect: pick the monorepo modules a CI pipeline should run",
    version
)]
pub struct Cli {
    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "MONOSELECT_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match the mapping table against the changes since the base revision and
    /// write pipeline parameters plus the selected module list
    SetParameters {
        /// Set by CircleCI; the command refuses to run without it
        #[arg(long, env = "CIRCLECI", hide = true)]
        circleci: Option<String>,

        /// Explicit base revision; skips every other resolution step
        #[arg(long, env = "BASE_REVISION")]
        base_revision: Option<String>,

        /// Head revision of the diff range
        #[arg(long, env = "CIRCLE_SHA1", default_value = DEFAULT_HEAD_REVISION)]
        head_revision: String,

        /// History windows to search for a shared commit (unset: 4, 0: no limit)
        #[arg(long, env = "MAX_AGE")]
        max_age: Option<String>,

        /// Size of one history window: second, minute, hour, day, week, month, year
        #[arg(long, env = "LOOKBACK_UNIT", default_value = "month")]
        lookback_unit: String,

        /// Read the base branch from the pull request when set
        #[arg(long, env = "GET_BASE_FROM_GITHUB")]
        get_base_from_github: Option<String>,

        /// Pull request URL (must contain `pull/<number>`)
        #[arg(long, env = "CIRCLE_PULL_REQUEST")]
        pull_request: Option<String>,

        /// Token for the GitHub REST API
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,

        /// Repository owner
        #[arg(long, env = "CIRCLE_PROJECT_USERNAME")]
        project_username: Option<String>,

        /// Repository name
        #[arg(long, env = "CIRCLE_PROJECT_REPONAME")]
        project_reponame: Option<String>,

        /// GitHub REST API base URL
        #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
        github_api_url: String,

        /// Current branch
        #[arg(long, env = "CIRCLE_BRANCH")]
        branch: Option<String>,

        /// Current tag
        #[arg(long, env = "CIRCLE_TAG")]
        tag: Option<String>,

        /// Mapping table, one `<location>:<pattern>;<module>;<json>` rule per line
        #[arg(long, env = "MAPPINGS", default_value = "")]
        mappings: String,

        /// JSON object the parameters start from
        #[arg(long, env = "DEFAULT_PARAMS", default_value = "{}")]
        default_params: String,

        /// Comma-separated modules that are always selected
        #[arg(long, env = "DEFAULT_MODULES", default_value = "")]
        default_modules: String,

        /// Output path for pipeline parameters JSON
        #[arg(long, env = "PARAMS_PATH", default_value = DEFAULT_PARAMS_PATH)]
        params_path: PathBuf,

        /// Output path for the selected module list
        #[arg(long, env = "MODULES_PATH", default_value = DEFAULT_MODULES_PATH)]
        modules_path: PathBuf,

        /// Repository root
        #[arg(long, default_value = ".")]
        repo_root: PathBuf,

        /// Do not run `git fetch --all` before diffing
        #[arg(long)]
        skip_fetch: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Turn module names into CI config paths, check they exist, and rewrite
    /// the module list
    PrepareModules {
        /// Comma-separated modules that are always included
        #[arg(long, env = "DEFAULT_MODULES", default_value = "")]
        default_modules: String,

        /// Module list written by `set-parameters`; rewritten in place
        #[arg(long, env = "MODULES_PATH", default_value = DEFAULT_MODULES_PATH)]
        modules_path: PathBuf,

        /// Directory config paths are resolved against
        #[arg(long, default_value = ".")]
        repo_root: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
