use crate::support::{emit_error, print_json};
use monoselect_core::config::{DEFAULT_HEAD_REVISION, clean};
use monoselect_core::{
    GitHubClient, GitHubLookup, Lookback, SelectError, SelectionConfig, set_parameters,
};
use monoselect_git::{GitClient, TimeUnit};
use serde_json::{Value, json};
use std::path::PathBuf;

pub struct Args {
    pub circleci: Option<String>,
    pub base_revision: Option<String>,
    pub head_revision: String,
    pub max_age: Option<String>,
    pub lookback_unit: String,
    pub get_base_from_github: Option<String>,
    pub pull_request: Option<String>,
    pub github_token: Option<String>,
    pub project_username: Option<String>,
    pub project_reponame: Option<String>,
    pub github_api_url: String,
    pub branch: Option<String>,
    pub tag: Option<String>,
    pub mappings: String,
    pub default_params: String,
    pub default_modules: String,
    pub params_path: PathBuf,
    pub modules_path: PathBuf,
    pub repo_root: PathBuf,
    pub skip_fetch: bool,
    pub json: bool,
}

fn build_config(args: Args) -> (SelectionConfig, bool) {
    // The CI precondition outranks malformed tuning values.
    let in_ci = clean(args.circleci).is_some();
    if !in_ci {
        emit_error(SelectError::NotInCi);
    }
    let lookback = Lookback::from_max_age(args.max_age.as_deref()).unwrap_or_else(|err| {
        emit_error(err);
    });
    let lookback_unit = args
        .lookback_unit
        .parse::<TimeUnit>()
        .unwrap_or_else(|err| emit_error(err));
    let default_params = clean(Some(args.default_params)).unwrap_or_else(|| "{}".to_string());

    let config = SelectionConfig {
        in_ci,
        repo_root: args.repo_root,
        base_revision: clean(args.base_revision),
        head_revision: clean(Some(args.head_revision))
            .unwrap_or_else(|| DEFAULT_HEAD_REVISION.to_string()),
        lookback,
        lookback_unit,
        github: GitHubLookup {
            enabled: clean(args.get_base_from_github).is_some(),
            pull_request_url: clean(args.pull_request),
            token: clean(args.github_token),
            org: clean(args.project_username),
            repo: clean(args.project_reponame),
            api_url: args.github_api_url,
        },
        branch: clean(args.branch).unwrap_or_default(),
        tag: clean(args.tag).unwrap_or_default(),
        mappings: args.mappings,
        default_params,
        default_modules: args.default_modules,
        params_path: args.params_path,
        modules_path: args.modules_path,
        fetch: !args.skip_fetch,
    };
    (config, args.json)
}

pub fn run(args: Args) {
    let (config, json_output) = build_config(args);
    tracing::debug!(
        "repo root {}, lookback {:?} per {}",
        config.repo_root.display(),
        config.lookback,
        config.lookback_unit
    );

    let git = GitClient::new(config.repo_root.clone());
    let pulls = GitHubClient::new(config.github.api_url.clone()).unwrap_or_else(|err| {
        emit_error(err);
    });
    let outcome = set_parameters(&config, &git, &pulls).unwrap_or_else(|err| {
        emit_error(err);
    });

    if json_output {
        let mut payload = serde_json::to_value(&outcome).unwrap_or_else(|err| {
            emit_error(format!("failed to render selection json: {err}"));
        });
        if let Value::Object(fields) = &mut payload {
            fields.insert(
                "paramsPath".to_string(),
                json!(config.params_path.display().to_string()),
            );
            fields.insert(
                "modulesPath".to_string(),
                json!(config.modules_path.display().to_string()),
            );
        }
        print_json(&payload);
        return;
    }

    println!("monoselect set-parameters");
    println!("  Range: {}..{}", outcome.base, outcome.head);
    println!("  Changed Paths: {}", outcome.changed_paths.len());
    println!("  Matched Rules: {}", outcome.matched_rules);
    println!("  Parameters: {}", config.params_path.display());
    println!(
        "  Modules: {} ({})",
        outcome.modules.len(),
        config.modules_path.display()
    );
}
