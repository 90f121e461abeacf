//! The two pipeline stages: `set-parameters` picks modules and parameters
//! from the change set, `prepare-modules` turns module names into validated
//! config paths.

use crate::config::{ModulesConfig, SelectionConfig};
use crate::error::SelectError;
use crate::github::PullBaseSource;
use crate::mapping::{MatchContext, apply_mappings, needs_subject, parse_mappings};
use crate::modules::{check_configs_exist, collect_modules, directory_path, split_module_list};
use crate::output::{log_block, write_modules, write_params};
use crate::params::ParameterSet;
use crate::resolver::resolve_base;
use monoselect_git::GitClient;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;

/// What `set-parameters` decided and wrote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOutcome {
    pub base: String,
    pub head: String,
    pub changed_paths: Vec<String>,
    pub matched_rules: usize,
    pub parameters: serde_json::Value,
    pub modules: Vec<String>,
}

pub fn set_parameters(
    config: &SelectionConfig,
    git: &GitClient,
    pulls: &impl PullBaseSource,
) -> Result<SelectionOutcome, SelectError> {
    if !config.in_ci {
        return Err(SelectError::NotInCi);
    }

    let rules = parse_mappings(&config.mappings)?;
    let mut params = ParameterSet::from_json(&config.default_params, "DEFAULT_PARAMS")?;

    let base = resolve_base(config, git, pulls)?;
    let head = config.head_revision.clone();
    if config.fetch {
        git.fetch_all()?;
    }
    tracing::info!("Getting diff: {base}..{head}");
    let diff = git.diff_name_only(&base, &head)?;
    log_block("files changed", &diff);

    let subject = if needs_subject(&rules) {
        git.last_commit_subject()?
    } else {
        String::new()
    };
    let ctx = MatchContext {
        diff: &diff,
        branch: &config.branch,
        tag: &config.tag,
        subject: &subject,
    };

    let mut modules: BTreeSet<String> = split_module_list(&config.default_modules)
        .filter_map(directory_path)
        .collect();
    let matched_rules = apply_mappings(&rules, &ctx, &mut params, &mut modules)?;

    write_params(&config.params_path, &params)?;
    write_modules(&config.modules_path, &modules)?;
    log_block("set params", params.to_pretty_json());

    Ok(SelectionOutcome {
        base,
        head,
        changed_paths: diff
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        matched_rules,
        parameters: params.to_value(),
        modules: modules.into_iter().collect(),
    })
}

/// Merge `DEFAULT_MODULES` with the module file, validate every config path
/// and rewrite the file with the normalized set. Nothing is written when a
/// config is missing.
pub fn prepare_modules(config: &ModulesConfig) -> Result<BTreeSet<String>, SelectError> {
    let listed = fs::read_to_string(&config.modules_path)
        .map_err(|err| SelectError::io(&config.modules_path, err))?;

    let modules = collect_modules(
        split_module_list(&config.default_modules).chain(listed.lines()),
    );
    if modules.is_empty() {
        tracing::info!("Modules file is empty");
    }

    check_configs_exist(&config.repo_root, &modules)?;
    write_modules(&config.modules_path, &modules)?;
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn modules_config(tmp: &TempDir, default_modules: &str, listed: &str) -> ModulesConfig {
        let modules_path = tmp.path().join("modules.txt");
        fs::write(&modules_path, listed).unwrap();
        ModulesConfig {
            repo_root: tmp.path().to_path_buf(),
            default_modules: default_modules.to_string(),
            modules_path,
        }
    }

    fn add_config(tmp: &TempDir, module: &str) {
        let dir = tmp.path().join(module).join(".circleci");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), "version: 2.1\n").unwrap();
    }

    #[test]
    fn defaults_and_listed_modules_merge() {
        let tmp = TempDir::new().unwrap();
        for module in ["module1", "module2", "module3"] {
            add_config(&tmp, module);
        }
        let config = modules_config(&tmp, "module1,module2", "module1/\nmodule3/\n");

        let modules = prepare_modules(&config).expect("modules should validate");
        assert_eq!(
            modules.into_iter().collect::<Vec<_>>(),
            vec![
                "module1/.circleci/config.yml",
                "module2/.circleci/config.yml",
                "module3/.circleci/config.yml",
            ]
        );
        assert_eq!(
            fs::read_to_string(&config.modules_path).unwrap(),
            "module1/.circleci/config.yml\nmodule2/.circleci/config.yml\nmodule3/.circleci/config.yml\n"
        );
    }

    #[test]
    fn empty_inputs_write_empty_file() {
        let tmp = TempDir::new().unwrap();
        let config = modules_config(&tmp, "", "");
        assert!(prepare_modules(&config).unwrap().is_empty());
        assert_eq!(fs::read_to_string(&config.modules_path).unwrap(), "");
    }

    #[test]
    fn missing_config_leaves_module_file_untouched() {
        let tmp = TempDir::new().unwrap();
        add_config(&tmp, "module1");
        let config = modules_config(&tmp, "module1", "ghost/\n");

        let err = prepare_modules(&config).unwrap_err();
        assert!(matches!(err, SelectError::ConfigNotFound { .. }));
        assert_eq!(fs::read_to_string(&config.modules_path).unwrap(), "ghost/\n");
    }

    #[test]
    fn missing_module_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let config = ModulesConfig {
            repo_root: tmp.path().to_path_buf(),
            default_modules: String::new(),
            modules_path: tmp.path().join("absent.txt"),
        };
        assert!(matches!(
            prepare_modules(&config),
            Err(SelectError::Io { .. })
        ));
    }

    #[test]
    fn set_parameters_requires_ci() {
        let tmp = TempDir::new().unwrap();
        let config = SelectionConfig::default();
        let git = GitClient::new(tmp.path());
        let pulls = crate::github::GitHubClient::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            set_parameters(&config, &git, &pulls),
            Err(SelectError::NotInCi)
        ));
    }
}
