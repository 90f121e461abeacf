//! Monoselect CLI: the `monoselect` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logging(&cli.log_level);

    match cli.command {
        Commands::SetParameters {
            circleci,
            base_revision,
            head_revision,
            max_age,
            lookback_unit,
            get_base_from_github,
            pull_request,
            github_token,
            project_username,
            project_reponame,
            github_api_url,
            branch,
            tag,
            mappings,
            default_params,
            default_modules,
            params_path,
            modules_path,
            repo_root,
            skip_fetch,
            json,
        } => commands::set_parameters::run(commands::set_parameters::Args {
            circleci,
            base_revision,
            head_revision,
            max_age,
            lookback_unit,
            get_base_from_github,
            pull_request,
            github_token,
            project_username,
            project_reponame,
            github_api_url,
            branch,
            tag,
            mappings,
            default_params,
            default_modules,
            params_path,
            modules_path,
            repo_root,
            skip_fetch,
            json,
        }),

        Commands::PrepareModules {
            default_modules,
            modules_path,
            repo_root,
            json,
        } => commands::prepare_modules::run(commands::prepare_modules::Args {
            default_modules,
            modules_path,
            repo_root,
            json,
        }),
    }
}
