use crate::support::{emit_error, print_json};
use monoselect_core::{ModulesConfig, prepare_modules};
use serde_json::json;
use std::path::PathBuf;

pub struct Args {
    pub default_modules: String,
    pub modules_path: PathBuf,
    pub repo_root: PathBuf,
    pub json: bool,
}

pub fn run(args: Args) {
    let config = ModulesConfig {
        repo_root: args.repo_root,
        default_modules: args.default_modules,
        modules_path: args.modules_path,
    };

    tracing::debug!("reading modules from {}", config.modules_path.display());
    let modules = prepare_modules(&config).unwrap_or_else(|err| {
        emit_error(err);
    });

    if args.json {
        print_json(&json!({
            "modules": modules,
            "modulesPath": config.modules_path.display().to_string(),
        }));
        return;
    }

    println!("monoselect prepare-modules");
    println!("  Source: {}", config.modules_path.display());
    println!("  Modules: {}", modules.len());
    for module in &modules {
        println!("    - {module}");
    }
}
