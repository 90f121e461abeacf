//! # monoselect-core
//!
//! Decides which modules of a monorepo a CI pipeline should run, from the
//! files changed between two revisions.
//!
//! ```text
//! resolver     ← base revision: explicit / pull request / shared commit / HEAD~1
//!     │
//! mapping      ← `<location>:<pattern>;<module>;<json>` rules over diff, branch, tag, subject
//!     │
//! params       ← right-biased merge of matching rule fragments
//!     │
//! output       ← parameters JSON + module list
//!
//! modules      ← module names → validated `.circleci/config.yml` paths
//! ```

pub mod config;
pub mod error;
pub mod github;
pub mod mapping;
pub mod modules;
pub mod output;
pub mod params;
pub mod resolver;
pub mod selection;

pub use config::{GitHubLookup, Lookback, ModulesConfig, SelectionConfig};
pub use error::SelectError;
pub use github::{GitHubClient, GitHubError, PullBaseSource, PullRequestRef};
pub use mapping::{Location, MappingRule, MatchContext, apply_mappings, parse_mappings};
pub use modules::{check_configs_exist, collect_modules, normalize_module};
pub use output::{log_block, render_block};
pub use params::ParameterSet;
pub use resolver::{FALLBACK_BASE, History, find_parent_commit, resolve_base};
pub use selection::{SelectionOutcome, prepare_modules, set_parameters};
