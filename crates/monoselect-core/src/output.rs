//! Output files and divider-framed log blocks.

use crate::error::SelectError;
use crate::params::ParameterSet;
use std::fmt::Display;
use std::fs;
use std::path::Path;

const DIVIDER: char = '=';
const BLOCK_WIDTH: usize = 64;

/// Frame `data` under a centered `name` header and a closing rule.
pub fn render_block(name: &str, data: &str) -> String {
    let half = BLOCK_WIDTH.saturating_sub(name.chars().count() + 2) / 2;
    let bar = DIVIDER.to_string().repeat(half);
    let rule = DIVIDER.to_string().repeat(BLOCK_WIDTH);
    format!("{bar} {name} {bar}\n{data}\n{rule}")
}

pub fn log_block(name: &str, data: impl Display) {
    tracing::info!("\n{}", render_block(name, &data.to_string()));
}

pub fn write_params(path: &Path, params: &ParameterSet) -> Result<(), SelectError> {
    fs::write(path, params.to_pretty_json()).map_err(|err| SelectError::io(path, err))
}

/// One entry per line, each newline-terminated.
pub fn write_modules<'a>(
    path: &Path,
    modules: impl IntoIterator<Item = &'a String>,
) -> Result<(), SelectError> {
    let body: String = modules
        .into_iter()
        .map(|module| format!("{module}\n"))
        .collect();
    fs::write(path, body).map_err(|err| SelectError::io(path, err))
}
