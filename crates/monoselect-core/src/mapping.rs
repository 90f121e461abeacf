//! Mapping table: `<location>:<pattern>;<module>;<json-params>` rules that
//! switch modules on when the diff, branch, tag or commit subject matches.

use crate::error::SelectError;
use crate::modules::directory_path;
use crate::params::{ParameterSet, parse_object};
use regex::Regex;
use std::collections::BTreeSet;
use std::str::FromStr;

const FIELD_SEPARATOR: char = ';';
const COMMENT_PREFIX: char = '#';

/// Where a rule's pattern is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Each line of the name-only diff, anchored at the start.
    Path,
    /// The current branch name, anchored at the start.
    Branch,
    /// The current tag name, anchored at the start.
    Tag,
    /// Subject of the most recent commit, unanchored.
    Subject,
}

impl Location {
    fn is_anchored(self) -> bool {
        !matches!(self, Self::Subject)
    }
}

impl FromStr for Location {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "branch" => Ok(Self::Branch),
            "tag" => Ok(Self::Tag),
            "subject" => Ok(Self::Subject),
            other => Err(SelectError::UnsupportedLocation(other.to_string())),
        }
    }
}

/// Values a rule predicate is evaluated against.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext<'a> {
    pub diff: &'a str,
    pub branch: &'a str,
    pub tag: &'a str,
    pub subject: &'a str,
}

/// One parsed line of the mapping table.
#[derive(Debug, Clone)]
pub struct MappingRule {
    line: String,
    location: Location,
    pattern: String,
    regex: Regex,
    module: String,
    params: String,
}

impl MappingRule {
    pub fn parse(line: &str) -> Result<Self, SelectError> {
        let line = line.trim();
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        let [predicate, module, params] = fields.as_slice() else {
            return Err(SelectError::MalformedMapping {
                line: line.to_string(),
                fields: fields.len(),
            });
        };

        let (location, pattern) =
            predicate
                .split_once(':')
                .ok_or_else(|| SelectError::MissingLocation {
                    line: line.to_string(),
                })?;
        let location: Location = location.trim().parse()?;

        let source = if location.is_anchored() {
            format!("^(?:{pattern})")
        } else {
            pattern.to_string()
        };
        let regex = Regex::new(&source).map_err(|source| SelectError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            line: line.to_string(),
            location,
            pattern: pattern.to_string(),
            regex,
            module: module.to_string(),
            params: params.to_string(),
        })
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn matches(&self, ctx: &MatchContext<'_>) -> bool {
        let pattern = &self.pattern;
        match self.location {
            Location::Path => {
                let hit = ctx
                    .diff
                    .lines()
                    .map(str::trim)
                    .any(|change| self.regex.is_match(change));
                if hit {
                    tracing::info!("Pattern '{pattern}' matched in diff.");
                }
                hit
            }
            Location::Branch => {
                let hit = self.regex.is_match(ctx.branch);
                if hit {
                    tracing::info!("Pattern '{pattern}' matched current branch.");
                }
                hit
            }
            Location::Tag => {
                let hit = self.regex.is_match(ctx.tag);
                if hit {
                    tracing::info!("Pattern '{pattern}' matched current tag.");
                }
                hit
            }
            Location::Subject => {
                let hit = self.regex.is_match(ctx.subject);
                if hit {
                    tracing::info!("Pattern '{pattern}' matched commit subject.");
                }
                hit
            }
        }
    }

    /// Parsed parameter fragment. Only called for matching rules.
    pub fn params(&self) -> Result<serde_json::Map<String, serde_json::Value>, SelectError> {
        parse_object(&self.params, &format!("mapping `{}`", self.line))
    }
}

/// Parse a multi-line mapping table, skipping blank and `#` lines.
pub fn parse_mappings(table: &str) -> Result<Vec<MappingRule>, SelectError> {
    table
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(MappingRule::parse)
        .collect()
}

/// Evaluate every rule in table order. Matching rules merge their params into
/// `params` and add their module directory to `modules`. Returns how many
/// rules matched.
pub fn apply_mappings(
    rules: &[MappingRule],
    ctx: &MatchContext<'_>,
    params: &mut ParameterSet,
    modules: &mut BTreeSet<String>,
) -> Result<usize, SelectError> {
    let mut matched = 0;
    for rule in rules {
        if !rule.matches(ctx) {
            continue;
        }
        params.merge(rule.params()?);
        if let Some(module) = directory_path(&rule.module) {
            modules.insert(module);
        }
        matched += 1;
    }
    Ok(matched)
}

pub fn needs_subject(rules: &[MappingRule]) -> bool {
    rules
        .iter()
        .any(|rule| rule.location() == Location::Subject)
}
