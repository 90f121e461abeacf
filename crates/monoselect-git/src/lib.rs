//! `git` queries behind module selection: which remote and branches hold a
//! commit, the first-parent line of a ref within a time window, the files
//! changed across a range, and the latest commit subject.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

/// Errors from interacting with a git repository.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("git executable is not available in PATH")]
    NotInstalled,

    #[error("git command failed: git {args} ({message})")]
    CommandFailed { args: String, message: String },

    #[error("unable to parse git output: {0}")]
    Parse(String),
}

/// Granularity of one history search window, spelled the way git's
/// approxidate parser expects (`1.month.ago`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = GitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_end_matches('s') {
            "second" => Ok(Self::Second),
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(GitError::Parse(format!("unknown time unit `{other}`"))),
        }
    }
}

/// One unit-sized slice of history: commits made between `since` and
/// `since - 1` units ago.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub since: u32,
    pub unit: TimeUnit,
}

impl TimeWindow {
    pub fn new(since: u32, unit: TimeUnit) -> Self {
        Self { since, unit }
    }

    /// `rev-list` filter arguments for this window.
    pub fn args(&self) -> [String; 4] {
        [
            "--after".to_string(),
            format!("{}.{}.ago", self.since, self.unit),
            "--before".to_string(),
            format!("{}.{}.ago", self.since.saturating_sub(1), self.unit),
        ]
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.args().join(" "))
    }
}

/// Thin client around the `git` CLI, bound to one working directory.
#[derive(Debug, Clone)]
pub struct GitClient {
    repo_root: PathBuf,
}

impl GitClient {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// First remote reported by `git remote show`, if any.
    pub fn default_remote(&self) -> Result<Option<String>, GitError> {
        let stdout = run_git(&self.repo_root, &["remote", "show"])?;
        Ok(first_nonempty_line(&stdout).map(ToOwned::to_owned))
    }

    /// Commits on the first-parent line of `reference`, newest first,
    /// optionally restricted to one time window.
    pub fn first_parent_commits(
        &self,
        reference: &str,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<String>, GitError> {
        let mut args: Vec<String> = vec!["rev-list".to_string(), "--first-parent".to_string()];
        if let Some(window) = window {
            args.extend(window.args());
        }
        args.push(reference.to_string());
        let stdout = run_git_owned(&self.repo_root, &args)?;
        Ok(nonempty_lines(&stdout))
    }

    /// Local branches whose history contains `commit`.
    pub fn branches_containing(&self, commit: &str) -> Result<Vec<String>, GitError> {
        let stdout = run_git(&self.repo_root, &["branch", "--contains", commit])?;
        Ok(stdout
            .lines()
            .map(|line| line.trim_start_matches('*').trim())
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect())
    }

    /// Raw `git diff --name-only base..head` output.
    pub fn diff_name_only(&self, base: &str, head: &str) -> Result<String, GitError> {
        let range = format!("{base}..{head}");
        run_git(&self.repo_root, &["diff", "--name-only", &range])
    }

    /// `git log --pretty=<format> -n <count>` output.
    pub fn commit_part(&self, format: &str, count: usize) -> Result<String, GitError> {
        let pretty = format!("--pretty={format}");
        let count = count.to_string();
        run_git(&self.repo_root, &["log", &pretty, "-n", &count])
    }

    /// Subject line of the most recent commit.
    pub fn last_commit_subject(&self) -> Result<String, GitError> {
        self.commit_part("%s", 1)
    }

    pub fn fetch_all(&self) -> Result<(), GitError> {
        let stdout = run_git(&self.repo_root, &["fetch", "--all"])?;
        if !stdout.is_empty() {
            tracing::debug!("{stdout}");
        }
        Ok(())
    }
}

fn run_git(cwd: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git")
        .arg("--no-pager")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                GitError::NotInstalled
            } else {
                GitError::CommandFailed {
                    args: args.join(" "),
                    message: err.to_string(),
                }
            }
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            "unknown error".to_string()
        } else {
            stderr
        };
        Err(GitError::CommandFailed {
            args: args.join(" "),
            message,
        })
    }
}

fn run_git_owned(cwd: &Path, args: &[String]) -> Result<String, GitError> {
    let borrowed: Vec<&str> = args.iter().map(String::as_str).collect();
    run_git(cwd, &borrowed)
}

fn first_nonempty_line(input: &str) -> Option<&str> {
    input.lines().map(str::trim).find(|line| !line.is_empty())
}

fn nonempty_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git(repo: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=Monoselect Test",
                "-c",
                "user.email=monoselect@example.com",
            ])
            .args(args)
            .current_dir(repo)
            .output()
            .expect("git command should execute");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    fn commit_file(repo: &Path, name: &str, message: &str) -> String {
        fs::write(repo.join(name), format!("{message}\n")).expect("file should be written");
        git(repo, &["add", name]);
        git(repo, &["commit", "--quiet", "-m", message]);
        git(repo, &["rev-parse", "HEAD"])
    }

    /// main: first commit; new_branch: first commit + second commit.
    fn sample_repo() -> (TempDir, Vec<String>) {
        let tmp = TempDir::new().expect("temp dir should be created");
        let repo = tmp.path();
        git(repo, &["init", "--quiet"]);
        git(repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        let first = commit_file(repo, "initial_file", "first commit");
        git(repo, &["checkout", "--quiet", "-b", "new_branch"]);
        let second = commit_file(repo, "changed_file", "second commit");
        (tmp, vec![first, second])
    }

    #[test]
    fn first_nonempty_line_finds_trimmed_line() {
        assert_eq!(first_nonempty_line("\n\n  origin  \n"), Some("origin"));
        assert_eq!(first_nonempty_line(" \n\t\n"), None);
    }

    #[test]
    fn time_window_renders_rev_list_filters() {
        let window = TimeWindow::new(2, TimeUnit::Month);
        assert_eq!(
            window.to_string(),
            "--after 2.month.ago --before 1.month.ago"
        );
        assert_eq!(
            TimeWindow::new(1, TimeUnit::Second).to_string(),
            "--after 1.second.ago --before 0.second.ago"
        );
    }

    #[test]
    fn time_unit_parses_singular_and_plural() {
        assert_eq!("month".parse::<TimeUnit>().unwrap(), TimeUnit::Month);
        assert_eq!("Weeks".parse::<TimeUnit>().unwrap(), TimeUnit::Week);
        assert!("fortnight".parse::<TimeUnit>().is_err());
        assert_eq!(TimeUnit::default(), TimeUnit::Month);
    }

    #[test]
    fn diff_lists_changed_files_between_branches() {
        let (tmp, _) = sample_repo();
        let client = GitClient::new(tmp.path());
        let diff = client
            .diff_name_only("main", "new_branch")
            .expect("diff should run");
        assert_eq!(diff, "changed_file");
    }

    #[test]
    fn last_commit_subject_reads_head() {
        let (tmp, _) = sample_repo();
        let client = GitClient::new(tmp.path());
        assert_eq!(
            client.last_commit_subject().expect("log should run"),
            "second commit"
        );
    }

    #[test]
    fn branch_containment_distinguishes_shared_commits() {
        let (tmp, commits) = sample_repo();
        let client = GitClient::new(tmp.path());

        let shared = client
            .branches_containing(&commits[0])
            .expect("branch listing should run");
        assert_eq!(shared, vec!["main".to_string(), "new_branch".to_string()]);

        let own = client
            .branches_containing(&commits[1])
            .expect("branch listing should run");
        assert_eq!(own, vec!["new_branch".to_string()]);
    }

    #[test]
    fn first_parent_commits_are_newest_first() {
        let (tmp, commits) = sample_repo();
        let client = GitClient::new(tmp.path());
        let listed = client
            .first_parent_commits("new_branch", None)
            .expect("rev-list should run");
        assert_eq!(listed, vec![commits[1].clone(), commits[0].clone()]);

        let window = TimeWindow::new(1, TimeUnit::Year);
        let windowed = client
            .first_parent_commits("new_branch", Some(&window))
            .expect("rev-list should run");
        assert_eq!(windowed.len(), 2);
    }

    #[test]
    fn default_remote_is_none_without_remotes() {
        let (tmp, _) = sample_repo();
        let client = GitClient::new(tmp.path());
        assert_eq!(client.default_remote().expect("remote show should run"), None);
    }

    #[test]
    fn failing_command_reports_args() {
        let (tmp, _) = sample_repo();
        let client = GitClient::new(tmp.path());
        let err = client
            .diff_name_only("does-not-exist", "HEAD")
            .expect_err("unknown revision should fail");
        match err {
            GitError::CommandFailed { args, .. } => {
                assert_eq!(args, "diff --name-only does-not-exist..HEAD");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
