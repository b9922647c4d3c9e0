use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::process::{Output, Stdio};
use tokio::process::Command;

const LOG_TARGET: &str = "       git";
const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Which commit messages to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitScope {
    /// Only the given commit
    Single,

    /// Every commit after the given one up to and including `HEAD`
    Range,
}

/// The checked-out branch and its latest commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    /// Empty when `HEAD` is detached
    pub branch: String,
    pub commit: String,
    pub subject: String,
}

/// A git working tree, accessed by running the `git` executable
#[derive(Debug, Clone, Default)]
pub struct Repository {
    dir: Option<Utf8PathBuf>,
}

impl Repository {
    /// A repository rooted at `dir`, or at the current directory when `None`
    #[must_use]
    pub fn new(dir: Option<&Utf8Path>) -> Self {
        Self {
            dir: dir.map(Utf8Path::to_path_buf),
        }
    }

    /// Fail unless the directory is inside a git repository.
    pub async fn ensure_repository(&self) -> Result<()> {
        let output = self.run(&["rev-parse", "--git-dir"]).await?;
        if !output.status.success() {
            bail!("not in a git repository");
        }
        Ok(())
    }

    /// Fail unless `HEAD` resolves to a commit. It doesn't in a repository without commits.
    pub async fn verify_head(&self) -> Result<()> {
        let output = self.run(&["rev-parse", "--verify", "HEAD"]).await?;
        if !output.status.success() {
            bail!("'HEAD' does not resolve to a commit, the repository may be empty or corrupted");
        }
        Ok(())
    }

    /// Fail unless `commit` looks like a commit hash and names an existing commit.
    pub async fn verify_commit(&self, commit: &str) -> Result<()> {
        validate_commit_hash(commit)?;

        let output = self.run(&["rev-parse", "--verify", "--quiet", &format!("{commit}^{{commit}}")]).await?;
        if !output.status.success() {
            bail!("commit '{commit}' not found");
        }
        Ok(())
    }

    pub async fn branch_info(&self) -> Result<BranchInfo> {
        let branch = self.run_for_text(&["branch", "--show-current"]).await?;
        let latest = self.run_for_text(&["log", "-1", "--format=%H%n%s"]).await?;
        parse_branch_info(branch, &latest)
    }

    /// The subjects of the commits in scope, one per line, newest first.
    pub async fn commit_subjects(&self, commit: &str, scope: CommitScope) -> Result<String> {
        self.verify_commit(commit).await?;

        match scope {
            CommitScope::Single => self.run_for_text(&["log", "-1", "--pretty=format:%s", commit]).await,
            CommitScope::Range => self.run_for_text(&["log", "--pretty=format:%s", &format!("{commit}..HEAD")]).await,
        }
    }

    async fn run_for_text(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        check_git_output(&output, &args.join(" "))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        let mut command = Command::new("git");
        if let Some(dir) = &self.dir {
            let _ = command.arg("-C").arg(dir.as_str());
        }

        log::debug!(target: LOG_TARGET, "Running 'git {}'", args.join(" "));

        let child = command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .into_app_err("could not spawn git command")?;

        match tokio::time::timeout(GIT_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(e).into_app_err_with(|| format!("'git {}' failed to run", args.join(" "))),
            Err(_) => {
                bail!("'git {}' timed out after {} seconds", args.join(" "), GIT_TIMEOUT.as_secs());
            }
        }
    }
}

/// Commit arguments must be (possibly abbreviated) hexadecimal hashes.
pub fn validate_commit_hash(hash: &str) -> Result<()> {
    if hash.is_empty() {
        bail!("invalid commit '': cannot be empty");
    }

    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid commit '{hash}': expected a hexadecimal commit hash");
    }

    Ok(())
}

fn parse_branch_info(branch: String, latest: &str) -> Result<BranchInfo> {
    let Some((commit, subject)) = latest.split_once('\n') else {
        bail!("unexpected output from 'git log -1': '{latest}'");
    };

    Ok(BranchInfo {
        branch,
        commit: commit.trim().to_string(),
        subject: subject.trim().to_string(),
    })
}

fn check_git_output(output: &Output, operation: &str) -> Result<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("'git {operation}' failed: {}", stderr.trim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitStatus;

    fn exit_status(code: i32) -> ExitStatus {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            ExitStatus::from_raw(code << 8)
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::ExitStatusExt;
            ExitStatus::from_raw(code.cast_unsigned())
        }
    }

    #[test]
    fn test_validate_commit_hash() {
        validate_commit_hash("abc123DEF456").unwrap();
        validate_commit_hash("0").unwrap();

        assert!(validate_commit_hash("").is_err());
        assert!(validate_commit_hash("HEAD~1").is_err());
        assert!(validate_commit_hash("main").is_err());
        assert!(validate_commit_hash("abc123; rm -rf /").is_err());
    }

    #[test]
    fn test_parse_branch_info() {
        let info = parse_branch_info("main".into(), "0123abcd\nEV-12: add evidence").unwrap();
        assert_eq!(
            info,
            BranchInfo {
                branch: "main".into(),
                commit: "0123abcd".into(),
                subject: "EV-12: add evidence".into(),
            }
        );
    }

    #[test]
    fn test_parse_branch_info_without_subject() {
        assert!(parse_branch_info(String::new(), "0123abcd").is_err());
    }

    #[test]
    fn test_check_git_output() {
        let ok = Output {
            status: exit_status(0),
            stdout: vec![],
            stderr: vec![],
        };
        check_git_output(&ok, "status").unwrap();

        let failed = Output {
            status: exit_status(128),
            stdout: vec![],
            stderr: b"fatal: not a git repository\n".to_vec(),
        };
        let err = check_git_output(&failed, "status").unwrap_err();
        assert!(format!("{err}").contains("not a git repository"));
    }
}
