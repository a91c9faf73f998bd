#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};

use crate::error::WtdashError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub subject: String,
    pub author: String,
    pub date_iso: String,
}

impl CommitInfo {
    /// Abbreviated hash for table rows.
    #[must_use]
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map_or(self.hash.len(), |(i, _)| i);
        &self.hash[..end]
    }
}

#[derive(Debug, Clone)]
pub struct Git {
    repo_root: PathBuf,
}

impl Git {
    pub fn from_cwd() -> Result<Self, WtdashError> {
        let cwd = std::env::current_dir()
            .map_err(|e| WtdashError::Other(format!("failed to get cwd: {e}")))?;
        Self::from_dir(&cwd)
    }

    pub fn from_dir(dir: &Path) -> Result<Self, WtdashError> {
        let repo_root = find_repo_root(dir).ok_or(WtdashError::NotInGitRepo)?;
        Ok(Self { repo_root })
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn list_worktrees_porcelain(&self) -> Result<String, WtdashError> {
        self.run(&["worktree", "list", "--porcelain"])
    }

    /// Machine-readable working-tree status for one worktree.
    pub fn status_porcelain(&self, dir: &Path) -> Result<String, WtdashError> {
        self.run_in_dir(dir, &["status", "--porcelain=v2"])
    }

    /// Name-status file list for a single commit.
    pub fn commit_files(&self, dir: &Path, commit: &str) -> Result<String, WtdashError> {
        self.run_in_dir(
            dir,
            &["diff-tree", "--name-status", "-r", "--no-commit-id", commit],
        )
    }

    pub fn recent_commits(&self, dir: &Path, limit: usize) -> Result<Vec<CommitInfo>, WtdashError> {
        let out = self.run_in_dir(
            dir,
            &[
                "log",
                &format!("-{limit}"),
                "--pretty=format:%H%x09%s%x09%an%x09%aI",
            ],
        )?;
        let mut commits = Vec::new();
        for line in out.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 4 {
                continue;
            }
            commits.push(CommitInfo {
                hash: parts[0].to_owned(),
                subject: parts[1].to_owned(),
                author: parts[2].to_owned(),
                date_iso: parts[3].to_owned(),
            });
        }
        Ok(commits)
    }

    pub fn run(&self, args: &[&str]) -> Result<String, WtdashError> {
        self.run_in_dir(&self.repo_root, args)
    }

    pub fn run_in_dir(&self, dir: &Path, args: &[&str]) -> Result<String, WtdashError> {
        let out = run_raw(dir, args)?;
        if out.status.success() {
            Ok(String::from_utf8_lossy(&out.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&out.stderr);
            Err(WtdashError::Other(format!(
                "git {}: {}",
                args.join(" "),
                stderr.trim()
            )))
        }
    }
}

fn run_raw(dir: &Path, args: &[&str]) -> Result<Output, WtdashError> {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => WtdashError::GitNotFound,
            _ => WtdashError::Other(format!("failed to run git: {e}")),
        })
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut cur = Some(start);
    while let Some(dir) = cur {
        let candidate = dir.join(".git");
        // A .git file (not dir) marks a linked worktree; both count.
        if candidate.is_dir() || candidate.is_file() {
            return Some(dir.to_path_buf());
        }
        cur = dir.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_truncates_long_hashes_only() {
        let commit = CommitInfo {
            hash: "0123456789abcdef".to_owned(),
            subject: "s".to_owned(),
            author: "a".to_owned(),
            date_iso: String::new(),
        };
        assert_eq!(commit.short_hash(), "0123456");

        let commit = CommitInfo {
            hash: "0123".to_owned(),
            ..commit
        };
        assert_eq!(commit.short_hash(), "0123");
    }
}
