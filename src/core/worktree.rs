#![forbid(unsafe_code)]

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::git::Git;
use crate::error::WtdashError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Worktree {
    pub path: String,
    pub branch: String,
    pub head: String,
    pub is_main: bool,
    pub last_modified: String,
}

impl Worktree {
    /// Directory name, for compact table rows.
    #[must_use]
    pub fn dir_name(&self) -> String {
        PathBuf::from(&self.path)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.path)
            .to_owned()
    }
}

/// Lists the repository's worktrees from `git worktree list --porcelain`.
pub fn list(git: &Git) -> Result<Vec<Worktree>, WtdashError> {
    let out = git.list_worktrees_porcelain()?;
    let main_root = git.repo_root().to_path_buf();

    let mut worktrees = Vec::new();
    for entry in parse_worktree_porcelain(&out) {
        let path_buf = PathBuf::from(&entry.path);
        let mut branch = entry.branch;
        if branch.is_empty() {
            // Detached HEAD: fall back to whatever rev-parse reports.
            if let Ok(out) = git.run_in_dir(&path_buf, &["rev-parse", "--abbrev-ref", "HEAD"]) {
                branch = out.trim().to_owned();
            }
        }

        let last_modified = std::fs::metadata(&path_buf)
            .and_then(|m| m.modified())
            .ok()
            .and_then(system_time_to_rfc3339)
            .unwrap_or_default();

        worktrees.push(Worktree {
            path: entry.path,
            branch,
            head: entry.head,
            is_main: path_buf == main_root,
            last_modified,
        });
    }
    Ok(worktrees)
}

/// Picks the first worktree whose branch or path contains `pattern`
/// (case-insensitive).
pub fn find_matching<'a>(
    worktrees: &'a [Worktree],
    pattern: &str,
) -> Result<&'a Worktree, WtdashError> {
    let p = pattern.to_lowercase();
    worktrees
        .iter()
        .find(|wt| wt.branch.to_lowercase().contains(&p) || wt.path.to_lowercase().contains(&p))
        .ok_or_else(|| WtdashError::WorktreeNotFound(pattern.to_owned()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PorcelainEntry {
    path: String,
    branch: String,
    head: String,
}

fn parse_worktree_porcelain(out: &str) -> Vec<PorcelainEntry> {
    let mut entries = Vec::new();
    let mut cur: Option<PorcelainEntry> = None;

    for line in out.lines() {
        let line = line.trim_end();
        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(entry) = cur.take() {
                entries.push(entry);
            }
            cur = Some(PorcelainEntry {
                path: path.to_owned(),
                ..PorcelainEntry::default()
            });
        } else if let Some(branch) = line.strip_prefix("branch ") {
            if let Some(entry) = cur.as_mut() {
                entry.branch = branch.trim().trim_start_matches("refs/heads/").to_owned();
            }
        } else if let Some(head) = line.strip_prefix("HEAD ") {
            if let Some(entry) = cur.as_mut() {
                entry.head = head.trim().to_owned();
            }
        }
    }
    if let Some(entry) = cur.take() {
        entries.push(entry);
    }

    entries
}

fn system_time_to_rfc3339(t: std::time::SystemTime) -> Option<String> {
    OffsetDateTime::from(t).format(&Rfc3339).ok()
}
