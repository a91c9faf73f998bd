#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WtdashError {
    #[error("not inside a git repository")]
    NotInGitRepo,

    #[error("git is required but was not found in PATH")]
    GitNotFound,

    #[error("worktree not found matching pattern: {0}")]
    WorktreeNotFound(String),

    #[error("{0}")]
    Other(String),
}
