#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::tree::PathRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Untracked,
}

impl ChangeKind {
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            ChangeKind::Added => "[+]",
            ChangeKind::Modified => "[~]",
            ChangeKind::Deleted => "[-]",
            ChangeKind::Renamed => "[R]",
            ChangeKind::Copied => "[C]",
            ChangeKind::Untracked => "[?]",
        }
    }
}

/// Shared view over the two leaf payloads so rendering and printing can
/// stay generic over which tree they show.
pub trait ChangeRecord: PathRecord {
    fn kind(&self) -> ChangeKind;
    fn orig_path(&self) -> Option<&str>;
}

/// One working-tree entry from `git status --porcelain=v2`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,
    /// Raw two-character `XY` status code, e.g. `.M`.
    pub xy: String,
    pub kind: ChangeKind,
    pub orig_path: Option<String>,
    pub untracked: bool,
    /// Untracked directory reported with a trailing slash.
    pub dir_placeholder: bool,
}

impl PathRecord for ChangedFile {
    fn rel_path(&self) -> &str {
        &self.path
    }

    fn is_dir_placeholder(&self) -> bool {
        self.dir_placeholder
    }
}

impl ChangeRecord for ChangedFile {
    fn kind(&self) -> ChangeKind {
        self.kind
    }

    fn orig_path(&self) -> Option<&str> {
        self.orig_path.as_deref()
    }
}

/// One file changed in a commit, from `git diff-tree --name-status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitFile {
    pub path: String,
    pub kind: ChangeKind,
    pub orig_path: Option<String>,
}

impl PathRecord for CommitFile {
    fn rel_path(&self) -> &str {
        &self.path
    }
}

impl ChangeRecord for CommitFile {
    fn kind(&self) -> ChangeKind {
        self.kind
    }

    fn orig_path(&self) -> Option<&str> {
        self.orig_path.as_deref()
    }
}

/// Dirty summary for one worktree, for the worktree table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeCounts {
    pub staged: usize,
    pub modified: usize,
    pub untracked: usize,
}

impl ChangeCounts {
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.staged + self.modified + self.untracked > 0
    }
}

/// Parses `git status --porcelain=v2` output.
///
/// Handles ordinary entries (`1`), renames/copies (`2`, tab-separated
/// path pair), and untracked entries (`?`); `#` headers, unmerged
/// entries, and malformed lines are skipped. An untracked path with a
/// trailing slash is kept as a directory placeholder.
#[must_use]
pub fn parse_status_porcelain_v2(raw: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    for line in raw.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("? ") {
            let (path, dir_placeholder) = strip_dir_slash(rest);
            if path.is_empty() {
                continue;
            }
            files.push(ChangedFile {
                path: path.to_owned(),
                xy: "??".to_owned(),
                kind: ChangeKind::Untracked,
                orig_path: None,
                untracked: true,
                dir_placeholder,
            });
            continue;
        }
        if let Some(rest) = line.strip_prefix("1 ") {
            // XY sub mH mI mW hH hI path — path is the 9th field and may
            // contain spaces.
            let mut fields = rest.splitn(8, ' ');
            let Some(xy) = fields.next() else { continue };
            let Some(path) = fields.nth(6) else { continue };
            files.push(ChangedFile {
                path: path.to_owned(),
                xy: xy.to_owned(),
                kind: kind_from_xy(xy),
                orig_path: None,
                untracked: false,
                dir_placeholder: false,
            });
            continue;
        }
        if let Some(rest) = line.strip_prefix("2 ") {
            // XY sub mH mI mW hH hI Xscore path<TAB>origPath
            let mut fields = rest.splitn(9, ' ');
            let Some(xy) = fields.next() else { continue };
            let Some(path_pair) = fields.nth(7) else { continue };
            let Some((path, orig)) = path_pair.split_once('\t') else {
                continue;
            };
            files.push(ChangedFile {
                path: path.to_owned(),
                xy: xy.to_owned(),
                kind: kind_from_xy(xy),
                orig_path: Some(orig.to_owned()),
                untracked: false,
                dir_placeholder: false,
            });
        }
    }
    files
}

fn strip_dir_slash(path: &str) -> (&str, bool) {
    match path.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (path, false),
    }
}

fn kind_from_xy(xy: &str) -> ChangeKind {
    let mut chars = xy.chars();
    let x = chars.next().unwrap_or('.');
    let y = chars.next().unwrap_or('.');
    if x == 'R' || y == 'R' {
        ChangeKind::Renamed
    } else if x == 'C' || y == 'C' {
        ChangeKind::Copied
    } else if x == 'A' {
        ChangeKind::Added
    } else if x == 'D' || y == 'D' {
        ChangeKind::Deleted
    } else {
        ChangeKind::Modified
    }
}

/// Parses `git diff-tree --name-status -r` output: `M\tpath`, or
/// `R100\told\tnew` for renames/copies (similarity score stripped).
#[must_use]
pub fn parse_name_status(raw: &str) -> Vec<CommitFile> {
    let mut files = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split('\t');
        let Some(status) = parts.next() else { continue };
        let Some(first_path) = parts.next() else { continue };

        let letter = status.chars().next().unwrap_or('M');
        let kind = match letter {
            'A' => ChangeKind::Added,
            'D' => ChangeKind::Deleted,
            'R' => ChangeKind::Renamed,
            'C' => ChangeKind::Copied,
            _ => ChangeKind::Modified,
        };

        if matches!(kind, ChangeKind::Renamed | ChangeKind::Copied) {
            let Some(new_path) = parts.next() else { continue };
            files.push(CommitFile {
                path: new_path.to_owned(),
                kind,
                orig_path: Some(first_path.to_owned()),
            });
        } else {
            files.push(CommitFile {
                path: first_path.to_owned(),
                kind,
                orig_path: None,
            });
        }
    }
    files
}

/// Counts staged/modified/untracked entries the way the worktree table
/// summarizes dirtiness: the index side (`X`) of the code marks staged
/// work, the worktree side (`Y`) marks unstaged modifications.
#[must_use]
pub fn change_counts(files: &[ChangedFile]) -> ChangeCounts {
    let mut counts = ChangeCounts::default();
    for file in files {
        if file.untracked {
            counts.untracked += 1;
            continue;
        }
        let mut chars = file.xy.chars();
        let x = chars.next().unwrap_or('.');
        let y = chars.next().unwrap_or('.');
        if x != '.' && x != ' ' {
            counts.staged += 1;
        }
        if y != '.' && y != ' ' {
            counts.modified += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordinary_untracked_and_rename_entries() {
        let raw = "\
# branch.oid 1234567
# branch.head main
1 .M N... 100644 100644 100644 aaaa bbbb src/lib.rs
1 A. N... 000000 100644 100644 0000 cccc src/new file.rs
2 R. N... 100644 100644 100644 dddd eeee R100 src/after.rs\tsrc/before.rs
? notes.txt
? scratch/
";
        let files = parse_status_porcelain_v2(raw);
        assert_eq!(files.len(), 5);

        assert_eq!(files[0].path, "src/lib.rs");
        assert_eq!(files[0].xy, ".M");
        assert_eq!(files[0].kind, ChangeKind::Modified);

        // Paths with spaces survive field splitting.
        assert_eq!(files[1].path, "src/new file.rs");
        assert_eq!(files[1].kind, ChangeKind::Added);

        assert_eq!(files[2].path, "src/after.rs");
        assert_eq!(files[2].kind, ChangeKind::Renamed);
        assert_eq!(files[2].orig_path.as_deref(), Some("src/before.rs"));

        assert!(files[3].untracked);
        assert!(!files[3].dir_placeholder);

        assert_eq!(files[4].path, "scratch");
        assert!(files[4].dir_placeholder);
    }

    #[test]
    fn skips_headers_and_malformed_lines() {
        let raw = "# branch.ab +1 -0\n1 .M\ngarbage\n";
        assert!(parse_status_porcelain_v2(raw).is_empty());
    }

    #[test]
    fn parses_name_status_with_rename_score() {
        let raw = "M\tsrc/app.rs\nA\tREADME.md\nR087\told/name.rs\tnew/name.rs\nD\tgone.rs\n";
        let files = parse_name_status(raw);
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].kind, ChangeKind::Modified);
        assert_eq!(files[1].kind, ChangeKind::Added);
        assert_eq!(files[2].path, "new/name.rs");
        assert_eq!(files[2].orig_path.as_deref(), Some("old/name.rs"));
        assert_eq!(files[3].kind, ChangeKind::Deleted);
    }

    #[test]
    fn counts_split_staged_and_unstaged_sides() {
        let raw = "\
1 M. N... 100644 100644 100644 aaaa bbbb staged.rs
1 MM N... 100644 100644 100644 aaaa bbbb both.rs
1 .M N... 100644 100644 100644 aaaa bbbb unstaged.rs
? new.rs
";
        let counts = change_counts(&parse_status_porcelain_v2(raw));
        assert_eq!(counts.staged, 2);
        assert_eq!(counts.modified, 2);
        assert_eq!(counts.untracked, 1);
        assert!(counts.is_dirty());
    }

    #[test]
    fn empty_status_is_clean() {
        let counts = change_counts(&[]);
        assert!(!counts.is_dirty());
    }
}
