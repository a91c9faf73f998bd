#![forbid(unsafe_code)]

use std::cmp::Ordering;

use crate::tree::node::{CollapseMap, FlatNode, PathRecord, TreeNode};

/// Builds a change tree from a flat record batch.
///
/// One insertion pass per record: walk from the root consuming one path
/// segment at a time, creating missing nodes along the way. Intermediate
/// directories exist only because a record's path passes through them, so
/// directories with no descendant leaves never appear.
#[must_use]
pub fn build<R: PathRecord + Clone>(records: &[R]) -> TreeNode<R> {
    let mut root = TreeNode::dir(String::new());
    for record in records {
        insert(&mut root, record);
    }
    root
}

fn insert<R: PathRecord + Clone>(root: &mut TreeNode<R>, record: &R) {
    let path = record.rel_path();
    if path.is_empty() {
        return;
    }

    let segments: Vec<&str> = path.split('/').collect();
    let mut node = root;
    for i in 0..segments.len() {
        let is_leaf = i + 1 == segments.len() && !record.is_dir_placeholder();
        let sub_path = segments[..=i].join("/");

        let idx = match node.children.iter().position(|c| c.path == sub_path) {
            Some(idx) => {
                if is_leaf {
                    // Duplicate input path: last write wins.
                    node.children[idx].record = Some(record.clone());
                }
                idx
            }
            None => {
                let child = if is_leaf {
                    TreeNode::leaf(sub_path, record.clone())
                } else {
                    TreeNode::dir(sub_path)
                };
                node.children.push(child);
                node.children.len() - 1
            }
        };
        node = &mut node.children[idx];
    }
}

/// Orders children in place: directories before files, then byte-wise by
/// full path within each group. Deterministic given the same node set, so
/// re-sorting after a rebuild is idempotent.
pub fn sort<R>(node: &mut TreeNode<R>) {
    node.children.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.path.cmp(&b.path),
    });
    for child in &mut node.children {
        sort(child);
    }
}

/// Folds single-child directory chains in place, bottom-up.
///
/// A directory whose only child is itself a directory is replaced by that
/// subdirectory, accumulating `compression` so a chain of k merged
/// segments ends as one node with `compression = k` and the deepest
/// directory's path. A directory with a single *leaf* child is left
/// alone: compression folds intermediate directory segments, never the
/// row that shows a file exists.
pub fn compress<R>(node: &mut TreeNode<R>) {
    for child in &mut node.children {
        compress(child);
    }
    for child in &mut node.children {
        while child.is_dir() && child.children.len() == 1 && child.children[0].is_dir() {
            let mut only = child.children.remove(0);
            only.compression += child.compression + 1;
            *child = only;
        }
    }
}

/// Depth-first pre-order flattening. The root itself is never emitted;
/// each emitted node's `depth` is its number of emitted ancestors. A
/// collapsed directory is emitted (so it stays togglable) but its subtree
/// is pruned, making the walk O(visible nodes).
#[must_use]
pub fn flatten<R: Clone>(root: &TreeNode<R>, collapse: &CollapseMap) -> Vec<FlatNode<R>> {
    let mut out = Vec::new();
    flatten_into(root, collapse, 0, &mut out);
    out
}

fn flatten_into<R: Clone>(
    node: &TreeNode<R>,
    collapse: &CollapseMap,
    depth: usize,
    out: &mut Vec<FlatNode<R>>,
) {
    for child in &node.children {
        out.push(FlatNode {
            path: child.path.clone(),
            depth,
            compression: child.compression,
            record: child.record.clone(),
        });
        if child.is_dir() && !collapse.get(&child.path).copied().unwrap_or(false) {
            flatten_into(child, collapse, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Rec(&'static str);

    impl PathRecord for Rec {
        fn rel_path(&self) -> &str {
            self.0
        }
    }

    fn recs(paths: &[&'static str]) -> Vec<Rec> {
        paths.iter().map(|p| Rec(p)).collect()
    }

    fn built(paths: &[&'static str]) -> TreeNode<Rec> {
        let mut tree = build(&recs(paths));
        sort(&mut tree);
        compress(&mut tree);
        tree
    }

    #[test]
    fn nested_batch_flattens_depth_first_in_order() {
        let tree = built(&["a/b/c.go", "a/b/d.go", "a/e.go"]);
        let flat = flatten(&tree, &CollapseMap::new());

        let rows: Vec<(&str, usize, usize, bool)> = flat
            .iter()
            .map(|n| (n.path.as_str(), n.depth, n.compression, n.is_dir()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("a", 0, 0, true),
                ("a/b", 1, 0, true),
                ("a/b/c.go", 2, 0, false),
                ("a/b/d.go", 2, 0, false),
                ("a/e.go", 1, 0, false),
            ]
        );
    }

    #[test]
    fn leaves_cover_every_input_record() {
        let paths = ["x/y/z.rs", "x/y/w.rs", "x/q.rs", "top.rs", "deep/a/b/c/d.rs"];
        let tree = built(&paths);
        let flat = flatten(&tree, &CollapseMap::new());

        let leaves: Vec<&str> = flat
            .iter()
            .filter_map(|n| n.record.as_ref().map(|r| r.0))
            .collect();
        assert_eq!(leaves.len(), paths.len());
        for p in paths {
            assert_eq!(leaves.iter().filter(|l| **l == p).count(), 1, "missing {p}");
        }
    }

    #[test]
    fn directories_before_files_then_bytewise() {
        let tree = built(&["b.rs", "a/c.rs", "z/d.rs", "a.rs"]);
        let top: Vec<&str> = tree.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(top, vec!["a", "z", "a.rs", "b.rs"]);
    }

    #[test]
    fn sort_and_compress_are_idempotent() {
        let mut tree = build(&recs(&["a/b/c/d.rs", "a/b/e.rs", "f.rs"]));
        sort(&mut tree);
        compress(&mut tree);
        let once = tree.clone();
        sort(&mut tree);
        compress(&mut tree);
        assert_eq!(tree, once);
    }

    #[test]
    fn single_child_dir_chain_merges_with_accumulated_count() {
        // a -> b -> c -> d.rs: three directory segments, one row.
        let tree = built(&["a/b/c/d.rs"]);
        assert_eq!(tree.children.len(), 1);
        let merged = &tree.children[0];
        assert_eq!(merged.path, "a/b/c");
        assert_eq!(merged.compression, 2);
        assert_eq!(merged.children.len(), 1);
        assert_eq!(merged.children[0].path, "a/b/c/d.rs");

        let flat = flatten(&tree, &CollapseMap::new());
        assert_eq!(flat[0].display_label(), "a/b/c");
    }

    #[test]
    fn compression_counts_real_segments_on_every_path() {
        // a/b compresses, then fans out into two sub-chains that compress
        // again; the counts along each root-to-leaf path must add up to
        // the uncompressed directory segment count.
        let tree = built(&["a/b/x/y/one.rs", "a/b/z/w/two.rs"]);
        let flat = flatten(&tree, &CollapseMap::new());

        for leaf in flat.iter().filter(|n| !n.is_dir()) {
            let dir_segments = leaf.path.split('/').count() - 1;
            let folded: usize = flat
                .iter()
                .filter(|d| d.is_dir() && leaf.path.starts_with(&format!("{}/", d.path)))
                .map(|d| d.compression + 1)
                .sum();
            assert_eq!(folded, dir_segments, "path {}", leaf.path);
        }
    }

    #[test]
    fn single_leaf_child_is_never_compressed() {
        let tree = built(&["a/b.rs"]);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].path, "a");
        assert_eq!(tree.children[0].compression, 0);
    }

    #[test]
    fn collapse_hides_exactly_the_subtree() {
        let tree = built(&["a/b/c.go", "a/b/d.go", "a/e.go"]);
        let open = flatten(&tree, &CollapseMap::new());

        let mut collapse = CollapseMap::new();
        collapse.insert("a/b".to_owned(), true);
        let closed = flatten(&tree, &collapse);

        let paths: Vec<&str> = closed.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/e.go"]);

        collapse.insert("a/b".to_owned(), false);
        assert_eq!(flatten(&tree, &collapse), open);
    }

    #[test]
    fn collapsed_root_level_dir_keeps_its_row() {
        let tree = built(&["a/b.rs", "a/c.rs"]);
        let mut collapse = CollapseMap::new();
        collapse.insert("a".to_owned(), true);
        let flat = flatten(&tree, &collapse);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, "a");
        assert!(flat[0].is_dir());
    }

    #[test]
    fn duplicate_paths_last_write_wins() {
        #[derive(Debug, Clone, PartialEq, Eq)]
        struct Tagged(&'static str, u32);
        impl PathRecord for Tagged {
            fn rel_path(&self) -> &str {
                self.0
            }
        }

        let tree = build(&[Tagged("a/f.rs", 1), Tagged("a/f.rs", 2)]);
        let flat = flatten(&tree, &CollapseMap::new());
        let leaves: Vec<&Tagged> = flat.iter().filter_map(|n| n.record.as_ref()).collect();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].1, 2);
    }

    #[test]
    fn dir_placeholder_becomes_a_directory_row() {
        #[derive(Debug, Clone, PartialEq, Eq)]
        struct MaybeDir(&'static str, bool);
        impl PathRecord for MaybeDir {
            fn rel_path(&self) -> &str {
                self.0
            }
            fn is_dir_placeholder(&self) -> bool {
                self.1
            }
        }

        let tree = build(&[MaybeDir("pkg/newdir", true), MaybeDir("pkg/file.rs", false)]);
        let flat = flatten(&tree, &CollapseMap::new());
        let newdir = flat
            .iter()
            .find(|n| n.path == "pkg/newdir")
            .expect("placeholder row");
        assert!(newdir.is_dir());
    }

    #[test]
    fn empty_input_yields_empty_flat_sequence() {
        let tree = built(&[]);
        assert!(flatten(&tree, &CollapseMap::new()).is_empty());
    }
}
