#![forbid(unsafe_code)]

use crate::tree::build::{build, compress, flatten, sort};
use crate::tree::node::{CollapseMap, FlatNode, PathRecord, TreeNode, leaf_name};

/// Cursor-navigable view over a change tree.
///
/// Owns the full record batch, the tree built from the currently matching
/// records, its flattened projection, and the navigation state (cursor,
/// scroll offset, collapse map, filter and search queries). The collapse
/// map and both queries outlive rebuilds; only cursor and scroll are
/// re-clamped when the flattened sequence changes.
///
/// Every operation is total: out-of-range indices clamp, unknown paths
/// no-op, and an empty batch yields an empty sequence with no selection.
#[derive(Debug, Clone)]
pub struct TreeView<R> {
    records: Vec<R>,
    matched: usize,
    tree: TreeNode<R>,
    flat: Vec<FlatNode<R>>,
    collapse: CollapseMap,
    cursor: Option<usize>,
    scroll: usize,
    page_size: usize,
    filter_query: String,
    search_query: String,
}

impl<R: PathRecord + Clone> TreeView<R> {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            matched: 0,
            tree: TreeNode::dir(String::new()),
            flat: Vec::new(),
            collapse: CollapseMap::new(),
            cursor: None,
            scroll: 0,
            page_size: page_size.max(1),
            filter_query: String::new(),
            search_query: String::new(),
        }
    }

    #[must_use]
    pub fn with_records(records: Vec<R>, page_size: usize) -> Self {
        let mut view = Self::new(page_size);
        view.set_records(records);
        view
    }

    /// Replaces the record batch (a fresh `git status` or a newly selected
    /// commit). The active filter is re-applied and the selection is kept
    /// when its path survives the rebuild.
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.rebuild();
    }

    /// Rebuilds the tree from records whose filename (last path segment,
    /// case-insensitive) contains `query`. An empty query restores the
    /// unfiltered batch. Ancestor directories of every match are
    /// reconstructed from the matching paths, so a deep match stays
    /// reachable.
    pub fn set_filter(&mut self, query: &str) {
        self.filter_query = query.to_owned();
        self.rebuild();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter("");
    }

    #[must_use]
    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.to_owned();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Moves the cursor to the next node whose displayed filename
    /// (case-insensitive) contains the search query, scanning from just
    /// past the cursor and wrapping around the ends. Without a match
    /// anywhere the state is left untouched. Search never changes which
    /// nodes exist.
    pub fn search_next(&mut self, forward: bool) {
        if self.search_query.is_empty() {
            return;
        }
        let Some(start) = self.cursor else {
            return;
        };
        let query = self.search_query.to_lowercase();
        let n = self.flat.len();
        for step in 1..=n {
            let idx = if forward {
                (start + step) % n
            } else {
                (start + n - step) % n
            };
            if self.flat[idx].name().to_lowercase().contains(&query) {
                self.cursor = Some(idx);
                self.follow_cursor();
                return;
            }
        }
    }

    /// Flips the collapse state for `path` and re-flattens. No tree
    /// rebuild happens; a path absent from the current tree just leaves
    /// an inert entry behind.
    pub fn toggle_collapse(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        let flipped = !self.is_collapsed(path);
        self.collapse.insert(path.to_owned(), flipped);
        self.flat = flatten(&self.tree, &self.collapse);
        self.clamp();
        self.follow_cursor();
    }

    #[must_use]
    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapse.get(path).copied().unwrap_or(false)
    }

    /// Moves the cursor by `delta` rows, clamped to the sequence. Scroll
    /// follows by the minimal amount that keeps the cursor inside the
    /// visible window.
    pub fn move_cursor(&mut self, delta: i64) {
        let Some(cur) = self.cursor else {
            return;
        };
        let max = i64::try_from(self.flat.len().saturating_sub(1)).unwrap_or(i64::MAX);
        let cur = i64::try_from(cur).unwrap_or(i64::MAX);
        let next = (cur.saturating_add(delta)).clamp(0, max);
        self.cursor = Some(usize::try_from(next).unwrap_or(0));
        self.follow_cursor();
    }

    pub fn cursor_to_start(&mut self) {
        if self.cursor.is_some() {
            self.cursor = Some(0);
            self.follow_cursor();
        }
    }

    pub fn cursor_to_end(&mut self) {
        if self.cursor.is_some() {
            self.cursor = Some(self.flat.len().saturating_sub(1));
            self.follow_cursor();
        }
    }

    pub fn half_page(&mut self, forward: bool) {
        let half = i64::try_from(self.page_size.max(2) / 2).unwrap_or(1);
        self.move_cursor(if forward { half } else { -half });
    }

    /// Sets the visible window height used for scroll bookkeeping.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.follow_cursor();
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn nodes(&self) -> &[FlatNode<R>] {
        &self.flat
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// `None` iff the flattened sequence is empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    #[must_use]
    pub fn selected(&self) -> Option<&FlatNode<R>> {
        self.cursor.and_then(|idx| self.flat.get(idx))
    }

    /// Records matching the active filter.
    #[must_use]
    pub fn matched_records(&self) -> usize {
        self.matched
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    fn rebuild(&mut self) {
        let selected_path = self.selected().map(|n| n.path.clone());

        let query = self.filter_query.trim().to_lowercase();
        let matching: Vec<R> = if query.is_empty() {
            self.records.clone()
        } else {
            self.records
                .iter()
                .filter(|r| leaf_name(r.rel_path()).to_lowercase().contains(&query))
                .cloned()
                .collect()
        };
        self.matched = matching.len();

        let mut tree = build(&matching);
        sort(&mut tree);
        compress(&mut tree);
        self.tree = tree;
        self.flat = flatten(&self.tree, &self.collapse);

        if let Some(path) = selected_path
            && let Some(idx) = self.flat.iter().position(|n| n.path == path)
        {
            self.cursor = Some(idx);
        }
        self.clamp();
        self.follow_cursor();
    }

    fn clamp(&mut self) {
        if self.flat.is_empty() {
            self.cursor = None;
            self.scroll = 0;
            return;
        }
        let cur = self.cursor.unwrap_or(0).min(self.flat.len() - 1);
        self.cursor = Some(cur);
    }

    fn follow_cursor(&mut self) {
        let Some(cur) = self.cursor else {
            self.scroll = 0;
            return;
        };
        if cur < self.scroll {
            self.scroll = cur;
        } else if cur >= self.scroll.saturating_add(self.page_size) {
            self.scroll = cur + 1 - self.page_size;
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

    fn view(paths: &[&'static str], page: usize) -> TreeView<Rec> {
        TreeView::with_records(paths.iter().map(|p| Rec(p)).collect(), page)
    }

    fn paths(v: &TreeView<Rec>) -> Vec<&str> {
        v.nodes().iter().map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn empty_batch_has_no_selection() {
        let mut v = view(&[], 10);
        assert!(v.is_empty());
        assert_eq!(v.cursor(), None);
        assert!(v.selected().is_none());
        v.move_cursor(3);
        assert_eq!(v.cursor(), None);
    }

    #[test]
    fn fresh_batch_selects_first_row() {
        let v = view(&["a/b.rs"], 10);
        assert_eq!(v.cursor(), Some(0));
        assert_eq!(v.selected().map(|n| n.path.as_str()), Some("a"));
    }

    #[test]
    fn cursor_moves_clamp_at_both_ends() {
        let mut v = view(&["a/b/c.go", "a/b/d.go", "a/e.go"], 10);
        assert_eq!(v.len(), 5);

        v.move_cursor(100);
        assert_eq!(v.cursor(), Some(4));
        v.move_cursor(-100);
        assert_eq!(v.cursor(), Some(0));
        v.move_cursor(2);
        assert_eq!(v.cursor(), Some(2));
    }

    #[test]
    fn scroll_follows_cursor_minimally() {
        let mut v = view(
            &["f0.rs", "f1.rs", "f2.rs", "f3.rs", "f4.rs", "f5.rs", "f6.rs"],
            3,
        );
        assert_eq!(v.scroll_offset(), 0);

        v.move_cursor(4); // cursor 4, window must end at 4
        assert_eq!(v.scroll_offset(), 2);
        v.move_cursor(1); // cursor 5
        assert_eq!(v.scroll_offset(), 3);
        v.move_cursor(-4); // cursor 1, window must start at 1
        assert_eq!(v.scroll_offset(), 1);
        v.move_cursor(1); // back inside the window: no scroll change
        assert_eq!(v.scroll_offset(), 1);
    }

    #[test]
    fn toggle_collapse_hides_and_restores_subtree() {
        let mut v = view(&["a/b/c.go", "a/b/d.go", "a/e.go"], 10);
        let before: Vec<String> = paths(&v).iter().map(|s| s.to_string()).collect();

        v.toggle_collapse("a/b");
        assert_eq!(paths(&v), vec!["a", "a/b", "a/e.go"]);

        v.toggle_collapse("a/b");
        assert_eq!(paths(&v), before);
    }

    #[test]
    fn collapse_clamps_cursor_past_the_end() {
        // a/b is one merged row; collapsing it leaves only that row.
        let mut v = view(&["a/b/c.go", "a/b/d.go"], 10);
        assert_eq!(paths(&v), vec!["a/b", "a/b/c.go", "a/b/d.go"]);
        v.cursor_to_end();
        assert_eq!(v.cursor(), Some(2));

        v.toggle_collapse("a/b");
        assert_eq!(v.len(), 1);
        assert_eq!(v.cursor(), Some(0));
    }

    #[test]
    fn toggle_on_vanished_path_is_inert() {
        let mut v = view(&["a/b.rs"], 10);
        v.toggle_collapse("no/such/dir");
        assert_eq!(v.len(), 2);
        assert_eq!(v.cursor(), Some(0));
    }

    #[test]
    fn filter_matches_filename_and_keeps_ancestors() {
        let mut v = view(&["a/b/c.go", "a/b/d.go", "a/e.go"], 10);
        v.set_filter("c");
        // Ancestors a and b survive for the lone match; with only one
        // child left under each, the chain folds into a single row.
        assert_eq!(paths(&v), vec!["a/b", "a/b/c.go"]);
        assert_eq!(v.nodes()[0].display_label(), "a/b");

        v.clear_filter();
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn filter_is_case_insensitive_on_last_segment() {
        let mut v = view(&["src/Widget.rs", "src/other.rs"], 10);
        v.set_filter("WIDGET");
        let leaves: Vec<&str> = v
            .nodes()
            .iter()
            .filter(|n| !n.is_dir())
            .map(|n| n.path.as_str())
            .collect();
        assert_eq!(leaves, vec!["src/Widget.rs"]);

        // Directory names do not match on their own.
        v.set_filter("src");
        assert_eq!(v.matched_records(), 0);
        assert!(v.is_empty());
        assert_eq!(v.cursor(), None);
    }

    #[test]
    fn filter_keeps_selection_by_path_when_it_survives() {
        let mut v = view(&["a/keep.rs", "a/drop.go", "b/keep2.rs"], 10);
        // rows: a, a/drop.go, a/keep.rs, b, b/keep2.rs
        v.move_cursor(2);
        assert_eq!(v.selected().map(|n| n.path.as_str()), Some("a/keep.rs"));

        v.set_filter("keep");
        assert_eq!(v.selected().map(|n| n.path.as_str()), Some("a/keep.rs"));
    }

    #[test]
    fn collapse_survives_filter_round_trip() {
        let mut v = view(&["a/b/c.go", "a/b/d.go", "a/e.go"], 10);
        v.toggle_collapse("a/b");
        assert_eq!(v.len(), 3);

        // "a/b" vanishes from the filtered tree; its collapse entry idles.
        v.set_filter("e.go");
        assert_eq!(paths(&v), vec!["a", "a/e.go"]);

        v.clear_filter();
        assert_eq!(paths(&v), vec!["a", "a/b", "a/e.go"]);
    }

    #[test]
    fn set_records_reapplies_filter_and_clamps() {
        let mut v = view(&["a/one.rs", "a/two.rs"], 10);
        v.set_filter("one");
        assert_eq!(v.len(), 2);

        v.set_records(vec![Rec("b/three.rs")]);
        assert!(v.is_empty());
        assert_eq!(v.cursor(), None);

        v.set_records(vec![Rec("b/one.rs"), Rec("b/four.rs")]);
        assert_eq!(paths(&v), vec!["b", "b/one.rs"]);
        assert_eq!(v.cursor(), Some(0));
    }

    #[test]
    fn search_wraps_forward_and_backward() {
        let mut v = view(&["a.go", "b.go", "c.go"], 10);
        v.set_search("a.go");
        v.move_cursor(2); // cursor on c.go

        v.search_next(true); // wraps to a.go
        assert_eq!(v.selected().map(|n| n.path.as_str()), Some("a.go"));

        v.set_search("c");
        v.search_next(false); // backward wraps to c.go
        assert_eq!(v.selected().map(|n| n.path.as_str()), Some("c.go"));
    }

    #[test]
    fn search_without_match_leaves_state_unchanged() {
        let mut v = view(&["a.go", "b.go"], 10);
        v.move_cursor(1);
        v.set_search("zzz");
        v.search_next(true);
        assert_eq!(v.cursor(), Some(1));
        assert_eq!(v.scroll_offset(), 0);
    }

    #[test]
    fn search_matches_own_row_last() {
        let mut v = view(&["match.go", "other.go"], 10);
        v.set_search("match");
        // Cursor already on the only match; scanning starts past it and
        // wraps back around to it.
        v.search_next(true);
        assert_eq!(v.cursor(), Some(0));
    }

    #[test]
    fn cursor_invariant_holds_under_mixed_operations() {
        let mut v = view(&["a/b/c.go", "a/b/d.go", "a/e.go", "f/g.go"], 4);
        v.toggle_collapse("a/b");
        v.set_filter("g");
        v.toggle_collapse("f");
        v.set_filter("zzz-no-match");
        assert_eq!(v.cursor(), None);
        assert!(v.is_empty());

        v.clear_filter();
        let cur = v.cursor().expect("non-empty after clearing filter");
        assert!(cur < v.len());
        assert!(v.scroll_offset() <= cur);
    }
}
