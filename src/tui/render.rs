#![forbid(unsafe_code)]

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::changes::ChangeRecord;
use crate::tree::TreeView;

/// Glyph lookup for the tree pane, passed in explicitly so rendering
/// stays a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct IconProvider {
    enabled: bool,
}

impl IconProvider {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub fn disclosure(&self, collapsed: bool) -> &'static str {
        match (self.enabled, collapsed) {
            (true, true) => "\u{25b8}",  // ▸
            (true, false) => "\u{25be}", // ▾
            (false, true) => "+",
            (false, false) => "-",
        }
    }
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn dir_style() -> Style {
    Style::default().fg(Color::Cyan)
}

fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Renders the visible window of a change tree as styled rows: indent by
/// depth, disclosure glyph and merged-chain label for directories, file
/// name plus change marker (and rename source) for leaves.
#[must_use]
pub fn tree_lines<R: ChangeRecord + Clone>(
    view: &TreeView<R>,
    icons: &IconProvider,
    height: usize,
    focused: bool,
) -> Vec<Line<'static>> {
    if view.is_empty() {
        return vec![Line::from(Span::styled(
            "No changes.",
            muted_style().add_modifier(Modifier::ITALIC),
        ))];
    }

    let start = view.scroll_offset().min(view.len());
    let end = (start + height.max(1)).min(view.len());

    let mut lines = Vec::with_capacity(end - start);
    for idx in start..end {
        let node = &view.nodes()[idx];
        let selected = focused && view.cursor() == Some(idx);
        let indent = "  ".repeat(node.depth);

        let mut spans: Vec<Span<'static>> = vec![Span::raw(indent)];
        if node.is_dir() {
            let glyph = icons.disclosure(view.is_collapsed(&node.path));
            spans.push(Span::raw(format!("{glyph} ")));
            let style = if selected { selected_style() } else { dir_style() };
            spans.push(Span::styled(format!("{}/", node.display_label()), style));
        } else {
            spans.push(Span::raw("  "));
            let style = if selected {
                selected_style()
            } else {
                Style::default()
            };
            spans.push(Span::styled(node.name().to_owned(), style));
            if let Some(record) = &node.record {
                spans.push(Span::styled(
                    format!(" {}", record.kind().marker()),
                    muted_style(),
                ));
                if let Some(orig) = record.orig_path() {
                    spans.push(Span::styled(format!(" <- {orig}"), muted_style()));
                }
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::changes::{ChangeKind, CommitFile};

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn commit_view(paths: &[(&str, ChangeKind)]) -> TreeView<CommitFile> {
        let files = paths
            .iter()
            .map(|(p, k)| CommitFile {
                path: (*p).to_owned(),
                kind: *k,
                orig_path: None,
            })
            .collect();
        TreeView::with_records(files, 20)
    }

    #[test]
    fn renders_indent_glyphs_and_markers() {
        let view = commit_view(&[
            ("a/b.rs", ChangeKind::Modified),
            ("a/c.rs", ChangeKind::Added),
        ]);
        let icons = IconProvider::new(true);
        let lines = tree_lines(&view, &icons, 10, true);

        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[0]), "\u{25be} a/");
        assert_eq!(line_text(&lines[1]), "    b.rs [~]");
        assert_eq!(line_text(&lines[2]), "    c.rs [+]");
    }

    #[test]
    fn renders_merged_chain_as_one_row() {
        let view = commit_view(&[("src/internal/app/main.rs", ChangeKind::Modified)]);
        let lines = tree_lines(&view, &IconProvider::new(false), 10, false);
        assert_eq!(line_text(&lines[0]), "- src/internal/app/");
        assert_eq!(line_text(&lines[1]), "    main.rs [~]");
    }

    #[test]
    fn shows_rename_source() {
        let files = vec![CommitFile {
            path: "new/name.rs".to_owned(),
            kind: ChangeKind::Renamed,
            orig_path: Some("old/name.rs".to_owned()),
        }];
        let view = TreeView::with_records(files, 20);
        let lines = tree_lines(&view, &IconProvider::new(false), 10, false);
        let leaf = line_text(&lines[1]);
        assert!(leaf.contains("[R]"), "{leaf}");
        assert!(leaf.contains("<- old/name.rs"), "{leaf}");
    }

    #[test]
    fn empty_view_shows_placeholder_row() {
        let view = commit_view(&[]);
        let lines = tree_lines(&view, &IconProvider::new(true), 10, true);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "No changes.");
    }

    #[test]
    fn window_respects_scroll_offset() {
        let mut view = commit_view(&[
            ("f0.rs", ChangeKind::Modified),
            ("f1.rs", ChangeKind::Modified),
            ("f2.rs", ChangeKind::Modified),
            ("f3.rs", ChangeKind::Modified),
        ]);
        view.set_page_size(2);
        view.move_cursor(3);
        let lines = tree_lines(&view, &IconProvider::new(false), 2, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "  f2.rs [~]");
        assert_eq!(line_text(&lines[1]), "  f3.rs [~]");
    }
}
