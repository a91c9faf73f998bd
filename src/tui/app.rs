#![forbid(unsafe_code)]

use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::config::{self, Config};
use crate::core::changes::{self, ChangeCounts, ChangedFile, CommitFile};
use crate::core::git::{CommitInfo, Git};
use crate::core::worktree::{self, Worktree};
use crate::error::WtdashError;
use crate::tree::TreeView;
use crate::tui;
use crate::tui::render::{IconProvider, tree_lines};

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub cfg: Config,
}

pub async fn run(opts: DashboardOptions) -> anyhow::Result<()> {
    let git = Git::from_cwd()?;
    let terminal = tui::init_terminal()?;
    let mut guard = tui::TerminalGuard::new(terminal);

    let mut app = AppState::new(opts.cfg, git);
    if let Err(e) = refresh(&mut app).await {
        app.last_error = Some(e.to_string());
    }

    let mut last_refresh = Instant::now();

    loop {
        {
            let Some(terminal) = guard.terminal.as_mut() else {
                anyhow::bail!("terminal unavailable");
            };
            terminal.draw(|f| draw(f, &mut app))?;
        }

        let should_refresh =
            app.needs_refresh || last_refresh.elapsed() >= app.refresh_interval;
        if should_refresh {
            app.needs_refresh = false;
            if let Err(e) = refresh(&mut app).await {
                app.last_error = Some(e.to_string());
            } else {
                app.last_error = None;
            }
            last_refresh = Instant::now();
        }

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            match handle_key(key, &mut app) {
                Action::Quit => break,
                Action::OpenCommit(commit) => {
                    if let Err(e) = open_commit_modal(&mut app, commit).await {
                        app.last_error = Some(e.to_string());
                    }
                }
                Action::None => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Worktrees,
    Changes,
    Log,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Worktrees => Focus::Changes,
            Focus::Changes => Focus::Log,
            Focus::Log => Focus::Worktrees,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Filtering,
    Searching,
}

enum Action {
    None,
    Quit,
    OpenCommit(CommitInfo),
}

struct AppState {
    cfg: Config,
    git: Git,
    icons: IconProvider,
    refresh_interval: Duration,

    worktrees: Vec<Worktree>,
    counts: Vec<ChangeCounts>,
    wt_state: TableState,

    changes: TreeView<ChangedFile>,
    commits: Vec<CommitInfo>,
    log_index: usize,

    focus: Focus,
    mode: Mode,
    input: String,

    modal: Option<CommitModal>,
    needs_refresh: bool,
    last_error: Option<String>,
}

impl AppState {
    fn new(cfg: Config, git: Git) -> Self {
        let mut wt_state = TableState::default();
        wt_state.select(Some(0));
        let icons = IconProvider::new(cfg.ui.icons);
        let refresh_interval = Duration::from_millis(cfg.status.refresh_interval_ms.max(250));
        Self {
            cfg,
            git,
            icons,
            refresh_interval,
            worktrees: Vec::new(),
            counts: Vec::new(),
            wt_state,
            changes: TreeView::new(20),
            commits: Vec::new(),
            log_index: 0,
            focus: Focus::Changes,
            mode: Mode::Normal,
            input: String::new(),
            modal: None,
            needs_refresh: true,
            last_error: None,
        }
    }

    fn selected_worktree(&self) -> Option<&Worktree> {
        self.worktrees.get(self.wt_state.selected().unwrap_or(0))
    }

    fn move_worktree(&mut self, delta: i64) {
        if self.worktrees.is_empty() {
            return;
        }
        let cur = i64::try_from(self.wt_state.selected().unwrap_or(0)).unwrap_or(i64::MAX);
        let max = i64::try_from(self.worktrees.len() - 1).unwrap_or(i64::MAX);
        let next = (cur + delta).clamp(0, max);
        self.wt_state.select(Some(usize::try_from(next).unwrap_or(0)));
        self.needs_refresh = true;
    }

    fn move_log(&mut self, delta: i64) {
        if self.commits.is_empty() {
            return;
        }
        let cur = i64::try_from(self.log_index).unwrap_or(i64::MAX);
        let max = i64::try_from(self.commits.len() - 1).unwrap_or(i64::MAX);
        self.log_index = usize::try_from((cur + delta).clamp(0, max)).unwrap_or(0);
    }
}

struct CommitModal {
    meta: CommitInfo,
    view: TreeView<CommitFile>,
    mode: Mode,
    input: String,
}

impl CommitModal {
    fn new(meta: CommitInfo, files: Vec<CommitFile>) -> Self {
        Self {
            meta,
            view: TreeView::with_records(files, 20),
            mode: Mode::Normal,
            input: String::new(),
        }
    }

    /// Returns true when the modal should close.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Filtering => match key.code {
                KeyCode::Enter => self.mode = Mode::Normal,
                KeyCode::Esc => {
                    self.mode = Mode::Normal;
                    self.input.clear();
                    self.view.clear_filter();
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    let q = self.input.clone();
                    self.view.set_filter(&q);
                }
                KeyCode::Char(c) if is_plain(key) => {
                    self.input.push(c);
                    let q = self.input.clone();
                    self.view.set_filter(&q);
                }
                _ => {}
            },
            Mode::Searching => match key.code {
                KeyCode::Enter => self.mode = Mode::Normal,
                KeyCode::Esc => {
                    self.mode = Mode::Normal;
                    self.input.clear();
                    self.view.clear_search();
                }
                KeyCode::Char('n') => self.view.search_next(true),
                KeyCode::Char('N') => self.view.search_next(false),
                KeyCode::Backspace => {
                    self.input.pop();
                    let q = self.input.clone();
                    self.view.set_search(&q);
                    if !q.is_empty() {
                        self.view.search_next(true);
                    }
                }
                KeyCode::Char(c) if is_plain(key) => {
                    self.input.push(c);
                    let q = self.input.clone();
                    self.view.set_search(&q);
                    self.view.search_next(true);
                }
                _ => {}
            },
            Mode::Normal => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return true,
                KeyCode::Char('f') => {
                    self.mode = Mode::Filtering;
                    self.input = self.view.filter_query().to_owned();
                }
                KeyCode::Char('/') => {
                    self.mode = Mode::Searching;
                    self.input = self.view.search_query().to_owned();
                }
                KeyCode::Down | KeyCode::Char('j') => self.view.move_cursor(1),
                KeyCode::Up | KeyCode::Char('k') => self.view.move_cursor(-1),
                KeyCode::Char('g') => self.view.cursor_to_start(),
                KeyCode::Char('G') => self.view.cursor_to_end(),
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.view.half_page(true);
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.view.half_page(false);
                }
                KeyCode::Char('n') => self.view.search_next(true),
                KeyCode::Char('N') => self.view.search_next(false),
                KeyCode::Enter => {
                    let dir_path = self
                        .view
                        .selected()
                        .filter(|n| n.is_dir())
                        .map(|n| n.path.clone());
                    if let Some(path) = dir_path {
                        self.view.toggle_collapse(&path);
                    }
                }
                _ => {}
            },
        }
        false
    }
}

async fn refresh(app: &mut AppState) -> anyhow::Result<()> {
    let git = app.git.clone();
    let selected_path = app.selected_worktree().map(|w| w.path.clone());
    let log_limit = app.cfg.status.log_limit;

    struct RefreshData {
        worktrees: Vec<Worktree>,
        counts: Vec<ChangeCounts>,
        selected: usize,
        files: Vec<ChangedFile>,
        commits: Vec<CommitInfo>,
    }

    let data = tokio::task::spawn_blocking(move || -> Result<RefreshData, WtdashError> {
        let worktrees = worktree::list(&git)?;
        let selected = selected_path
            .as_deref()
            .and_then(|p| worktrees.iter().position(|w| w.path == p))
            .or_else(|| worktrees.iter().position(|w| w.is_main))
            .unwrap_or(0);

        let mut counts = Vec::with_capacity(worktrees.len());
        let mut files = Vec::new();
        for (i, wt) in worktrees.iter().enumerate() {
            let parsed = git
                .status_porcelain(Path::new(&wt.path))
                .map(|raw| changes::parse_status_porcelain_v2(&raw))
                .unwrap_or_default();
            counts.push(changes::change_counts(&parsed));
            if i == selected {
                files = parsed;
            }
        }

        let commits = match worktrees.get(selected) {
            Some(wt) => git
                .recent_commits(Path::new(&wt.path), log_limit)
                .unwrap_or_default(),
            None => Vec::new(),
        };

        Ok(RefreshData {
            worktrees,
            counts,
            selected,
            files,
            commits,
        })
    })
    .await??;

    app.worktrees = data.worktrees;
    app.counts = data.counts;
    app.wt_state.select(Some(data.selected));
    app.changes.set_records(data.files);
    app.commits = data.commits;
    if app.log_index >= app.commits.len() {
        app.log_index = app.commits.len().saturating_sub(1);
    }
    Ok(())
}

async fn open_commit_modal(app: &mut AppState, commit: CommitInfo) -> anyhow::Result<()> {
    let git = app.git.clone();
    let Some(wt_path) = app.selected_worktree().map(|w| w.path.clone()) else {
        return Ok(());
    };
    let hash = commit.hash.clone();

    let files = tokio::task::spawn_blocking(move || -> Result<Vec<CommitFile>, WtdashError> {
        let raw = git.commit_files(Path::new(&wt_path), &hash)?;
        Ok(changes::parse_name_status(&raw))
    })
    .await??;

    app.modal = Some(CommitModal::new(commit, files));
    Ok(())
}

fn handle_key(key: KeyEvent, app: &mut AppState) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        return Action::Quit;
    }

    if let Some(modal) = app.modal.as_mut() {
        if modal.handle_key(key) {
            app.modal = None;
        }
        return Action::None;
    }

    match app.mode {
        Mode::Filtering => match key.code {
            KeyCode::Enter => app.mode = Mode::Normal,
            KeyCode::Esc => {
                app.mode = Mode::Normal;
                app.input.clear();
                app.changes.clear_filter();
            }
            KeyCode::Backspace => {
                app.input.pop();
                let q = app.input.clone();
                app.changes.set_filter(&q);
            }
            KeyCode::Char(c) if is_plain(key) => {
                app.input.push(c);
                let q = app.input.clone();
                app.changes.set_filter(&q);
            }
            _ => {}
        },
        Mode::Searching => match key.code {
            KeyCode::Enter => app.mode = Mode::Normal,
            KeyCode::Esc => {
                app.mode = Mode::Normal;
                app.input.clear();
                app.changes.clear_search();
            }
            KeyCode::Char('n') => app.changes.search_next(true),
            KeyCode::Char('N') => app.changes.search_next(false),
            KeyCode::Backspace => {
                app.input.pop();
                let q = app.input.clone();
                app.changes.set_search(&q);
                if !q.is_empty() {
                    app.changes.search_next(true);
                }
            }
            KeyCode::Char(c) if is_plain(key) => {
                app.input.push(c);
                let q = app.input.clone();
                app.changes.set_search(&q);
                app.changes.search_next(true);
            }
            _ => {}
        },
        Mode::Normal => return handle_normal_key(key, app),
    }

    Action::None
}

fn handle_normal_key(key: KeyEvent, app: &mut AppState) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::Char('r') => app.needs_refresh = true,
        KeyCode::Down | KeyCode::Char('j') => match app.focus {
            Focus::Worktrees => app.move_worktree(1),
            Focus::Changes => app.changes.move_cursor(1),
            Focus::Log => app.move_log(1),
        },
        KeyCode::Up | KeyCode::Char('k') => match app.focus {
            Focus::Worktrees => app.move_worktree(-1),
            Focus::Changes => app.changes.move_cursor(-1),
            Focus::Log => app.move_log(-1),
        },
        KeyCode::Char('g') if app.focus == Focus::Changes => app.changes.cursor_to_start(),
        KeyCode::Char('G') if app.focus == Focus::Changes => app.changes.cursor_to_end(),
        KeyCode::Char('d')
            if key.modifiers.contains(KeyModifiers::CONTROL) && app.focus == Focus::Changes =>
        {
            app.changes.half_page(true);
        }
        KeyCode::Char('u')
            if key.modifiers.contains(KeyModifiers::CONTROL) && app.focus == Focus::Changes =>
        {
            app.changes.half_page(false);
        }
        KeyCode::Char('f') if app.focus == Focus::Changes => {
            app.mode = Mode::Filtering;
            app.input = app.changes.filter_query().to_owned();
        }
        KeyCode::Char('/') if app.focus == Focus::Changes => {
            app.mode = Mode::Searching;
            app.input = app.changes.search_query().to_owned();
        }
        KeyCode::Char('n') if app.focus == Focus::Changes => app.changes.search_next(true),
        KeyCode::Char('N') if app.focus == Focus::Changes => app.changes.search_next(false),
        KeyCode::Enter => match app.focus {
            Focus::Worktrees => app.focus = Focus::Changes,
            Focus::Changes => {
                let dir_path = app
                    .changes
                    .selected()
                    .filter(|n| n.is_dir())
                    .map(|n| n.path.clone());
                if let Some(path) = dir_path {
                    app.changes.toggle_collapse(&path);
                }
            }
            Focus::Log => {
                if let Some(commit) = app.commits.get(app.log_index) {
                    return Action::OpenCommit(commit.clone());
                }
            }
        },
        _ => {}
    }
    Action::None
}

fn is_plain(key: KeyEvent) -> bool {
    !key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT)
}

fn draw(f: &mut Frame<'_>, app: &mut AppState) {
    let area = f.area();
    let outer = Block::default().title("wtdash").borders(Borders::ALL);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(chunks[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(12)])
        .split(body[0]);

    draw_worktrees(f, left[0], app);
    draw_log(f, left[1], app);
    draw_changes(f, body[1], app);
    draw_footer(f, chunks[1], app);

    if app.modal.is_some() {
        draw_modal(f, app);
    }
}

fn draw_worktrees(f: &mut Frame<'_>, area: Rect, app: &mut AppState) {
    let header = Row::new(vec!["BRANCH", "CHANGES", "PATH"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = app.worktrees.iter().enumerate().map(|(i, wt)| {
        let marker = if wt.is_main && app.cfg.ui.icons {
            "\u{25cf} "
        } else {
            "  "
        };
        let counts = app.counts.get(i).copied().unwrap_or_default();
        let path = if app.cfg.ui.tilde_home {
            config::tilde_path(&wt.path)
        } else {
            wt.path.clone()
        };
        Row::new(vec![
            format!("{marker}{}", wt.branch),
            format_counts(counts),
            path,
        ])
    });

    let widths = vec![
        Constraint::Percentage(40),
        Constraint::Length(12),
        Constraint::Percentage(40),
    ];

    let title = if app.focus == Focus::Worktrees {
        "Worktrees*"
    } else {
        "Worktrees"
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">");

    f.render_stateful_widget(table, area, &mut app.wt_state);
}

fn draw_log(f: &mut Frame<'_>, area: Rect, app: &AppState) {
    let title = if app.focus == Focus::Log {
        "Commits*"
    } else {
        "Commits"
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner_height = usize::from(block.inner(area).height);

    // Keep the selected commit inside the window.
    let start = app.log_index.saturating_sub(inner_height.saturating_sub(1));
    let lines: Vec<Line<'_>> = app
        .commits
        .iter()
        .enumerate()
        .skip(start)
        .take(inner_height.max(1))
        .map(|(i, c)| {
            let selected = i == app.log_index && app.focus == Focus::Log;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{} ", c.short_hash()), Style::default().fg(Color::Yellow)),
                Span::styled(c.subject.clone(), style),
                Span::styled(
                    format!("  {}", format_relative(&c.date_iso)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}

fn draw_changes(f: &mut Frame<'_>, area: Rect, app: &mut AppState) {
    let mut title = format!(
        "Changes ({}/{})",
        app.changes.matched_records(),
        app.changes.total_records()
    );
    if !app.changes.filter_query().is_empty() {
        title.push_str(" [filtered]");
    }
    if app.focus == Focus::Changes {
        title.push('*');
    }

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    app.changes.set_page_size(usize::from(inner.height.max(1)));

    let focused = app.focus == Focus::Changes && app.modal.is_none();
    let lines = tree_lines(&app.changes, &app.icons, usize::from(inner.height), focused);
    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &AppState) {
    let keys = match app.mode {
        Mode::Normal => {
            "q quit • Tab focus • j/k move • Enter toggle/open • f filter • / search • n/N match • r refresh"
        }
        Mode::Filtering => "type to filter • Enter keep • Esc clear",
        Mode::Searching => "type to search • n/N next/prev • Enter keep • Esc clear",
    };

    let mut lines = Vec::new();
    if app.mode != Mode::Normal {
        let label = if app.mode == Mode::Filtering {
            "Filter: "
        } else {
            "Search: "
        };
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(app.input.clone()),
        ]));
    } else if let Some(wt) = app.selected_worktree() {
        lines.push(Line::from(vec![
            Span::styled("Worktree: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(config::tilde_path(&wt.path)),
        ]));
    }

    if let Some(err) = &app.last_error {
        lines.push(Line::from(Span::styled(
            format!("Last error: {err}"),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            keys,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn draw_modal(f: &mut Frame<'_>, app: &mut AppState) {
    let Some(modal) = app.modal.as_mut() else {
        return;
    };

    let popup_area = centered_rect(80, 75, f.area());
    f.render_widget(Clear, popup_area);

    let title = format!("Files in commit {}", modal.meta.short_hash());
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(inner);

    let meta_lines = vec![
        Line::from(vec![
            Span::styled("Commit: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(modal.meta.hash.clone()),
        ]),
        Line::from(vec![
            Span::styled("Author: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(modal.meta.author.clone()),
            Span::styled(
                format!("  {}", format_relative(&modal.meta.date_iso)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            modal.meta.subject.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(Paragraph::new(meta_lines), chunks[0]);

    modal.view.set_page_size(usize::from(chunks[1].height.max(1)));
    let lines = tree_lines(&modal.view, &app.icons, usize::from(chunks[1].height), true);
    f.render_widget(Paragraph::new(lines), chunks[1]);

    let stats = match modal.mode {
        Mode::Normal => format!(
            "{}/{} files • j/k move • Enter toggle • f filter • / search • q close",
            modal.view.matched_records(),
            modal.view.total_records()
        ),
        Mode::Filtering => format!("Filter: {}", modal.input),
        Mode::Searching => format!("Search: {}", modal.input),
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            stats,
            Style::default().fg(Color::DarkGray),
        ))),
        chunks[2],
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn format_counts(counts: ChangeCounts) -> String {
    if !counts.is_dirty() {
        return "-".to_owned();
    }
    let mut parts = Vec::new();
    if counts.staged > 0 {
        parts.push(format!("+{}", counts.staged));
    }
    if counts.modified > 0 {
        parts.push(format!("~{}", counts.modified));
    }
    if counts.untracked > 0 {
        parts.push(format!("?{}", counts.untracked));
    }
    parts.join(" ")
}

fn format_relative(date_iso: &str) -> String {
    if date_iso.is_empty() {
        return "unknown".to_owned();
    }
    let Ok(t) =
        time::OffsetDateTime::parse(date_iso, &time::format_description::well_known::Rfc3339)
    else {
        return date_iso.to_owned();
    };
    let now = time::OffsetDateTime::now_utc();
    let diff = now - t;
    if diff < time::Duration::minutes(1) {
        "just now".to_owned()
    } else if diff < time::Duration::hours(1) {
        let mins = diff.whole_minutes();
        if mins == 1 {
            "1 min ago".to_owned()
        } else {
            format!("{mins} mins ago")
        }
    } else if diff < time::Duration::days(1) {
        let hours = diff.whole_hours();
        if hours == 1 {
            "1 hour ago".to_owned()
        } else {
            format!("{hours} hours ago")
        }
    } else if diff < time::Duration::days(7) {
        let days = diff.whole_days();
        if days == 1 {
            "1 day ago".to_owned()
        } else {
            format!("{days} days ago")
        }
    } else {
        t.date().to_string()
    }
}
