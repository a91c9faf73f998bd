#![forbid(unsafe_code)]

use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory as _, Parser, Subcommand};

use crate::config;
use crate::core::changes::{self, ChangeRecord};
use crate::core::git::Git;
use crate::core::worktree;
use crate::tree::TreeView;
use crate::tui::app::{self, DashboardOptions};

#[derive(Debug, Parser)]
#[command(
    name = "wtdash",
    version,
    about = "Terminal dashboard for git worktree changes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the change tree for a worktree
    Status(StatusArgs),
    /// Print the file tree of a single commit
    Files(FilesArgs),
    /// List worktrees
    List(ListArgs),
    /// Show or locate the configuration
    Config(ConfigArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Only show files whose name contains this substring
    #[arg(short = 'f', long = "filter", default_value = "")]
    pub filter: String,
    /// Output the flattened tree as JSON
    #[arg(long = "json")]
    pub json: bool,
    /// Worktree to inspect (substring of branch or path; default: cwd)
    pub pattern: Option<String>,
}

#[derive(Debug, Parser)]
pub struct FilesArgs {
    /// Commit to inspect
    pub commit: String,
    /// Only show files whose name contains this substring
    #[arg(short = 'f', long = "filter", default_value = "")]
    pub filter: String,
    /// Output the flattened tree as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Output in JSON format
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub cmd: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

#[derive(Debug, Parser)]
pub struct CompletionArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

pub async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wtdash: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.cmd {
        None => {
            let (cfg, _paths) = config::load()?;
            app::run(DashboardOptions { cfg }).await
        }
        Some(Commands::Status(args)) => cmd_status(&args),
        Some(Commands::Files(args)) => cmd_files(&args),
        Some(Commands::List(args)) => cmd_list(&args),
        Some(Commands::Config(args)) => cmd_config(&args),
        Some(Commands::Completion(args)) => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                args.shell,
                &mut cmd,
                "wtdash",
                &mut std::io::stdout().lock(),
            );
            Ok(())
        }
    }
}

fn cmd_status(args: &StatusArgs) -> anyhow::Result<()> {
    let git = Git::from_cwd()?;
    let dir = match &args.pattern {
        Some(pattern) => {
            let worktrees = worktree::list(&git)?;
            let wt = worktree::find_matching(&worktrees, pattern)?;
            Path::new(&wt.path).to_path_buf()
        }
        None => git.repo_root().to_path_buf(),
    };

    let raw = git.status_porcelain(&dir)?;
    let files = changes::parse_status_porcelain_v2(&raw);
    let mut view = TreeView::with_records(files, usize::MAX);
    view.set_filter(&args.filter);

    print_tree(&view, args.json)
}

fn cmd_files(args: &FilesArgs) -> anyhow::Result<()> {
    let git = Git::from_cwd()?;
    let raw = git.commit_files(git.repo_root(), &args.commit)?;
    let files = changes::parse_name_status(&raw);
    let mut view = TreeView::with_records(files, usize::MAX);
    view.set_filter(&args.filter);

    print_tree(&view, args.json)
}

fn print_tree<R>(view: &TreeView<R>, json: bool) -> anyhow::Result<()>
where
    R: ChangeRecord + Clone + serde::Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(view.nodes())?);
        return Ok(());
    }

    if view.is_empty() {
        println!("no changes");
        return Ok(());
    }
    for node in view.nodes() {
        let indent = "  ".repeat(node.depth);
        if node.is_dir() {
            println!("{indent}{}/", node.display_label());
        } else {
            let marker = node
                .record
                .as_ref()
                .map(|r| r.kind().marker())
                .unwrap_or_default();
            println!("{indent}{} {marker}", node.name());
        }
    }
    Ok(())
}

fn cmd_list(args: &ListArgs) -> anyhow::Result<()> {
    let git = Git::from_cwd()?;
    let worktrees = worktree::list(&git)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&worktrees)?);
        return Ok(());
    }

    for wt in &worktrees {
        let marker = if wt.is_main { "*" } else { " " };
        println!(
            "{marker} {:30} {:10} {}",
            wt.branch,
            short_hash(&wt.head),
            config::tilde_path(&wt.path)
        );
    }
    Ok(())
}

fn short_hash(hash: &str) -> &str {
    let end = hash.char_indices().nth(7).map_or(hash.len(), |(i, _)| i);
    &hash[..end]
}

fn cmd_config(args: &ConfigArgs) -> anyhow::Result<()> {
    match args.cmd {
        ConfigCommands::Show => {
            let (cfg, _paths) = config::load()?;
            print!("{}", config::resolved_toml(&cfg)?);
        }
        ConfigCommands::Path => {
            let paths = config::default_paths()?;
            println!("{}", paths.config_file.display());
        }
    }
    Ok(())
}
