/// The Big IDEA:
/// Sharing a slice of a code base (with a reviewer, a chat window, a
/// ticket) usually means pasting files one by one. fs42 glues the files
/// into a single text document where every file starts with a
/// `// >>> <relative_path>` marker, and can cut such a document (possibly
/// edited in the meantime) back into files on disk.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use fs42::builders::reporter::ConsoleReporter;
use fs42::builders::validator::{ConfigValidator, StandardValidator};
use fs42::core::config::{ConfigManager, ConfigProvider, ExportFormat};
use fs42::core::engine::{Fs42Engine, MergeRequest, SplitRequest};
use fs42::utils;

#[derive(Parser)]
#[command(name = "fs42", version)]
#[command(about = "Merge multiple files into one file with markers, and split it back")]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RootArgs {
    /// Root directory for relative paths
    #[arg(short, long = "root-dir", value_name = "DIR")]
    root_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge multiple files into a single file with markers.
    /// NOTE: All paths must be relative to module root
    Merge {
        /// Comma-separated list of files/directories to merge
        paths: String,

        /// Comma-separated patterns to ignore
        #[arg(short, long, default_value = "")]
        ignore: String,

        /// Read additional ignore patterns from a .gitignore-style file
        #[arg(long = "ignore-file", value_name = "FILE")]
        ignore_files: Vec<PathBuf>,

        /// Path to output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE_PATH")]
        output: Option<PathBuf>,

        /// Also merge dotfiles and the contents of dot-directories (e.g. .git)
        /// found while expanding directories
        #[arg(long)]
        include_hidden: bool,

        /// Print the merged files as a tree
        #[arg(long)]
        tree: bool,

        #[command(flatten)]
        root: RootArgs,
    },
    /// Split a merged file back into individual files.
    /// NOTE: All paths must be relative to module root
    Split {
        /// Directory to output split files
        output_dir: PathBuf,

        /// File containing merged content
        merge_file: PathBuf,

        /// Write files even when a marker points outside the output directory
        #[arg(long)]
        allow_unsafe_paths: bool,

        /// Parse and report without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Print the extracted files as a tree
        #[arg(long)]
        tree: bool,

        #[command(flatten)]
        root: RootArgs,
    },
    /// Create a default .fs42.toml in the root directory
    Init {
        #[command(flatten)]
        root: RootArgs,
    },
    /// Check .fs42.toml for problems
    Validate {
        #[command(flatten)]
        root: RootArgs,
    },
    /// Print the effective configuration
    Config {
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ExportFormat,

        #[command(flatten)]
        root: RootArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to read working directory")?;

    match cli.command {
        Commands::Merge {
            paths,
            ignore,
            ignore_files,
            output,
            include_hidden,
            tree,
            root,
        } => {
            let engine = engine_for(&root, &working_dir, cli.verbose, cli.quiet, tree)?;
            let request = MergeRequest {
                paths: utils::split_csv(&paths),
                ignore: utils::split_csv(&ignore),
                ignore_files,
                include_hidden,
                output,
            };
            let mut stdout = std::io::stdout().lock();
            engine.run_merge(&request, &working_dir, &mut stdout)?;
        }
        Commands::Split {
            output_dir,
            merge_file,
            allow_unsafe_paths,
            dry_run,
            tree,
            root,
        } => {
            let engine = engine_for(&root, &working_dir, cli.verbose, cli.quiet, tree)?;
            engine.run_split(&SplitRequest {
                output_dir,
                merge_file,
                allow_unsafe_paths,
                dry_run,
            })?;
        }
        Commands::Init { root } => {
            utils::init_logging(cli.verbose, cli.quiet);
            let manager = ConfigManager::new_at(root_dir(&root, &working_dir));
            if manager.initialize()? {
                println!(
                    "{}",
                    format!("✓ Created {}", manager.get_config_path().display()).green()
                );
            } else {
                println!("ℹ️  {} already exists", manager.get_config_path().display());
            }
        }
        Commands::Validate { root } => {
            utils::init_logging(cli.verbose, cli.quiet);
            let manager = ConfigManager::new_at(root_dir(&root, &working_dir));
            let config = manager.load_config()?;
            let issues = StandardValidator::new().validate_config(&config, manager.get_root_dir())?;

            if issues.is_empty() {
                println!("{}", "✓ Configuration is valid.".green());
            } else {
                println!("⚠️  Found issues in configuration:");
                for issue in issues {
                    println!("  - {issue}");
                }
                anyhow::bail!("Configuration validation failed.");
            }
        }
        Commands::Config { format, root } => {
            utils::init_logging(cli.verbose, cli.quiet);
            let manager = ConfigManager::new_at(root_dir(&root, &working_dir));
            print!("{}", manager.export_config(format)?);
        }
    }

    Ok(())
}

fn root_dir(root: &RootArgs, working_dir: &Path) -> PathBuf {
    match &root.root_dir {
        Some(dir) => utils::resolve_path(working_dir, dir),
        None => working_dir.to_path_buf(),
    }
}

/// Loads the configuration for the root directory, then starts logging
/// (the config file may turn on verbose output) and builds the engine.
fn engine_for(
    root: &RootArgs,
    working_dir: &Path,
    verbose: bool,
    quiet: bool,
    show_tree: bool,
) -> Result<Fs42Engine> {
    let manager = ConfigManager::new_at(root_dir(root, working_dir));
    let engine = Fs42Engine::new(manager, Box::new(ConsoleReporter::new(show_tree)))?;
    utils::init_logging(verbose || engine.config().settings.verbose, quiet);
    Ok(engine)
}
