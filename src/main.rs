use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use twig::areas::config::ConfigScope;
use twig::areas::repository::Repository;
use twig::commands::plumbing::cat_file::CatFileOptions;
use twig::commands::porcelain::add::AddOptions;
use twig::commands::porcelain::commit::CommitOptions;
use twig::commands::porcelain::init::InitOptions;
use twig::commands::porcelain::log::LogOptions;
use twig::commands::porcelain::status::StatusOptions;
use twig::commands::porcelain::switch::SwitchOptions;

#[derive(Parser)]
#[command(
    name = "twig",
    version,
    about = "A small local version control system",
    long_about = "twig stores snapshots of a directory as content-addressed blob, \
    tree and commit objects, with branches, fast-forward merges and a staging index.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create an empty repository",
        long_about = "Create the .twig directory in the given directory, or in the current one. \
        Running it again on an existing repository keeps its data."
    )]
    Init {
        #[arg(index = 1, help = "Directory to initialize")]
        path: Option<PathBuf>,
        #[arg(short, long, help = "Only print error messages")]
        quiet: bool,
    },
    #[command(name = "add", about = "Add file contents to the index")]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
        #[arg(short, long, help = "Print every staged file")]
        verbose: bool,
    },
    #[command(name = "commit", about = "Record the index as a new commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Machine-readable short format")]
        porcelain: bool,
    },
    #[command(name = "log", about = "Show the first-parent commit history")]
    Log {
        #[arg(long, help = "One commit per line")]
        oneline: bool,
    },
    #[command(name = "branch", about = "List, create, delete or rename branches")]
    Branch(BranchArgs),
    #[command(name = "switch", about = "Switch to another branch")]
    Switch {
        #[arg(index = 1)]
        branch: String,
        #[arg(short = 'c', long, help = "Create the branch at HEAD first")]
        create: bool,
    },
    #[command(name = "merge", about = "Fast-forward the current branch to another branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "config", about = "Get and set configuration values")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
        #[arg(long, global = true, help = "Use the global configuration file")]
        global: bool,
    },
    #[command(name = "cat-file", about = "Print information about an object")]
    CatFile {
        #[arg(index = 1, help = "Full object id")]
        object: String,
        #[command(flatten)]
        mode: CatFileMode,
    },
    #[command(
        name = "hash-object",
        about = "Compute the blob id of a file and optionally store it"
    )]
    HashObject {
        #[arg(short, long, help = "Write the blob to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(index = 1, help = "Tree or commit id")]
        object: String,
    },
}

#[derive(Args)]
struct BranchArgs {
    #[arg(index = 1, help = "Branch to create, or to delete/rename")]
    name: Option<String>,
    #[arg(index = 2, help = "New name when renaming")]
    new_name: Option<String>,
    #[arg(short = 'd', long, conflicts_with = "rename", help = "Delete the branch")]
    delete: bool,
    #[arg(short = 'm', long, help = "Rename <name> to <new_name>")]
    rename: bool,
}

#[derive(Args)]
#[group(multiple = false)]
struct CatFileMode {
    #[arg(short = 'p', help = "Pretty-print the object content")]
    pretty: bool,
    #[arg(short = 't', help = "Print the object type")]
    type_only: bool,
    #[arg(short = 's', help = "Print the content size")]
    size_only: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    Get { key: String },
    Set { key: String, value: String },
    Unset {
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },
    List,
}

fn main() {
    init_tracing();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("twig=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir().context("Unable to read current directory")?;

    Ok(Repository::open(&pwd, Box::new(std::io::stdout()))?)
}

fn init_repository(path: Option<&Path>, quiet: bool) -> Result<()> {
    let pwd = std::env::current_dir().context("Unable to read current directory")?;
    let path = match path {
        Some(path) => pwd.join(path),
        None => pwd,
    };

    if path.is_file() {
        anyhow::bail!("'{}' exists and is not a directory", path.display());
    }
    std::fs::create_dir_all(&path)
        .with_context(|| format!("Unable to create directory {}", path.display()))?;

    let repository = Repository::new(&path, Box::new(std::io::stdout()))?;
    repository.init(&InitOptions { quiet })
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path, quiet } => init_repository(path.as_deref(), quiet)?,
        Commands::Add { paths, verbose } => {
            open_repository()?.add(&paths, &AddOptions { verbose })?
        }
        Commands::Commit { message } => {
            open_repository()?.commit(&CommitOptions { message })?;
        }
        Commands::Status { porcelain } => {
            open_repository()?.show_status(&StatusOptions { porcelain })?;
        }
        Commands::Log { oneline } => open_repository()?.log(&LogOptions { oneline })?,
        Commands::Branch(args) => run_branch(open_repository()?, args)?,
        Commands::Switch { branch, create } => {
            open_repository()?.switch(&branch, &SwitchOptions { create })?;
        }
        Commands::Merge { branch } => {
            open_repository()?.merge(&branch)?;
        }
        Commands::Config { action, global } => {
            let scope = if global {
                ConfigScope::Global
            } else {
                ConfigScope::Repository
            };
            run_config(open_repository()?, action, global.then_some(scope), scope)?
        }
        Commands::CatFile { object, mode } => open_repository()?.cat_file(
            &object,
            &CatFileOptions {
                pretty: mode.pretty,
                type_only: mode.type_only,
                size_only: mode.size_only,
            },
        )?,
        Commands::HashObject { write, file } => {
            open_repository()?.hash_object(&file, write)?;
        }
        Commands::LsTree { object } => open_repository()?.ls_tree(&object)?,
    }

    Ok(())
}

fn run_branch(repository: Repository, args: BranchArgs) -> Result<()> {
    match (args.name, args.new_name) {
        (Some(name), None) if args.delete => repository.delete_branch(&name),
        (Some(old), Some(new)) if args.rename => repository.rename_branch(&old, &new),
        (Some(name), None) if !args.rename => repository.create_branch(&name).map(|_| ()),
        (None, None) if !args.delete && !args.rename => {
            repository.list_branches().map(|_| ())
        }
        _ => anyhow::bail!("usage: twig branch [<name> | -d <name> | -m <old> <new>]"),
    }
}

fn run_config(
    repository: Repository,
    action: ConfigAction,
    explicit_scope: Option<ConfigScope>,
    scope: ConfigScope,
) -> Result<()> {
    match action {
        ConfigAction::Get { key } => repository.config_get(&key, explicit_scope).map(|_| ()),
        ConfigAction::Set { key, value } => repository.config_set(&key, &value, scope),
        ConfigAction::Unset { keys } => repository.config_unset(&keys, scope),
        ConfigAction::List => repository.config_list(scope).map(|_| ()),
    }
}
