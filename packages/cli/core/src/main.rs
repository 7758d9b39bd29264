/* packages/cli/core/src/main.rs */

mod build;
mod config;
mod list;
mod serve;
mod ui;
mod watch;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

use config::{Project, resolve_project};

#[derive(Parser)]
#[command(name = "pages-tree", about = "Collect application routes from build manifests", version)]
struct Cli {
  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,
  #[command(subcommand)]
  command: Command,
}

#[derive(Args)]
struct ProjectArgs {
  /// Path to pages-tree.toml (auto-detected if omitted)
  #[arg(short, long)]
  config: Option<PathBuf>,
  /// Project root (defaults to the config file's directory or the cwd)
  #[arg(short, long)]
  root: Option<PathBuf>,
  /// Framework build directory, relative to the project root
  #[arg(short, long)]
  dir: Option<PathBuf>,
}

impl ProjectArgs {
  fn resolve(self) -> Result<Project> {
    resolve_project(self.config, self.root, self.dir)
  }
}

#[derive(Subcommand)]
enum Command {
  /// Collect routes from a finished build and write the artifacts
  Build {
    #[command(flatten)]
    project: ProjectArgs,
  },
  /// Re-collect routes whenever the build manifests change
  Watch {
    #[command(flatten)]
    project: ProjectArgs,
  },
  /// Serve the routes endpoint and the generated files
  Serve {
    #[command(flatten)]
    project: ProjectArgs,
    /// Port to listen on (overrides [serve].port)
    #[arg(short, long)]
    port: Option<u16>,
  },
  /// Print the normalized routes without writing anything
  List {
    #[command(flatten)]
    project: ProjectArgs,
    /// Print the collection as JSON
    #[arg(long)]
    json: bool,
  },
}

fn init_tracing(verbose: u8) {
  use tracing_subscriber::{EnvFilter, fmt};

  let filter = match verbose {
    0 => "pages_tree=info",
    1 => "pages_tree=debug",
    _ => "pages_tree=trace",
  };
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
  fmt().with_env_filter(env_filter).with_target(false).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Command::Build { project } => {
      // Degraded outcomes are reported, not turned into a failing exit status
      build::run_build(&project.resolve()?).await?;
    }
    Command::Watch { project } => watch::run_watch(&project.resolve()?).await?,
    Command::Serve { project, port } => serve::run_serve(&project.resolve()?, port).await?,
    Command::List { project, json } => list::run_list(&project.resolve()?, json).await?,
  }

  Ok(())
}
