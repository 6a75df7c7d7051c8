mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    init, list, preview, render, validate, InitArgs, ListArgs, PreviewArgs, RenderArgs,
    ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Sitekit CLI - build, check and render block-based sites
#[derive(Parser, Debug)]
#[command(name = "sitekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new site from a template
    Init(InitArgs),

    /// Check a site file for structural problems
    Validate(ValidateArgs),

    /// Render a page of a site to HTML
    Render(RenderArgs),

    /// Render a scaled preview of a site
    Preview(PreviewArgs),

    /// List sites in the site directory
    List(ListArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match std::env::current_dir() {
        Ok(cwd) => {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Validate(args) => validate(args, &cwd),
                Command::Render(args) => render(args, &cwd).await,
                Command::Preview(args) => preview(args, &cwd).await,
                Command::List(args) => list(args, &cwd),
            }
        }
        Err(err) => Err(anyhow::anyhow!("Cannot get current directory: {}", err)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
