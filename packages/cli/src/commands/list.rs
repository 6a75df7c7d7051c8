use super::load_site_dir;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sitekit_model::{SiteQuery, SiteStore};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only published sites
    #[arg(long)]
    pub published: bool,

    /// Filter by name or slug
    #[arg(short, long)]
    pub search: Option<String>,

    /// Maximum number of sites to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

pub fn list(args: ListArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let site_dir = config.get_site_dir(cwd);
    let store = load_site_dir(&site_dir)?;

    let sites = store.list_sites(&SiteQuery {
        published_only: args.published,
        search: args.search,
        limit: args.limit,
    });

    if sites.is_empty() {
        println!("{}", "⚠️  No sites found".yellow());
        return Ok(());
    }

    for site in &sites {
        let status = if site.published {
            "published".green()
        } else {
            "draft".dimmed()
        };
        println!(
            "  {:<24} {:<32} {:>3} pages  {}",
            site.slug.bright_white(),
            site.name,
            site.pages.len(),
            status
        );
    }
    println!();
    println!("{} of {} sites", sites.len(), store.len());

    Ok(())
}
