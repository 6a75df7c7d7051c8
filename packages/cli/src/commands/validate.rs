use super::{load_site, resolve_path};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use sitekit_model::{ValidationLevel, Validator};
use sitekit_renderer::builtin_registry;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Site JSON file
    pub site: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let path = resolve_path(cwd, &args.site);
    let site = load_site(&path)?;

    println!("🔍 {} {}", "Validating".green().bold(), path.display());

    let mut findings = Validator::new().validate(&site);
    let errors = findings
        .iter()
        .filter(|f| f.level == ValidationLevel::Error)
        .count();
    let warnings = findings.len() - errors;

    // Blocks the built-in registry cannot render are skipped by viewers
    let registry = builtin_registry();
    let unknown: BTreeSet<&str> = site
        .pages
        .iter()
        .flat_map(|page| page.components.iter())
        .map(|component| component.block_type.as_str())
        .filter(|block_type| !registry.contains(block_type))
        .collect();

    findings.sort_by(|a, b| a.page_slug.cmp(&b.page_slug));
    for finding in &findings {
        let tag = match finding.level {
            ValidationLevel::Error => "error".red().bold(),
            ValidationLevel::Warning => "warning".yellow().bold(),
        };
        match &finding.page_slug {
            Some(slug) => println!("  {} [{}] {}", tag, slug, finding.message),
            None => println!("  {} {}", tag, finding.message),
        }
    }
    for block_type in &unknown {
        println!("  {} unknown block type '{}'", "note".dimmed(), block_type);
    }

    println!();
    println!("   Pages: {}", site.pages.len());
    if errors > 0 {
        println!("   {} {}", "Errors:".red(), errors);
    }
    if warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), warnings);
    }

    if errors > 0 || (args.strict && warnings > 0) {
        return Err(anyhow!("{} failed validation", site.slug));
    }

    println!("{}", "✅ Site is valid".green().bold());
    Ok(())
}
