use super::{load_site_dir, write_output};
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use sitekit_model::{starter_template, NewSite, SiteStore};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Slug of the new site
    pub slug: String,

    /// Display name (defaults to the slug)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Template to start from (starter, blank)
    #[arg(short, long, default_value = "starter")]
    pub template: String,

    /// Overwrite an existing site file
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
    let config = Config::load(cwd)?;

    let template = match args.template.as_str() {
        "starter" => Some(starter_template()),
        "blank" => None,
        other => return Err(anyhow!("Unknown template: {}. Use: starter or blank", other)),
    };

    let site_dir = config.get_site_dir(cwd);
    let site_path = site_dir.join(format!("{}.json", args.slug));
    if site_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            site_path.display().to_string().bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Creating site...".bright_blue().bold());

    if !config_path.exists() {
        write_output(&config_path, &serde_json::to_string_pretty(&config)?)?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    let mut store = load_site_dir(&site_dir)?;
    if args.force {
        if let Some(existing) = store.get_site_by_slug(&args.slug) {
            store.delete_site(&existing.id)?;
        }
    }

    let mut site = store.create_site(NewSite {
        name: args.name.clone().unwrap_or_else(|| args.slug.clone()),
        slug: args.slug.clone(),
        template,
    })?;
    if let Some(language) = &config.default_language {
        site.default_language = language.clone();
        if !site.languages.contains(language) {
            site.languages.push(language.clone());
        }
    }

    write_output(&site_path, &site.to_json_pretty()?)?;
    println!(
        "  {} Created {} ({} pages)",
        "✓".green(),
        site_path.strip_prefix(cwd).unwrap_or(&site_path).display(),
        site.pages.len()
    );
    println!();
    println!("{}", "✅ Site created!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: sitekit validate {}", site_path.display());
    println!("  2. Run: sitekit render {} --draft", site_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::load_site;
    use crate::commands::test_support::scratch_dir;

    fn args(slug: &str, template: &str) -> InitArgs {
        InitArgs {
            slug: slug.to_string(),
            name: Some("Demo".to_string()),
            template: template.to_string(),
            force: false,
        }
    }

    #[test]
    fn test_init_writes_config_and_site() {
        let dir = scratch_dir("init");
        let cwd = dir.display().to_string();

        init(args("demo", "starter"), &cwd).unwrap();

        assert!(dir.join(DEFAULT_CONFIG_NAME).exists());
        let site = load_site(&dir.join("sites/demo.json")).unwrap();
        assert_eq!(site.name, "Demo");
        assert_eq!(site.pages.len(), starter_template().pages().len());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_init_rejects_unknown_template() {
        let dir = scratch_dir("init-template");
        let cwd = dir.display().to_string();

        assert!(init(args("demo", "portfolio"), &cwd).is_err());
        assert!(!dir.join("sites/demo.json").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
