use super::{builtin_renderer, load_site, resolve_path, write_output};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sitekit_model::DeviceView;
use sitekit_renderer::{page_html, render_site, HtmlOptions, ViewerOptions};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Site JSON file
    pub site: PathBuf,

    /// Page slug (defaults to the home page)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Device to render for (desktop, tablet, mobile)
    #[arg(short, long, default_value = "desktop")]
    pub device: String,

    /// Output file (defaults to <outDir>/<site>/<page>.html)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Render even if the site is not published
    #[arg(long)]
    pub draft: bool,

    /// Compact HTML without indentation
    #[arg(long)]
    pub compact: bool,
}

pub async fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let site = load_site(&resolve_path(cwd, &args.site))?;
    let device: DeviceView = args.device.parse()?;

    let renderer = builtin_renderer();
    if let Some(page) = site.resolve_page(args.page.as_deref()) {
        for failure in renderer.preload_page(page).await {
            eprintln!("  {} {}", "⚠️".yellow(), failure);
        }
    }

    let options = ViewerOptions {
        require_published: !args.draft,
        device,
    };
    let rendered = render_site(&renderer, &site, args.page.as_deref(), &options)?;
    let html = page_html(
        &rendered,
        if args.compact {
            HtmlOptions::compact()
        } else {
            HtmlOptions::default()
        },
    );

    if args.stdout {
        print!("{}", html);
        return Ok(());
    }

    let out = match args.out {
        Some(out) => resolve_path(cwd, &out),
        None => config
            .get_out_dir(cwd)
            .join(&site.slug)
            .join(format!("{}.html", rendered.slug)),
    };
    write_output(&out, &html)?;
    println!(
        "  {} {} → {}",
        "✓".green(),
        rendered.slug,
        out.strip_prefix(cwd).unwrap_or(&out).display()
    );

    Ok(())
}
