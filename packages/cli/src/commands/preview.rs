use super::{builtin_renderer, load_site, resolve_path, write_output};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use sitekit_renderer::{render_preview, to_html, HtmlOptions, PreviewPolicy};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Site JSON file
    pub site: PathBuf,

    /// Preview variant (mini, thumbnail, template)
    #[arg(short, long, default_value = "thumbnail")]
    pub variant: String,

    /// Page slug (defaults to the home page)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Render as if scrolled out of view
    #[arg(long)]
    pub offscreen: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub async fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let site = load_site(&resolve_path(cwd, &args.site))?;
    let policy: PreviewPolicy = args.variant.parse().map_err(|e: String| anyhow!(e))?;
    let page = site
        .resolve_page(args.page.as_deref())
        .ok_or_else(|| anyhow!("Page not found in {}", site.slug))?;

    let renderer = builtin_renderer();
    for failure in renderer.preload_page(page).await {
        eprintln!("  {} {}", "⚠️".yellow(), failure);
    }

    let node = render_preview(&renderer, page, &site.theme, &policy, !args.offscreen);
    let html = to_html(&[node], HtmlOptions::default());

    match args.out {
        Some(out) => {
            let out = resolve_path(cwd, &out);
            write_output(&out, &html)?;
            println!("  {} {} preview → {}", "✓".green(), args.variant, out.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}
