mod aggregate;
mod cli;
mod config;
mod github;
mod logging;
mod model;
mod render;
mod theme;

use aggregate::ProfileAggregator;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use github::GithubClient;
use render::Sections;
use std::fs;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let settings = config::AppConfig::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    let _logger = logging::init_logging(level).context("failed to initialize logging")?;

    let (handle, shared_theme) = cli.target()?;
    let theme = match cli.theme.or(shared_theme) {
        Some(theme) => theme,
        None => settings.theme()?,
    };

    let client = GithubClient::new(settings.client_config()?)?;
    let result = ProfileAggregator::new(client).aggregate(&handle).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let sections = Sections::hiding(cli.hide.iter().copied());
    let document = render::export_document(&result, theme, &sections, Utc::now());
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(render::export_file_name(&result.profile)));
    fs::write(&path, document).with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Generated {} ({} repositories, {} theme).",
        path.display(),
        result.repositories.len(),
        theme
    );

    if let Some(base) = &cli.share_base {
        println!(
            "Share link: {}",
            render::share_url(base, &result.profile.login, theme)
        );
    }

    Ok(())
}
