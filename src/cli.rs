use crate::model::Handle;
use crate::render::{Section, from_share_url};
use crate::theme::Theme;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command line interface for ghfolio.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ghfolio",
    author,
    version,
    about = "Build a themed, self-contained portfolio page from a GitHub profile"
)]
pub struct Cli {
    /// GitHub username, or a share link printed by `--share-base`.
    pub handle: String,

    /// Portfolio theme: minimal, dark, colorful or tech.
    #[arg(short, long)]
    pub theme: Option<Theme>,

    /// Where to write the exported page (defaults to `<login>-portfolio.html`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave a section out of the page. Repeatable.
    #[arg(long = "hide", value_name = "SECTION")]
    pub hide: Vec<Section>,

    /// Print the aggregated profile as JSON instead of exporting a page.
    #[arg(long)]
    pub json: bool,

    /// Also print a share link built on this URL.
    #[arg(long, value_name = "URL")]
    pub share_base: Option<Url>,

    /// Optional path to a configuration file (TOML, YAML, JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, e.g. `debug` or `ghfolio=trace`.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// The handle to aggregate, plus the theme carried by a share link.
    pub fn target(&self) -> Result<(Handle, Option<Theme>)> {
        match Url::parse(self.handle.trim()) {
            Ok(url) => from_share_url(&url)
                .with_context(|| format!("share link `{url}` carries no username")),
            Err(_) => Ok((Handle::parse(&self.handle)?, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_invocation() {
        let cli = Cli::try_parse_from([
            "ghfolio",
            "octocat",
            "--theme",
            "dark",
            "--hide",
            "about",
            "--hide",
            "skills",
            "-o",
            "out.html",
            "--share-base",
            "https://example.com/folio",
        ])
        .unwrap();

        assert_eq!(cli.handle, "octocat");
        assert_eq!(cli.theme, Some(Theme::Dark));
        assert_eq!(cli.hide, vec![Section::About, Section::Skills]);
        assert_eq!(cli.output, Some(PathBuf::from("out.html")));
        assert!(!cli.json);
        assert_eq!(
            cli.share_base.map(|u| u.to_string()),
            Some("https://example.com/folio".to_string())
        );
    }

    #[test]
    fn rejects_unknown_theme_and_section() {
        assert!(Cli::try_parse_from(["ghfolio", "octocat", "--theme", "neon"]).is_err());
        assert!(Cli::try_parse_from(["ghfolio", "octocat", "--hide", "footer"]).is_err());
    }

    #[test]
    fn handle_is_required() {
        assert!(Cli::try_parse_from(["ghfolio"]).is_err());
    }

    #[test]
    fn plain_handle_is_the_target() {
        let cli = Cli::try_parse_from(["ghfolio", " octocat "]).unwrap();
        let (handle, theme) = cli.target().unwrap();
        assert_eq!(handle.as_str(), "octocat");
        assert_eq!(theme, None);
    }

    #[test]
    fn share_link_supplies_handle_and_theme() {
        let cli = Cli::try_parse_from([
            "ghfolio",
            "https://example.com/folio?username=octocat&theme=tech",
        ])
        .unwrap();
        let (handle, theme) = cli.target().unwrap();
        assert_eq!(handle.as_str(), "octocat");
        assert_eq!(theme, Some(Theme::Tech));
    }

    #[test]
    fn share_link_without_username_fails() {
        let cli = Cli::try_parse_from(["ghfolio", "https://example.com/folio?theme=tech"]).unwrap();
        assert!(cli.target().is_err());
    }
}
