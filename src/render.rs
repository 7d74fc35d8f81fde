//! Portfolio page, standalone export and share links.

use crate::model::{AggregateResult, Handle, Profile, Repository};
use crate::theme::{BASE_CSS, Theme, language_color};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

const MAX_PROJECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Hero,
    About,
    Stats,
    Skills,
    Projects,
    Contact,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown section `{0}` (expected one of: hero, about, stats, skills, projects, contact)")]
pub struct SectionParseError(String);

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Hero,
        Section::About,
        Section::Stats,
        Section::Skills,
        Section::Projects,
        Section::Contact,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Stats => "stats",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Contact => "contact",
        }
    }
}

impl FromStr for Section {
    type Err = SectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Section::ALL
            .into_iter()
            .find(|section| section.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SectionParseError(s.to_string()))
    }
}

/// Which sections end up in the page. Everything is shown by default.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    hidden: BTreeSet<Section>,
}

impl Sections {
    pub fn hiding(hidden: impl IntoIterator<Item = Section>) -> Self {
        Self {
            hidden: hidden.into_iter().collect(),
        }
    }

    pub fn shows(&self, section: Section) -> bool {
        !self.hidden.contains(&section)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn or_dash(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_else(|| "-".to_string())
}

fn hero(profile: &Profile) -> String {
    format!(
        r#"<section id="hero" class="hero">
  <img class="avatar" src="{avatar}" alt="{name}">
  <div>
    <h1 class="profile-name">{name}</h1>
    <p class="profile-bio">{bio}</p>
    <a class="github-link" href="{url}" target="_blank">@{login}</a>
  </div>
</section>
"#,
        avatar = escape_html(&profile.avatar_url),
        name = escape_html(profile.display_name()),
        bio = escape_html(profile.bio.as_deref().unwrap_or("Full-stack developer")),
        url = escape_html(&profile.html_url),
        login = escape_html(&profile.login),
    )
}

fn about(profile: &Profile) -> String {
    let website = match profile.blog.as_deref() {
        Some(blog) => format!(
            r#"<a href="{href}" target="_blank">{text}</a>"#,
            href = escape_html(blog),
            text = escape_html(blog)
        ),
        None => "-".to_string(),
    };

    format!(
        r#"<section id="about">
  <h2>About</h2>
  <p>{bio}</p>
  <div class="info-grid">
    <span class="muted">Location</span><span>{location}</span>
    <span class="muted">Company</span><span>{company}</span>
    <span class="muted">Website</span><span>{website}</span>
  </div>
</section>
"#,
        bio = escape_html(profile.bio.as_deref().unwrap_or("No bio provided")),
        location = or_dash(profile.location.as_deref()),
        company = or_dash(profile.company.as_deref()),
    )
}

fn stats(profile: &Profile) -> String {
    format!(
        r#"<section id="stats">
  <h2>Stats</h2>
  <div class="stats-grid">
    <div><div class="stat-value">{repos}</div><div class="muted">Repositories</div></div>
    <div><div class="stat-value">{followers}</div><div class="muted">Followers</div></div>
    <div><div class="stat-value">{following}</div><div class="muted">Following</div></div>
  </div>
</section>
"#,
        repos = profile.public_repos,
        followers = profile.followers,
        following = profile.following,
    )
}

/// Distinct languages across all repositories, alphabetical.
pub fn skills(repositories: &[Repository]) -> Vec<&str> {
    repositories
        .iter()
        .filter_map(|repo| repo.language.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn skills_section(repositories: &[Repository]) -> String {
    let tags: String = skills(repositories)
        .into_iter()
        .map(|skill| format!("    <span class=\"skill-tag\">{}</span>\n", escape_html(skill)))
        .collect();

    format!(
        r#"<section id="skills">
  <h2>Skills</h2>
  <div class="skills-list">
{tags}  </div>
</section>
"#
    )
}

fn project_card(repo: &Repository) -> String {
    let language = match repo.language.as_deref() {
        Some(language) => format!(
            r#"
    <div class="project-language"><span class="language-dot" style="background-color: {color}"></span>{name}</div>"#,
            color = language_color(language),
            name = escape_html(language)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="project-card">
  <div class="project-header">
    <a href="{url}" target="_blank" class="project-name">{name}</a>
    <span class="project-stars">&#11088; {stars}</span>
  </div>
  <p class="project-description">{description}</p>
  <div class="project-meta">{language}
    <span class="project-contributions">Contributions: {contributions}</span>
  </div>
</div>
"#,
        url = escape_html(&repo.html_url),
        name = escape_html(&repo.name),
        stars = repo.stars,
        description = escape_html(
            repo.description
                .as_deref()
                .unwrap_or("No description provided")
        ),
        contributions = repo.contributions,
    )
}

fn projects(repositories: &[Repository]) -> String {
    let cards: String = repositories
        .iter()
        .take(MAX_PROJECTS)
        .map(project_card)
        .collect();

    format!(
        r#"<section id="projects">
  <h2>Projects</h2>
  <div class="projects-grid">
{cards}</div>
</section>
"#
    )
}

fn contact(profile: &Profile) -> String {
    format!(
        r#"<section id="contact">
  <h2>Contact</h2>
  <a id="contactLink" href="{url}" target="_blank">Find me on GitHub</a>
</section>
"#,
        url = escape_html(&profile.html_url)
    )
}

/// Renders the portfolio container for `result`, skipping hidden sections.
pub fn render_portfolio(result: &AggregateResult, sections: &Sections) -> String {
    let profile = &result.profile;
    let repos = &result.repositories;

    let mut out = String::from("<div class=\"portfolio-container\">\n");
    for section in Section::ALL {
        if !sections.shows(section) {
            continue;
        }
        out.push_str(&match section {
            Section::Hero => hero(profile),
            Section::About => about(profile),
            Section::Stats => stats(profile),
            Section::Skills => skills_section(repos),
            Section::Projects => projects(repos),
            Section::Contact => contact(profile),
        });
    }
    out.push_str("</div>\n");
    out
}

/// A self-contained HTML document: no external stylesheets or scripts.
pub fn export_document(
    result: &AggregateResult,
    theme: Theme,
    sections: &Sections,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} - Portfolio</title>
<style>
{base}
/* Theme styles */
{theme_css}
* {{ box-sizing: border-box; }}
body {{ margin: 0; padding: 0; display: flex; justify-content: center; }}
.standalone-wrapper {{ width: 100%; max-width: 1200px; padding: 2rem; }}
.generated {{ color: var(--muted); font-size: 0.8rem; padding-top: 1rem; }}
</style>
</head>
<body class="theme-{theme_name}">
<div class="standalone-wrapper">
{portfolio}<footer class="generated">Generated {stamp}</footer>
</div>
</body>
</html>
"#,
        title = escape_html(result.profile.display_name()),
        base = BASE_CSS,
        theme_css = theme.stylesheet(),
        theme_name = theme.name(),
        portfolio = render_portfolio(result, sections),
        stamp = generated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

pub fn export_file_name(profile: &Profile) -> String {
    format!("{}-portfolio.html", profile.login)
}

/// `base` with `username` and `theme` query parameters replacing any existing ones.
pub fn share_url(base: &Url, login: &str, theme: Theme) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "username" && key != "theme")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("username", login)
        .append_pair("theme", theme.name());
    url
}

/// Reads back what [`share_url`] wrote. An unknown theme is dropped.
pub fn from_share_url(url: &Url) -> Option<(Handle, Option<Theme>)> {
    let mut handle = None;
    let mut theme = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "username" => handle = Handle::parse(&value).ok(),
            "theme" => theme = value.parse().ok(),
            _ => {}
        }
    }
    handle.map(|handle| (handle, theme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile() -> Profile {
        Profile {
            login: "octocat".into(),
            name: Some("The <Octo> Cat".into()),
            bio: None,
            location: Some("San Francisco".into()),
            company: None,
            blog: Some("https://github.blog".into()),
            public_repos: 8,
            followers: 3938,
            following: 9,
            avatar_url: "https://avatars.example/u/583231".into(),
            html_url: "https://github.com/octocat".into(),
        }
    }

    fn repo(name: &str, language: Option<&str>, contributions: u32) -> Repository {
        Repository {
            name: name.into(),
            owner: "octocat".into(),
            html_url: format!("https://github.com/octocat/{name}"),
            language: language.map(str::to_string),
            stars: 3,
            description: None,
            contributions,
        }
    }

    fn result(repositories: Vec<Repository>) -> AggregateResult {
        AggregateResult {
            profile: profile(),
            repositories,
        }
    }

    #[test]
    fn page_escapes_and_applies_fallbacks() {
        let page = render_portfolio(&result(vec![]), &Sections::default());

        assert!(page.contains("The &lt;Octo&gt; Cat"));
        assert!(!page.contains("<Octo>"));
        assert!(page.contains("Full-stack developer"));
        assert!(page.contains("No bio provided"));
        assert!(page.contains("<span>San Francisco</span>"));
        assert!(page.contains("<span class=\"muted\">Company</span><span>-</span>"));
        assert!(page.contains(r#"<a href="https://github.blog" target="_blank">"#));
        assert!(page.contains("@octocat"));
    }

    #[test]
    fn hidden_sections_are_omitted() {
        let sections = Sections::hiding([Section::About, Section::Skills]);
        let page = render_portfolio(&result(vec![repo("a", Some("Rust"), 1)]), &sections);

        assert!(!page.contains("id=\"about\""));
        assert!(!page.contains("id=\"skills\""));
        assert!(page.contains("id=\"hero\""));
        assert!(page.contains("id=\"projects\""));
    }

    #[test]
    fn projects_are_capped_at_ten_in_aggregate_order() {
        let repos: Vec<Repository> = (0..12)
            .map(|i| repo(&format!("repo-{i:02}"), None, 12 - i))
            .collect();
        let page = render_portfolio(&result(repos), &Sections::default());

        assert_eq!(page.matches("class=\"project-card\"").count(), 10);
        assert!(page.contains("repo-09"));
        assert!(!page.contains("repo-10"));
        let first = page.find("repo-00").unwrap();
        let second = page.find("repo-01").unwrap();
        assert!(first < second);
    }

    #[test]
    fn language_line_only_when_language_known() {
        let without = project_card(&repo("plain", None, 0));
        assert!(!without.contains("language-dot"));
        assert!(without.contains("No description provided"));
        assert!(without.contains("Contributions: 0"));

        let with = project_card(&repo("typed", Some("Rust"), 4));
        assert!(with.contains("background-color: #ce422b"));
        assert!(with.contains("Contributions: 4"));
    }

    #[test]
    fn skills_are_distinct_and_sorted() {
        let repos = vec![
            repo("a", Some("Rust"), 0),
            repo("b", None, 0),
            repo("c", Some("Go"), 0),
            repo("d", Some("Rust"), 0),
        ];
        assert_eq!(skills(&repos), vec!["Go", "Rust"]);
    }

    #[test]
    fn export_is_standalone_and_themed() {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let doc = export_document(
            &result(vec![repo("a", Some("Rust"), 2)]),
            Theme::Tech,
            &Sections::default(),
            stamp,
        );

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>The &lt;Octo&gt; Cat - Portfolio</title>"));
        assert!(doc.contains("<body class=\"theme-tech\">"));
        assert!(doc.contains("body.theme-tech {"));
        assert!(doc.contains(".project-card {"));
        assert!(doc.contains("Generated 2024-05-01 12:30 UTC"));
        assert!(!doc.contains("<link"));
        assert!(!doc.contains("<script"));
    }

    #[test]
    fn export_file_is_named_after_login() {
        assert_eq!(export_file_name(&profile()), "octocat-portfolio.html");
    }

    #[test]
    fn share_url_sets_username_and_theme() {
        let base = Url::parse("https://example.com/folio/?theme=minimal&ref=nav").unwrap();
        let url = share_url(&base, "octocat", Theme::Dark);

        assert_eq!(url.path(), "/folio/");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("ref".to_string(), "nav".to_string()),
                ("username".to_string(), "octocat".to_string()),
                ("theme".to_string(), "dark".to_string()),
            ]
        );
    }

    #[test]
    fn share_url_can_be_read_back() {
        let base = Url::parse("https://example.com/folio").unwrap();
        let url = share_url(&base, "octocat", Theme::Colorful);

        let (handle, theme) = from_share_url(&url).unwrap();
        assert_eq!(handle.as_str(), "octocat");
        assert_eq!(theme, Some(Theme::Colorful));
    }

    #[test]
    fn share_url_without_username_is_rejected() {
        let bare = Url::parse("https://example.com/folio?theme=dark").unwrap();
        assert!(from_share_url(&bare).is_none());

        let odd_theme = Url::parse("https://example.com/?username=octocat&theme=neon").unwrap();
        let (handle, theme) = from_share_url(&odd_theme).unwrap();
        assert_eq!(handle.as_str(), "octocat");
        assert_eq!(theme, None);
    }
}
