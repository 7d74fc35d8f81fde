use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FALLBACK_LANGUAGE_COLOR: &str = "#6f42c1";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#3178c6"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C#", "#239120"),
    ("Go", "#00ADD8"),
    ("Rust", "#ce422b"),
    ("PHP", "#777bb4"),
    ("Ruby", "#cc342d"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("React", "#61dafb"),
    ("Vue", "#4FC08D"),
    ("Angular", "#DD0031"),
    ("Node.js", "#68a063"),
];

pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_LANGUAGE_COLOR)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Minimal,
    Dark,
    Colorful,
    Tech,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub primary: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme `{0}` (expected one of: minimal, dark, colorful, tech)")]
pub struct ThemeParseError(String);

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Minimal, Theme::Dark, Theme::Colorful, Theme::Tech];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Minimal => "minimal",
            Theme::Dark => "dark",
            Theme::Colorful => "colorful",
            Theme::Tech => "tech",
        }
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Minimal => ThemeColors {
                bg: "#ffffff",
                surface: "#f6f8fa",
                text: "#24292f",
                muted: "#57606a",
                primary: "#0969da",
                border: "#d0d7de",
            },
            Theme::Dark => ThemeColors {
                bg: "#0d1117",
                surface: "#161b22",
                text: "#c9d1d9",
                muted: "#8b949e",
                primary: "#58a6ff",
                border: "#30363d",
            },
            Theme::Colorful => ThemeColors {
                bg: "#fff7fb",
                surface: "#ffffff",
                text: "#2d1b4e",
                muted: "#6b5b8a",
                primary: "#e83e8c",
                border: "#f3c4dc",
            },
            Theme::Tech => ThemeColors {
                bg: "#0a0f0a",
                surface: "#111a11",
                text: "#a8ffb0",
                muted: "#5fbf6a",
                primary: "#39ff14",
                border: "#1f3d22",
            },
        }
    }

    /// CSS scoped under `body.theme-{name}`; overrides the base variables.
    pub fn stylesheet(self) -> String {
        let c = self.colors();
        let mut css = format!(
            r#"body.theme-{name} {{
    --bg: {bg};
    --surface: {surface};
    --text: {text};
    --muted: {muted};
    --primary: {primary};
    --border: {border};
}}
"#,
            name = self.name(),
            bg = c.bg,
            surface = c.surface,
            text = c.text,
            muted = c.muted,
            primary = c.primary,
            border = c.border,
        );

        match self {
            Theme::Colorful => css.push_str(
                "body.theme-colorful .hero { background: linear-gradient(135deg, #e83e8c, #6f42c1); color: #ffffff; }\n\
                 body.theme-colorful .hero a { color: #ffffff; }\n",
            ),
            Theme::Tech => css.push_str(
                "body.theme-tech { font-family: \"Fira Code\", Consolas, monospace; }\n\
                 body.theme-tech .project-card { border-style: dashed; }\n",
            ),
            Theme::Minimal | Theme::Dark => {}
        }

        css
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ThemeParseError(s.to_string()))
    }
}

/// Layout shared by every theme. Colors come from the theme variables.
pub const BASE_CSS: &str = r#":root {
    --bg: #ffffff;
    --surface: #f6f8fa;
    --text: #24292f;
    --muted: #57606a;
    --primary: #0969da;
    --border: #d0d7de;
}
body {
    background: var(--bg);
    color: var(--text);
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    line-height: 1.5;
}
a { color: var(--primary); text-decoration: none; }
.portfolio-container section { padding: 2rem 0; border-bottom: 1px solid var(--border); }
.hero { display: flex; align-items: center; gap: 1.5rem; }
.avatar { width: 120px; height: 120px; border-radius: 50%; }
.profile-bio, .muted { color: var(--muted); }
.info-grid { display: grid; grid-template-columns: max-content 1fr; gap: 0.25rem 1rem; }
.stats-grid { display: flex; gap: 2rem; }
.stat-value { font-size: 1.75rem; font-weight: 600; }
.skills-list { display: flex; flex-wrap: wrap; gap: 0.5rem; }
.skill-tag { background: var(--surface); border: 1px solid var(--border); border-radius: 1rem; padding: 0.2rem 0.75rem; }
.projects-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1rem; }
.project-card { background: var(--surface); border: 1px solid var(--border); border-radius: 8px; padding: 1rem; }
.project-header { display: flex; justify-content: space-between; }
.project-name { font-weight: 600; }
.project-meta { display: flex; gap: 1rem; color: var(--muted); font-size: 0.9rem; }
.language-dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 0.3rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" Tech ".parse::<Theme>(), Ok(Theme::Tech));
        assert_eq!("COLORFUL".parse::<Theme>(), Ok(Theme::Colorful));
    }

    #[test]
    fn unknown_theme_lists_choices() {
        let err = "neon".parse::<Theme>().unwrap_err();
        assert!(err.to_string().contains("minimal, dark, colorful, tech"));
    }

    #[test]
    fn names_round_trip_through_display() {
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
        }
    }

    #[test]
    fn stylesheet_is_scoped_to_theme_class() {
        let css = Theme::Dark.stylesheet();
        assert!(css.starts_with("body.theme-dark {"));
        assert!(css.contains("--bg: #0d1117;"));
        assert!(!css.contains("theme-tech"));
    }

    #[test]
    fn language_colors_fall_back() {
        assert_eq!(language_color("Rust"), "#ce422b");
        assert_eq!(language_color("Zig"), FALLBACK_LANGUAGE_COLOR);
    }
}
