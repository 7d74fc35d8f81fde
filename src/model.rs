//! Domain types handed from the aggregator to the renderer.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A trimmed, non-empty user identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("please enter a GitHub username")]
    Empty,
}

impl Handle {
    pub fn parse(raw: &str) -> Result<Self, HandleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HandleError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Logins are case-insensitive upstream.
    pub fn matches(&self, login: &str) -> bool {
        self.0.eq_ignore_ascii_case(login)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    pub avatar_url: String,
    pub html_url: String,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub name: String,
    pub owner: String,
    pub html_url: String,
    pub language: Option<String>,
    pub stars: u32,
    pub description: Option<String>,
    /// Approximate number of commits by the profile owner. 0 when unknown.
    pub contributions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub profile: Profile,
    /// Sorted by descending `contributions`, ties in upstream order.
    pub repositories: Vec<Repository>,
}
