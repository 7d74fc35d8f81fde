use crate::model::{Profile, Repository};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, LINK};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Only the first page of repositories is ever requested.
pub const REPOSITORY_PAGE_SIZE: u32 = 100;

const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub user_agent: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn try_from_url(url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(url)?;
        Ok(Self::new(base_url))
    }

    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            user_agent: format!("ghfolio/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API base URL cannot carry a path: {0}")]
    BaseUrl(String),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("failed to deserialize response: {source}")]
    Deserialize {
        source: serde_json::Error,
        body: String,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// REST client for the three upstream endpoints the aggregator needs.
#[derive(Clone)]
pub struct GithubClient {
    http: Arc<Client>,
    base_url: Arc<Url>,
}

impl GithubClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(config.base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_V3_JSON));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: Arc::new(builder.build()?),
            base_url: Arc::new(config.base_url),
        })
    }

    /// Appends percent-encoded path segments to the base URL, keeping any prefix.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = (*self.base_url).clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::BaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::HttpStatus { status, body });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Deserialize { source, body })
    }

    /// `GET /users/{handle}`
    pub async fn fetch_profile(&self, handle: &str) -> Result<Profile, ApiError> {
        let url = self.endpoint(&["users", handle])?;
        let payload: UserPayload = self.get_json(url).await?;
        Ok(payload.into())
    }

    /// `GET /users/{handle}/repos?sort=stars&per_page=100`, first page only.
    pub async fn list_repositories(&self, handle: &str) -> Result<Vec<Repository>, ApiError> {
        let mut url = self.endpoint(&["users", handle, "repos"])?;
        url.query_pairs_mut()
            .append_pair("sort", "stars")
            .append_pair("per_page", &REPOSITORY_PAGE_SIZE.to_string());

        let payload: Vec<RepoPayload> = self.get_json(url).await?;
        Ok(payload.into_iter().map(Repository::from).collect())
    }

    /// Asks for one commit by `author` and reads the total back from the
    /// `Link` header: with one result per page, the last page number is the
    /// commit count. A success without a last link means exactly one page.
    pub async fn commit_count_estimate(
        &self,
        owner: &str,
        repo: &str,
        author: &str,
    ) -> Result<u32, ApiError> {
        let mut url = self.endpoint(&["repos", owner, repo, "commits"])?;
        url.query_pairs_mut()
            .append_pair("author", author)
            .append_pair("per_page", "1");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".into());
            return Err(ApiError::HttpStatus { status, body });
        }

        let estimate = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(last_page)
            .unwrap_or(1);

        Ok(estimate)
    }
}

/// Extracts the `page` query value of the `rel="last"` entry of a Link header.
pub fn last_page(link: &str) -> Option<u32> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();

        let is_last = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rels| rels.trim_matches('"').split_whitespace().any(|r| r == "last"))
                .unwrap_or(false)
        });
        if !is_last {
            return None;
        }

        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

/// Upstream sends `""` as often as `null` for unset text fields.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
struct UserPayload {
    login: String,
    #[serde(default, deserialize_with = "non_empty")]
    name: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    bio: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    location: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    company: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    blog: Option<String>,
    #[serde(default)]
    public_repos: u32,
    #[serde(default)]
    followers: u32,
    #[serde(default)]
    following: u32,
    avatar_url: String,
    html_url: String,
}

impl From<UserPayload> for Profile {
    fn from(user: UserPayload) -> Self {
        Self {
            login: user.login,
            name: user.name,
            bio: user.bio,
            location: user.location,
            company: user.company,
            blog: user.blog,
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            avatar_url: user.avatar_url,
            html_url: user.html_url,
        }
    }
}

#[derive(Deserialize)]
struct OwnerPayload {
    login: String,
}

#[derive(Deserialize)]
struct RepoPayload {
    name: String,
    owner: OwnerPayload,
    html_url: String,
    #[serde(default, deserialize_with = "non_empty")]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default, deserialize_with = "non_empty")]
    description: Option<String>,
}

impl From<RepoPayload> for Repository {
    fn from(repo: RepoPayload) -> Self {
        Self {
            name: repo.name,
            owner: repo.owner.login,
            html_url: repo.html_url,
            language: repo.language,
            stars: repo.stargazers_count,
            description: repo.description,
            contributions: 0,
        }
    }
}
