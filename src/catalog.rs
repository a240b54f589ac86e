use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{MovieDetails, MovieResponse, User};
use crate::pagination::clamp_page;

const DETAIL_APPENDS: &str = "videos,credits,similar";

/// The fixed movie lists TMDB exposes under `/movie/{selector}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Popular,
        Category::TopRated,
        Category::NowPlaying,
        Category::Upcoming,
    ];

    pub fn selector(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::NowPlaying => "now_playing",
            Category::Upcoming => "upcoming",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Popular => "Popular Movies",
            Category::TopRated => "Top Rated Movies",
            Category::NowPlaying => "Now Playing",
            Category::Upcoming => "Upcoming Movies",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.selector() == s)
            .ok_or(CatalogError::InvalidEndpoint)
    }
}

/// A GET against the TMDB API, relative to the configured base; `api_key` is added on send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl UpstreamRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn category(category: Category, page: u32) -> Self {
        Self::new(format!("/movie/{}", category.selector())).param("page", clamp_page(page))
    }

    pub fn movie(id: u64) -> Self {
        Self::new(format!("/movie/{id}")).param("append_to_response", DETAIL_APPENDS)
    }

    pub fn search(query: &str, page: u32) -> CatalogResult<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::MissingParameter(
                "Query parameter is required for search",
            ));
        }
        Ok(Self::new("/search/movie")
            .param("query", query)
            .param("page", clamp_page(page)))
    }

    pub fn genre(genre_id: &str, page: u32) -> CatalogResult<Self> {
        let genre_id = genre_id.trim();
        if genre_id.is_empty() {
            return Err(CatalogError::MissingParameter("Genre ID is required"));
        }
        Ok(Self::new("/discover/movie")
            .param("with_genres", genre_id)
            .param("page", clamp_page(page)))
    }

    pub fn account(session_id: &str) -> CatalogResult<Self> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(CatalogError::MissingParameter("Session ID is required"));
        }
        Ok(Self::new("/account").param("session_id", session_id))
    }
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Performs the request and returns the upstream body byte for byte.
    async fn fetch_body(&self, request: &UpstreamRequest) -> CatalogResult<Bytes>;

    async fn category(&self, category: Category, page: u32) -> CatalogResult<MovieResponse> {
        decode(&self.fetch_body(&UpstreamRequest::category(category, page)).await?)
    }

    async fn popular(&self, page: u32) -> CatalogResult<MovieResponse> {
        self.category(Category::Popular, page).await
    }

    async fn top_rated(&self, page: u32) -> CatalogResult<MovieResponse> {
        self.category(Category::TopRated, page).await
    }

    async fn now_playing(&self, page: u32) -> CatalogResult<MovieResponse> {
        self.category(Category::NowPlaying, page).await
    }

    async fn upcoming(&self, page: u32) -> CatalogResult<MovieResponse> {
        self.category(Category::Upcoming, page).await
    }

    async fn movie_details(&self, id: u64) -> CatalogResult<MovieDetails> {
        decode(&self.fetch_body(&UpstreamRequest::movie(id)).await?)
    }

    async fn search(&self, query: &str, page: u32) -> CatalogResult<MovieResponse> {
        let request = UpstreamRequest::search(query, page)?;
        decode(&self.fetch_body(&request).await?)
    }

    async fn discover_by_genre(&self, genre_id: &str, page: u32) -> CatalogResult<MovieResponse> {
        let request = UpstreamRequest::genre(genre_id, page)?;
        decode(&self.fetch_body(&request).await?)
    }

    async fn account(&self, session_id: &str) -> CatalogResult<User> {
        let request = UpstreamRequest::account(session_id)?;
        decode(&self.fetch_body(&request).await?)
    }
}

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> CatalogResult<T> {
    serde_json::from_slice(body).map_err(|e| CatalogError::Decode(e.to_string()))
}

/// Parses a movie id the way TMDB ids look: ASCII digits only.
pub fn parse_movie_id(input: &str) -> Option<u64> {
    let input = input.trim();
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return input.parse().ok();
    }
    None
}

#[derive(Debug, Clone)]
pub struct TmdbCatalog {
    client: Client,
    api_key: String,
    api_base: String,
}

impl TmdbCatalog {
    pub fn new(config: &Config) -> CatalogResult<Self> {
        let user_agent = format!("movieflix/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(config.http_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(CatalogError::Transport)?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
        })
    }
}

#[async_trait]
impl CatalogApi for TmdbCatalog {
    async fn fetch_body(&self, request: &UpstreamRequest) -> CatalogResult<Bytes> {
        let url = format!("{}{}", self.api_base, request.path);
        debug!(path = %request.path, params = ?request.params, "TMDB request");

        let res = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&request.params)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            warn!("TMDB {} answered {}", request.path, status);
            return Err(CatalogError::upstream(status));
        }

        res.bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_selectors_round_trip() {
        for c in Category::ALL {
            assert_eq!(c.selector().parse::<Category>().unwrap(), c);
        }
        assert!(matches!(
            "trending".parse::<Category>(),
            Err(CatalogError::InvalidEndpoint)
        ));
    }

    #[test]
    fn category_request_clamps_page() {
        let req = UpstreamRequest::category(Category::TopRated, 9999);
        assert_eq!(req.path, "/movie/top_rated");
        assert_eq!(req.get("page"), Some("500"));
    }

    #[test]
    fn movie_request_appends_sections() {
        let req = UpstreamRequest::movie(550);
        assert_eq!(req.path, "/movie/550");
        assert_eq!(req.get("append_to_response"), Some("videos,credits,similar"));
    }

    #[test]
    fn search_requires_term() {
        assert!(matches!(
            UpstreamRequest::search("   ", 1),
            Err(CatalogError::MissingParameter(_))
        ));
        let req = UpstreamRequest::search(" dune ", 2).unwrap();
        assert_eq!(req.get("query"), Some("dune"));
        assert_eq!(req.get("page"), Some("2"));
    }

    #[test]
    fn genre_and_account_require_values() {
        assert!(UpstreamRequest::genre("", 1).is_err());
        assert_eq!(
            UpstreamRequest::genre("28", 1).unwrap().get("with_genres"),
            Some("28")
        );
        assert!(UpstreamRequest::account(" ").is_err());
    }

    #[test]
    fn movie_ids_are_digits_only() {
        assert_eq!(parse_movie_id("550"), Some(550));
        assert_eq!(parse_movie_id(" 42 "), Some(42));
        assert_eq!(parse_movie_id("tt0137523"), None);
        assert_eq!(parse_movie_id("-1"), None);
        assert_eq!(parse_movie_id(""), None);
    }
}
