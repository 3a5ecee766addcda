use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::dto::MovieSummary;
use crate::config::TmdbConfig;

#[async_trait]
pub trait MovieSearch: Send + Sync {
    /// Movies matching `query`, only those with a poster.
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSummary>>;
}

#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    release_date: Option<String>,
}

fn summaries(page: TmdbPage) -> Vec<MovieSummary> {
    page.results
        .into_iter()
        .filter_map(|m| {
            let poster_path = m.poster_path?;
            Some(MovieSummary {
                id: m.id,
                title: m.title,
                poster_path,
                release_date: m.release_date,
            })
        })
        .collect()
}

/// Client for TMDB's `search/movie` endpoint.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(cfg: &TmdbConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        }
    }
}

#[async_trait]
impl MovieSearch for TmdbClient {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSummary>> {
        let url = format!("{}/search/movie", self.base_url);
        let page = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await
            .context("tmdb request")?
            .error_for_status()
            .context("tmdb status")?
            .json::<TmdbPage>()
            .await
            .context("tmdb body")?;

        let movies = summaries(page);
        debug!(query, count = movies.len(), "tmdb search");
        Ok(movies)
    }
}
