use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use super::{
    error::{SdkError, SdkResult},
    format::{self, Listing, OutputFormat},
};
use crate::models::{Analytics, ErrorBody, Link, MovieDetail, MovieSummary, Rating, Status, Tag};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: Duration::from_secs(30) }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("MOVIELENS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs: u64 = std::env::var("MOVIELENS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self { base_url, timeout: Duration::from_secs(timeout_secs) }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> SdkResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SdkError::Config(format!(
                "base url must start with http:// or https://, got '{url}'"
            )));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MovieQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
}

impl MovieQuery {
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct RatingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(rename = "movies_id", skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
}

impl RatingQuery {
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn movie_id(mut self, movie_id: i32) -> Self {
        self.movie_id = Some(movie_id);
        self
    }

    pub fn user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn max_rating(mut self, max_rating: f64) -> Self {
        self.max_rating = Some(max_rating);
        self
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct TagQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
}

impl TagQuery {
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn movie_id(mut self, movie_id: i32) -> Self {
        self.movie_id = Some(movie_id);
        self
    }

    pub fn user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct LinkQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl LinkQuery {
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// HTTP client for the MovieLens API. One request per call, no retries.
#[derive(Clone)]
pub struct MovieClient {
    http: wreq::Client,
    base_url: String,
}

impl std::fmt::Debug for MovieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl MovieClient {
    pub fn new(config: ClientConfig) -> SdkResult<Self> {
        config.validate()?;
        let http = wreq::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, base_url: config.base_url.trim().trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health_check(&self) -> SdkResult<Status> {
        self.get("/").await
    }

    pub async fn get_movie(&self, movie_id: i32) -> SdkResult<MovieDetail> {
        self.get(&format!("/movies/{movie_id}")).await
    }

    pub async fn list_movies(
        &self,
        query: &MovieQuery,
        format: OutputFormat,
    ) -> SdkResult<Listing<MovieSummary>> {
        self.list("/movies", query, format).await
    }

    pub async fn get_rating(&self, user_id: i32, movie_id: i32) -> SdkResult<Rating> {
        self.get(&format!("/ratings/{user_id}/{movie_id}")).await
    }

    pub async fn list_ratings(
        &self,
        query: &RatingQuery,
        format: OutputFormat,
    ) -> SdkResult<Listing<Rating>> {
        self.list("/ratings", query, format).await
    }

    pub async fn get_tag(&self, user_id: i32, movie_id: i32, tag_text: &str) -> SdkResult<Tag> {
        let tag_text = urlencoding::encode(tag_text);
        self.get(&format!("/tags/{user_id}/{movie_id}/{tag_text}")).await
    }

    pub async fn list_tags(&self, query: &TagQuery, format: OutputFormat) -> SdkResult<Listing<Tag>> {
        self.list("/tags", query, format).await
    }

    pub async fn get_link(&self, movie_id: i32) -> SdkResult<Link> {
        self.get(&format!("/links/{movie_id}")).await
    }

    pub async fn list_links(
        &self,
        query: &LinkQuery,
        format: OutputFormat,
    ) -> SdkResult<Listing<Link>> {
        self.list("/links", query, format).await
    }

    pub async fn get_analytics(&self) -> SdkResult<Analytics> {
        self.get("/analytics").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        debug!(method = "GET", path = %path, "sending request");
        let payload = self.send(self.http.get(self.url(path))).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn list<T, Q>(&self, path: &str, query: &Q, format: OutputFormat) -> SdkResult<Listing<T>>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        debug!(method = "GET", path = %path, format = %format, "sending request");
        let payload = self.send(self.http.get(self.url(path)).query(query)).await?;
        format::render(format::canonical(payload)?, format)
    }

    async fn send(&self, req: wreq::RequestBuilder) -> SdkResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => err.detail,
                Err(_) => body,
            };
            return Err(SdkError::Http { status: status.as_u16(), message });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_base_url() {
        let err = MovieClient::new(ClientConfig::new("ftp://example.org")).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = MovieClient::new(ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn unset_query_fields_are_not_sent() {
        let query = RatingQuery::default().limit(5).min_rating(4.5).movie_id(1);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "limit": 5, "movies_id": 1, "min_rating": 4.5 }));
    }
}
