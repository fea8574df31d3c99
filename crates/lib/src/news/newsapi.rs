//! NewsAPI.org client: GET the `everything` search sorted by publish date, show the top three.

use crate::config::NewsConfig;
use serde::Deserialize;
use std::time::Duration;

pub const NEWS_NOT_CONFIGURED_REPLY: &str = "⚠️ NEWS_API not configured.";
pub const NEWS_EMPTY_REPLY: &str = "No news found for that topic.";
pub const NEWS_ERROR_REPLY: &str = "⚠️ Error fetching news.";

/// Query term and header label used when no topic is given.
const DEFAULT_TOPIC: &str = "latest";
const SHOWN_ARTICLES: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("news api error: {0} {1}")]
    Api(reqwest::StatusCode, String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Option<Vec<Article>>,
}

/// One search result; only title and URL are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// "📰 Top results for ..." followed by up to three numbered `title\nurl` entries separated by blank lines.
pub fn format_headlines(label: &str, articles: &[Article]) -> String {
    let top = articles
        .iter()
        .take(SHOWN_ARTICLES)
        .enumerate()
        .map(|(i, a)| {
            format!(
                "{}. {}\n{}",
                i + 1,
                a.title.as_deref().unwrap_or_default(),
                a.url.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("📰 Top results for \"{}\":\n\n{}", label, top)
}

/// Client for the news-search endpoint.
#[derive(Clone)]
pub struct NewsClient {
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl NewsClient {
    pub fn new(config: &NewsConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
            timeout: Duration::from_secs(config.timeout_secs),
            client: reqwest::Client::new(),
        }
    }

    /// Search `topic` ("latest" when blank). Without an API key no request is made.
    pub async fn try_headlines(&self, topic: &str) -> Result<String, NewsError> {
        let Some(ref api_key) = self.api_key else {
            return Ok(NEWS_NOT_CONFIGURED_REPLY.to_string());
        };
        let topic = match topic.trim() {
            "" => DEFAULT_TOPIC,
            t => t,
        };
        let page_size = self.page_size.to_string();
        let res = self
            .client
            .get(&self.base_url)
            .timeout(self.timeout)
            .query(&[
                ("q", topic),
                ("pageSize", page_size.as_str()),
                ("sortBy", "publishedAt"),
                ("apiKey", api_key.as_str()),
            ])
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(NewsError::Api(status, body));
        }
        let data: SearchResponse = res.json().await?;
        match data.articles {
            Some(articles) if !articles.is_empty() => Ok(format_headlines(topic, &articles)),
            _ => Ok(NEWS_EMPTY_REPLY.to_string()),
        }
    }

    /// Formatted headlines, or one of the fixed notices; never fails.
    pub async fn headlines(&self, topic: &str) -> String {
        match self.try_headlines(topic).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("news: {}", e);
                NEWS_ERROR_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer, api_key: Option<&str>) -> NewsClient {
        NewsClient::new(&NewsConfig {
            api_key: api_key.map(str::to_string),
            base_url: server.url("/v2/everything"),
            page_size: 5,
            timeout_secs: 5,
        })
    }

    fn articles(n: usize) -> serde_json::Value {
        let list: Vec<_> = (1..=n)
            .map(|i| json!({ "title": format!("Story {}", i), "url": format!("https://news.test/{}", i) }))
            .collect();
        json!({ "status": "ok", "totalResults": n, "articles": list })
    }

    #[test]
    fn formats_numbered_entries() {
        let list = vec![
            Article {
                title: Some("A".to_string()),
                url: Some("https://a".to_string()),
            },
            Article {
                title: Some("B".to_string()),
                url: Some("https://b".to_string()),
            },
        ];
        assert_eq!(
            format_headlines("rust", &list),
            "📰 Top results for \"rust\":\n\n1. A\nhttps://a\n\n2. B\nhttps://b"
        );
    }

    #[tokio::test]
    async fn missing_key_skips_network() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/v2/everything");
            then.status(200).json_body(articles(5));
        });

        let reply = client(&server, None).headlines("climate").await;

        assert_eq!(reply, NEWS_NOT_CONFIGURED_REPLY);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn shows_first_three_of_five_in_order() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("q", "climate")
                .query_param("pageSize", "5")
                .query_param("sortBy", "publishedAt")
                .query_param("apiKey", "k");
            then.status(200).json_body(articles(5));
        });

        let reply = client(&server, Some("k")).headlines("climate").await;

        assert_eq!(
            reply,
            "📰 Top results for \"climate\":\n\n\
             1. Story 1\nhttps://news.test/1\n\n\
             2. Story 2\nhttps://news.test/2\n\n\
             3. Story 3\nhttps://news.test/3"
        );
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn blank_topic_searches_latest() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).query_param("q", "latest");
            then.status(200).json_body(articles(1));
        });

        let reply = client(&server, Some("k")).headlines("   ").await;

        assert!(reply.starts_with("📰 Top results for \"latest\":"));
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn topic_is_url_encoded() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).query_param("q", "rust & go");
            then.status(200).json_body(articles(1));
        });

        client(&server, Some("k")).headlines("rust & go").await;

        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn no_articles_gives_empty_notice() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({ "status": "ok", "articles": [] }));
        });

        assert_eq!(
            client(&server, Some("k")).headlines("nothing").await,
            NEWS_EMPTY_REPLY
        );
    }

    #[tokio::test]
    async fn http_error_gives_error_notice() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET);
            then.status(401)
                .json_body(json!({ "status": "error", "code": "apiKeyInvalid" }));
        });

        assert_eq!(
            client(&server, Some("bad")).headlines("x").await,
            NEWS_ERROR_REPLY
        );
    }
}
