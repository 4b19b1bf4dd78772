//! Robots.txt compliance
//!
//! Each crawl job keeps one [`RobotsCache`]: robots.txt is fetched at most
//! once per host and the decision is replayed from the cached body. A host
//! whose robots.txt cannot be fetched (missing, non-2xx, network error)
//! defaults to allow-all.

use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use url::Url;

/// Per-host robots.txt cache with allow/deny decisions
pub struct RobotsCache {
    user_agent: String,
    /// host -> robots.txt body; None when unavailable (allow all)
    bodies: HashMap<String, Option<String>>,
}

impl RobotsCache {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            bodies: HashMap::new(),
        }
    }

    /// Checks whether `url` may be fetched, loading robots.txt on first use
    /// of its host
    pub async fn is_allowed(&mut self, client: &Client, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let key = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        if !self.bodies.contains_key(&key) {
            let body = fetch_robots(client, url).await;
            self.bodies.insert(key.clone(), body);
        }

        match &self.bodies[&key] {
            Some(body) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, &self.user_agent, url.as_str())
            }
            None => true,
        }
    }
}

/// Fetches /robots.txt for the host of `url`; None means unavailable
async fn fetch_robots(client: &Client, url: &Url) -> Option<String> {
    let mut robots_url = url.clone();
    robots_url.set_path("/robots.txt");
    robots_url.set_query(None);
    robots_url.set_fragment(None);

    match client.get(robots_url.as_str()).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => {
                tracing::debug!("Loaded robots.txt for {}", robots_url);
                Some(body)
            }
            Err(e) => {
                tracing::debug!("Failed to read robots.txt body for {}: {}", robots_url, e);
                None
            }
        },
        Ok(response) => {
            tracing::debug!(
                "robots.txt for {} returned HTTP {}, allowing all",
                robots_url,
                response.status()
            );
            None
        }
        Err(e) => {
            tracing::debug!("robots.txt fetch failed for {}: {}", robots_url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_robots_allows_all() {
        let server = wiremock::MockServer::start().await;
        // No robots.txt mock mounted: the fetch 404s
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = Client::new();
        let mut cache = RobotsCache::new("testbot/1.0");
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        assert!(cache.is_allowed(&client, &url).await);
    }

    #[tokio::test]
    async fn test_disallowed_path_denied() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/robots.txt"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("User-agent: *\nDisallow: /private/"),
            )
            .mount(&server)
            .await;

        let client = Client::new();
        let mut cache = RobotsCache::new("testbot/1.0");

        let blocked = Url::parse(&format!("{}/private/page", server.uri())).unwrap();
        assert!(!cache.is_allowed(&client, &blocked).await);

        let open = Url::parse(&format!("{}/public", server.uri())).unwrap();
        assert!(cache.is_allowed(&client, &open).await);
    }
}
