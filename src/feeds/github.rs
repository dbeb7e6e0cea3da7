use super::{EventPage, FeedData, FeedFetcher, GithubEvent};
use crate::config::GithubConfig;
use crate::error::{FeedError, FetchError};
use crate::fetch::JsonClient;
use async_trait::async_trait;
use serde::Deserialize;

/// Pages through `/users/{username}/events/public` for one profile.
///
/// Owns the page cursor, so two feeds never share a counter.
pub struct GithubEventsFetcher {
    client: JsonClient,
    api_base: String,
    username: String,
    per_page: usize,
    next_page: u32,
}

#[derive(Debug, Deserialize)]
struct GithubApiEvent {
    #[serde(rename = "type")]
    event_type: String,
    repo: Repository,
    actor: Actor,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Actor {
    login: String,
    display_login: Option<String>,
}

impl From<GithubApiEvent> for GithubEvent {
    fn from(e: GithubApiEvent) -> Self {
        GithubEvent {
            repo_name: e.repo.name,
            event_type: e.event_type,
            actor_login: e.actor.display_login.unwrap_or(e.actor.login),
            created_at: e.created_at,
        }
    }
}

impl GithubEventsFetcher {
    pub fn new(client: JsonClient, config: &GithubConfig, username: String) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            username,
            per_page: config.per_page,
            next_page: 1,
        }
    }

    pub fn from_profile_url(
        client: JsonClient,
        config: &GithubConfig,
        profile_url: &str,
    ) -> Result<Self, FeedError> {
        let username = username_from_profile_url(profile_url, &config.profile_prefix)?;
        Ok(Self::new(client, config, username))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Page number the next [`load_page`](Self::load_page) call will request.
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn events_url(&self, page: u32) -> String {
        format!(
            "{}/users/{}/events/public?page={}",
            self.api_base,
            urlencoding::encode(&self.username),
            page
        )
    }

    /// Fetch the next page. The cursor advances whether or not the request
    /// succeeds.
    pub async fn load_page(&mut self) -> Result<EventPage, FetchError> {
        let page = self.next_page;
        self.next_page += 1;

        let url = self.events_url(page);
        let api_events: Vec<GithubApiEvent> = self.client.get_json(&url).await?;

        let events: Vec<GithubEvent> = api_events.into_iter().map(GithubEvent::from).collect();
        tracing::info!(username = %self.username, page, count = events.len(), "loaded events page");

        Ok(EventPage {
            page,
            events,
            per_page: self.per_page,
        })
    }
}

#[async_trait]
impl FeedFetcher for GithubEventsFetcher {
    async fn fetch(&mut self) -> Result<FeedData, FetchError> {
        Ok(FeedData::GithubEvents(self.load_page().await?))
    }
}

/// Extract the username from a profile URL such as `https://github.com/octocat`.
///
/// Scheme and `www.` differences from `prefix` are ignored. Input that does
/// not start with the prefix is taken as a bare username, and is rejected if
/// it looks like a URL on some other host.
pub fn username_from_profile_url(url: &str, prefix: &str) -> Result<String, FeedError> {
    let url = url.trim();
    let rest = match url
        .strip_prefix(prefix)
        .or_else(|| strip_scheme(url).strip_prefix(strip_scheme(prefix)))
    {
        Some(rest) => rest,
        None if url.contains(&[':', '/', '.'][..]) => {
            return Err(FeedError::InvalidProfileUrl(url.to_string()));
        }
        None => url,
    };

    let username = rest
        .trim_start_matches('/')
        .split(&['/', '?', '#'][..])
        .next()
        .unwrap_or("");

    if username.is_empty() {
        return Err(FeedError::InvalidProfileUrl(url.to_string()));
    }
    Ok(username.to_string())
}

fn strip_scheme(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.strip_prefix("www.").unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "https://github.com/";

    #[test]
    fn test_username_from_profile_url() {
        assert_eq!(
            username_from_profile_url("https://github.com/octocat", PREFIX).unwrap(),
            "octocat"
        );
    }

    #[test]
    fn test_username_from_profile_url_variants() {
        for url in [
            "http://github.com/octocat",
            "https://www.github.com/octocat",
            "https://github.com/octocat/",
            "  https://github.com/octocat  ",
            "https://github.com/octocat?tab=repositories",
            "octocat",
        ] {
            assert_eq!(
                username_from_profile_url(url, PREFIX).unwrap(),
                "octocat",
                "{url}"
            );
        }
    }

    #[test]
    fn test_username_from_profile_url_ignores_repo_path() {
        assert_eq!(
            username_from_profile_url("https://github.com/octocat/hello-world", PREFIX).unwrap(),
            "octocat"
        );
    }

    #[test]
    fn test_username_from_bare_prefix_is_error() {
        assert_eq!(
            username_from_profile_url("https://github.com/", PREFIX),
            Err(FeedError::InvalidProfileUrl("https://github.com/".to_string()))
        );
    }

    #[test]
    fn test_username_from_foreign_host_is_error() {
        for url in [
            "https://gitlab.com/octocat",
            "gitlab.com/octocat",
            "ftp://github.com/octocat",
        ] {
            assert_eq!(
                username_from_profile_url(url, PREFIX),
                Err(FeedError::InvalidProfileUrl(url.to_string())),
                "{url}"
            );
        }
    }

    #[test]
    fn test_events_url() {
        let config = GithubConfig::default();
        let fetcher =
            GithubEventsFetcher::new(JsonClient::default(), &config, "octocat".to_string());
        assert_eq!(
            fetcher.events_url(3),
            "https://api.github.com/users/octocat/events/public?page=3"
        );
    }

    #[test]
    fn test_events_url_trims_trailing_slash_and_encodes_username() {
        let config = GithubConfig {
            api_base: "http://localhost:9000/".to_string(),
            ..GithubConfig::default()
        };
        let fetcher = GithubEventsFetcher::new(JsonClient::default(), &config, "a b".to_string());
        assert_eq!(
            fetcher.events_url(1),
            "http://localhost:9000/users/a%20b/events/public?page=1"
        );
    }

    #[test]
    fn test_new_fetcher_starts_at_page_one() {
        let fetcher = GithubEventsFetcher::from_profile_url(
            JsonClient::default(),
            &GithubConfig::default(),
            "https://github.com/octocat",
        )
        .unwrap();
        assert_eq!(fetcher.username(), "octocat");
        assert_eq!(fetcher.next_page(), 1);
    }

    #[test]
    fn test_api_event_prefers_display_login() {
        let json = r#"[
            {"type":"PushEvent","repo":{"name":"octocat/hello"},"actor":{"login":"octocat","display_login":"Octo"},"created_at":"2017-03-10T23:16:00Z"},
            {"type":"WatchEvent","repo":{"name":"octocat/world"},"actor":{"login":"octocat"},"created_at":"2017-03-09T10:00:00Z"}
        ]"#;
        let api: Vec<GithubApiEvent> = serde_json::from_str(json).unwrap();
        let events: Vec<GithubEvent> = api.into_iter().map(GithubEvent::from).collect();
        assert_eq!(events[0].actor_login, "Octo");
        assert_eq!(events[1].actor_login, "octocat");
        assert_eq!(events[1].event_type, "WatchEvent");
        assert_eq!(events[0].created_at, "2017-03-10T23:16:00Z");
    }
}
