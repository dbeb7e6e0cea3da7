pub mod github;
pub mod posts;

use crate::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub enum FeedData {
    GithubEvents(EventPage),
    Post(PostRecord),
    Loading,
    Error(String),
}

/// One entry of the public events API. Only the displayed fields are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubEvent {
    pub repo_name: String,
    pub event_type: String,
    pub actor_login: String,
    /// Passed through exactly as the API sent it.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPage {
    pub page: u32,
    pub events: Vec<GithubEvent>,
    pub per_page: usize,
}

impl EventPage {
    /// A short page is taken to be the last one.
    pub fn is_last(&self) -> bool {
        self.events.len() < self.per_page
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content_type: String,
    pub content: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub visibility: Visibility,
    #[serde(default)]
    pub unlisted: bool,
    #[serde(default)]
    pub visible_to: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Public,
    Foaf,
    Friends,
    Private,
    Serveronly,
    Unlisted,
}

impl Visibility {
    pub const ALL: [Visibility; 6] = [
        Visibility::Public,
        Visibility::Foaf,
        Visibility::Friends,
        Visibility::Private,
        Visibility::Serveronly,
        Visibility::Unlisted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Foaf => "FOAF",
            Visibility::Friends => "FRIENDS",
            Visibility::Private => "PRIVATE",
            Visibility::Serveronly => "SERVERONLY",
            Visibility::Unlisted => "UNLISTED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Foaf => "Friends of a Friend",
            Visibility::Friends => "Friends",
            Visibility::Private => "Private",
            Visibility::Serveronly => "Server only",
            Visibility::Unlisted => "Unlisted",
        }
    }
}

#[async_trait]
pub trait FeedFetcher: Send {
    async fn fetch(&mut self) -> Result<FeedData, FetchError>;
}
