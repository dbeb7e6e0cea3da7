use super::{FeedData, FeedFetcher, PostRecord};
use crate::error::{FeedError, FetchError};
use crate::fetch::JsonClient;
use async_trait::async_trait;
use reqwest::Url;

const POSTS_SEGMENT: &str = "/posts/";
const EDIT_SEGMENT: &str = "/dash/manager/edit/";

/// Fetches one post record from its edit endpoint.
pub struct PostFetcher {
    client: JsonClient,
    post_id: String,
}

impl PostFetcher {
    pub fn new(client: JsonClient, post_id: String) -> Self {
        Self { client, post_id }
    }

    pub async fn load_post(&self) -> Result<PostRecord, FetchError> {
        let url = edit_endpoint(&self.post_id)?;
        let post: PostRecord = self.client.get_json(&url).await?;
        tracing::info!(id = %post.id, "loaded post");
        Ok(post)
    }
}

#[async_trait]
impl FeedFetcher for PostFetcher {
    async fn fetch(&mut self) -> Result<FeedData, FetchError> {
        Ok(FeedData::Post(self.load_post().await?))
    }
}

/// `http://host/posts/<id>` -> `http://host/dash/manager/edit/<id>`.
///
/// The id must be an absolute `http`/`https` URL, since it is requested
/// as-is.
pub fn edit_endpoint(post_id: &str) -> Result<String, FeedError> {
    let absolute = Url::parse(post_id)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !absolute || !post_id.contains(POSTS_SEGMENT) {
        return Err(FeedError::InvalidPostId(post_id.to_string()));
    }
    Ok(post_id.replacen(POSTS_SEGMENT, EDIT_SEGMENT, 1))
}

/// Form action path for a post id: `/dash/manager/edit/<id>`.
pub fn edit_action_path(post_id: &str) -> Result<String, FeedError> {
    match post_id.split_once(POSTS_SEGMENT) {
        Some((_, rest)) => {
            let id = rest.split(POSTS_SEGMENT).next().unwrap_or(rest);
            Ok(format!("{EDIT_SEGMENT}{id}"))
        }
        None => Err(FeedError::InvalidPostId(post_id.to_string())),
    }
}
