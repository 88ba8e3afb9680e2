use serde::{Deserialize, Serialize};

use super::repo::{FeedItem, Post};

/// Query string for the paginated listings. `limit` only applies to the
/// per-author listing; the global feed page size is fixed.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedPostResponse {
    pub message: &'static str,
    pub post: Post,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub posts: Vec<FeedItem>,
    pub total_pages: i64,
    pub current_page: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPostsResponse {
    pub posts: Vec<Post>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_posts: i64,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post: Post,
}
