use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::AppError, state::AppState, uploads};

use super::{
    dto::{AuthorPostsResponse, CreatedPostResponse, FeedResponse, PageQuery, PostResponse},
    repo::{page_offset, total_pages, NewPost, Post},
};

const FEED_PAGE_SIZE: i64 = 5;
const AUTHOR_PAGE_SIZE: i64 = 10;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_feed))
        .route("/posts/user/:user_id", get(list_by_author))
        .route("/posts/:id", get(get_post))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // one cover image
}

/// POST /posts (multipart: title, summary, content, optional coverImage)
#[instrument(skip(state, identity, multipart))]
pub async fn create_post(
    State(state): State<AppState>,
    identity: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedPostResponse>), AppError> {
    let mut title = String::new();
    let mut summary = String::new();
    let mut content = String::new();
    let mut upload: Option<(bytes::Bytes, String, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => title = read_text(field).await?,
            Some("summary") => summary = read_text(field).await?,
            Some("content") => content = read_text(field).await?,
            Some("coverImage") => {
                let declared = field.content_type().map(str::to_string).unwrap_or_default();
                let original = field.file_name().map(str::to_string).unwrap_or_default();
                let data = field.bytes().await.map_err(bad_multipart)?;
                if !data.is_empty() {
                    upload = Some((data, declared, original));
                }
            }
            _ => {}
        }
    }

    if title.trim().is_empty() || summary.trim().is_empty() || content.trim().is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }

    let cover_image = match upload {
        Some((data, declared, original)) => {
            Some(uploads::accept(&state, data, &declared, &original).await?)
        }
        None => None,
    };

    let post = Post::insert(
        &state.db,
        NewPost {
            title: &title,
            summary: &summary,
            content: &content,
            cover_image: cover_image.as_deref(),
            author: &identity.name,
            author_id: identity.user_id,
        },
    )
    .await?;

    info!(post_id = %post.id, author_id = %post.author_id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedPostResponse {
            message: "Post created",
            post,
        }),
    ))
}

/// GET /posts?page=1 — global feed, summary projection, fixed page size.
#[instrument(skip(state))]
pub async fn list_feed(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<FeedResponse>, AppError> {
    let page = q.page.unwrap_or(1).max(1);

    let total = Post::count_all(&state.db).await?;
    let posts =
        Post::feed_page(&state.db, FEED_PAGE_SIZE, page_offset(page, FEED_PAGE_SIZE)).await?;

    Ok(Json(FeedResponse {
        posts,
        total_pages: total_pages(total, FEED_PAGE_SIZE),
        current_page: page,
    }))
}

/// GET /posts/user/:userId?page=&limit= — full records for one author.
#[instrument(skip(state))]
pub async fn list_by_author(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Result<Json<AuthorPostsResponse>, AppError> {
    let author_id = parse_id(&user_id, "Invalid userId")?;
    let page = q.page.unwrap_or(1).max(1);
    let limit = q.limit.unwrap_or(AUTHOR_PAGE_SIZE).clamp(1, 100);

    let total = Post::count_by_author(&state.db, author_id).await?;
    let posts = Post::by_author(&state.db, author_id, limit, page_offset(page, limit)).await?;

    Ok(Json(AuthorPostsResponse {
        posts,
        current_page: page,
        total_pages: total_pages(total, limit),
        total_posts: total,
    }))
}

/// GET /posts/:id — full record including the content body.
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post_id = parse_id(&id, "Invalid post ID")?;
    let post = Post::find_by_id(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound("Post not found"))?;
    Ok(Json(PostResponse { post }))
}

/// Identifier syntax is checked before any storage access.
fn parse_id(raw: &str, message: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(message))
}

fn bad_multipart<E>(_: E) -> AppError {
    AppError::Validation("Malformed multipart body".into())
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(bad_multipart)
}
