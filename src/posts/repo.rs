use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Post record. `author` is the display-name snapshot taken at publish time
/// and does not track later profile renames; `author_id` never changes.
/// Posts are append-only: no update or delete path exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Summary projection for the global feed; the content body stays home.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub cover_image: Option<String>,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub struct NewPost<'a> {
    pub title: &'a str,
    pub summary: &'a str,
    pub content: &'a str,
    pub cover_image: Option<&'a str>,
    pub author: &'a str,
    pub author_id: Uuid,
}

impl Post {
    pub async fn insert(db: &PgPool, new: NewPost<'_>) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, summary, content, cover_image, author, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, summary, content, cover_image, author, author_id,
                      created_at, updated_at
            "#,
        )
        .bind(new.title)
        .bind(new.summary)
        .bind(new.content)
        .bind(new.cover_image)
        .bind(new.author)
        .bind(new.author_id)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, summary, content, cover_image, author, author_id,
                   created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    pub async fn count_all(db: &PgPool) -> anyhow::Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(db)
            .await?;
        Ok(total)
    }

    pub async fn count_by_author(db: &PgPool, author_id: Uuid) -> anyhow::Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(db)
            .await?;
        Ok(total)
    }

    /// Newest first. The id tie-break keeps page boundaries stable when two
    /// posts share a creation timestamp.
    pub async fn feed_page(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<FeedItem>> {
        let rows = sqlx::query_as::<_, FeedItem>(
            r#"
            SELECT id, title, summary, cover_image, author, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn by_author(
        db: &PgPool,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, summary, content, cover_image, author, author_id,
                   created_at, updated_at
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

/// skip = (page - 1) * page_size
pub(crate) fn page_offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

/// ceil(total / page_size); an empty store has zero pages.
pub(crate) fn total_pages(total: i64, page_size: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_matches_page_numbering() {
        assert_eq!(page_offset(1, 5), 0);
        assert_eq!(page_offset(2, 5), 5);
        assert_eq!(page_offset(3, 5), 10);
        assert_eq!(page_offset(4, 5), 15);
        assert_eq!(page_offset(2, 10), 10);
    }

    #[test]
    fn total_pages_rounds_up() {
        // 12 posts at 5 per page: pages 1-2 full, page 3 holds the last two.
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(21, 10), 3);
    }

    #[test]
    fn page_past_the_end_maps_to_an_offset_beyond_total() {
        // LIMIT/OFFSET past the row count yields an empty set, not an error.
        let total = 12;
        let offset = page_offset(4, 5);
        assert!(offset >= total);
    }

    #[test]
    fn post_json_uses_camel_case_keys() {
        let now = OffsetDateTime::now_utc();
        let post = Post {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            summary: "A greeting".into(),
            content: "<p>Hello world</p>".into(),
            cover_image: Some("/uploads/abc.png".into()),
            author: "Vasu".into(),
            author_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&post).expect("serialize");
        assert!(json.get("coverImage").is_some());
        assert!(json.get("authorId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("cover_image").is_none());
    }

    #[test]
    fn feed_item_omits_the_content_body() {
        let item = FeedItem {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            summary: "A greeting".into(),
            cover_image: None,
            author: "Vasu".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&item).expect("serialize");
        assert!(json.get("content").is_none());
        assert_eq!(json["summary"], "A greeting");
    }
}
