use chrono::NaiveDateTime;
use domain::{Blog, BlogEntry, Comment, CommentAuthor, User};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SqlUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl From<SqlUser> for User {
    fn from(sql: SqlUser) -> Self {
        User {
            id: sql.id,
            username: sql.username,
            email: sql.email,
            password_hash: sql.password_hash,
            created_at: sql.created_at,
        }
    }
}

#[derive(FromRow)]
pub struct SqlBlog {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub view_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SqlBlog> for Blog {
    fn from(sql: SqlBlog) -> Self {
        Blog {
            id: sql.id,
            owner_id: sql.owner_id,
            title: sql.title,
            description: sql.description,
            slug: sql.slug,
            view_count: sql.view_count,
            created_at: sql.created_at,
            updated_at: sql.updated_at,
        }
    }
}

#[derive(FromRow)]
pub struct SqlEntry {
    pub id: i64,
    pub blog_id: i64,
    pub title: String,
    pub content: String,
    pub rendered_content: String,
    pub slug: String,
    pub comments_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SqlEntry> for BlogEntry {
    fn from(sql: SqlEntry) -> Self {
        BlogEntry {
            id: sql.id,
            blog_id: sql.blog_id,
            title: sql.title,
            content: sql.content,
            rendered_content: sql.rendered_content,
            slug: sql.slug,
            comments_enabled: sql.comments_enabled,
            created_at: sql.created_at,
            updated_at: sql.updated_at,
        }
    }
}

#[derive(FromRow)]
pub struct SqlComment {
    pub id: i64,
    pub blog_entry_id: i64,
    pub parent_comment_id: Option<i64>,
    pub user_id: Option<i64>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<SqlComment> for Comment {
    fn from(sql: SqlComment) -> Self {
        // 写入时两种作者变体必居其一；user_id 被删号置空后降级为匿名
        let author = match (sql.user_id, sql.guest_name) {
            (Some(user_id), _) => CommentAuthor::Registered { user_id },
            (None, Some(name)) => CommentAuthor::Guest {
                name,
                email: sql.guest_email.unwrap_or_default(),
            },
            (None, None) => CommentAuthor::Anonymous,
        };
        Comment {
            id: sql.id,
            blog_entry_id: sql.blog_entry_id,
            parent_comment_id: sql.parent_comment_id,
            author,
            content: sql.content,
            created_at: sql.created_at,
            updated_at: sql.updated_at,
        }
    }
}
