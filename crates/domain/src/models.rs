use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    // 凭证记录是不透明字符串，绝不序列化给外部
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub view_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogEntry {
    pub id: i64,
    pub blog_id: i64,
    pub title: String,
    pub content: String,
    // content 的派生 HTML，每次内容写入时重算，从不直接编辑
    pub rendered_content: String,
    pub slug: String,
    pub comments_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// 评论作者：注册用户或匿名访客，二者必居其一。
/// 作者账号被删除后内容保留，归属降级为 Anonymous。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CommentAuthor {
    Registered { user_id: i64 },
    Guest { name: String, email: String },
    Anonymous,
}

impl CommentAuthor {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            CommentAuthor::Registered { user_id } => Some(*user_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub blog_entry_id: i64,
    pub parent_comment_id: Option<i64>,
    pub author: CommentAuthor,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}
