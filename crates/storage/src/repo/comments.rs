use crate::{map_err, models::SqlComment, Db};
use chrono::Utc;
use domain::{Comment, Error};

const COMMENT_COLUMNS: &str = "id, blog_entry_id, parent_comment_id, user_id, \
     guest_name, guest_email, content, created_at, updated_at";

impl Db {
    /// 写入评论。作者二选一：注册用户传 user_id，访客传 name/email。
    /// 调用方负责在写入前校验父评论归属与访客署名。
    pub async fn create_comment(
        &self,
        blog_entry_id: i64,
        parent_comment_id: Option<i64>,
        user_id: Option<i64>,
        guest_name: Option<&str>,
        guest_email: Option<&str>,
        content: &str,
    ) -> Result<Comment, Error> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            INSERT INTO comments
                (blog_entry_id, parent_comment_id, user_id, guest_name, guest_email, content, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(blog_entry_id)
        .bind(parent_comment_id)
        .bind(user_id)
        .bind(guest_name)
        .bind(guest_email)
        .bind(content)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        let id = result.last_insert_rowid();
        // 作者变体交给统一的行映射来判定
        self.get_comment(id)
            .await?
            .ok_or_else(|| Error::Storage("comment vanished after insert".into()))
    }

    pub async fn get_comment(&self, id: i64) -> Result<Option<Comment>, Error> {
        let row = sqlx::query_as::<_, SqlComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Into::into))
    }

    pub async fn list_comments_for_entry(&self, blog_entry_id: i64) -> Result<Vec<Comment>, Error> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE blog_entry_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(blog_entry_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update_comment_content(&self, id: i64, content: &str) -> Result<(), Error> {
        sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now().naive_utc())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    /// 删除评论；回复子树由自引用外键级联清除。
    pub async fn delete_comment(&self, id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }
}
