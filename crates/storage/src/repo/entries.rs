use crate::{map_err, models::SqlEntry, Db};
use chrono::Utc;
use domain::{BlogEntry, Error};

const ENTRY_COLUMNS: &str =
    "id, blog_id, title, content, rendered_content, slug, comments_enabled, created_at, updated_at";

impl Db {
    pub async fn create_entry(
        &self,
        blog_id: i64,
        title: &str,
        content: &str,
        rendered_content: &str,
        slug: &str,
    ) -> Result<BlogEntry, Error> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            INSERT INTO blog_entries
                (blog_id, title, content, rendered_content, slug, comments_enabled, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, FALSE, ?, ?)
            "#,
        )
        .bind(blog_id)
        .bind(title)
        .bind(content)
        .bind(rendered_content)
        .bind(slug)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(BlogEntry {
            id: result.last_insert_rowid(),
            blog_id,
            title: title.to_string(),
            content: content.to_string(),
            rendered_content: rendered_content.to_string(),
            slug: slug.to_string(),
            comments_enabled: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_entry(&self, id: i64) -> Result<Option<BlogEntry>, Error> {
        let row = sqlx::query_as::<_, SqlEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM blog_entries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Into::into))
    }

    /// slug 只在所属博客范围内唯一，按 (blog_id, slug) 取。
    pub async fn get_entry_by_slug(
        &self,
        blog_id: i64,
        slug: &str,
    ) -> Result<Option<BlogEntry>, Error> {
        let row = sqlx::query_as::<_, SqlEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM blog_entries WHERE blog_id = ? AND slug = ?"
        ))
        .bind(blog_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Into::into))
    }

    pub async fn list_entries_for_blog(&self, blog_id: i64) -> Result<Vec<BlogEntry>, Error> {
        let rows = sqlx::query_as::<_, SqlEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM blog_entries WHERE blog_id = ? ORDER BY created_at DESC"
        ))
        .bind(blog_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update_entry(
        &self,
        id: i64,
        title: &str,
        content: &str,
        rendered_content: &str,
        slug: &str,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE blog_entries
            SET title = ?, content = ?, rendered_content = ?, slug = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(rendered_content)
        .bind(slug)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    /// 纯可见性开关：不触碰评论数据。
    pub async fn set_comments_enabled(&self, id: i64, enabled: bool) -> Result<(), Error> {
        sqlx::query("UPDATE blog_entries SET comments_enabled = ? WHERE id = ?")
            .bind(enabled)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    pub async fn delete_entry(&self, id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM blog_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    /// 授权用：一跳取出文章所属博客的所有者。
    pub async fn blog_owner_of_entry(&self, entry_id: i64) -> Result<Option<i64>, Error> {
        let owner: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT b.owner_id
            FROM blog_entries e
            JOIN blogs b ON e.blog_id = b.id
            WHERE e.id = ?
            "#,
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(owner)
    }

    pub async fn entry_slug_taken(
        &self,
        blog_id: i64,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM blog_entries
            WHERE blog_id = ? AND slug = ? AND id != COALESCE(?, -1)
            "#,
        )
        .bind(blog_id)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(count > 0)
    }
}
