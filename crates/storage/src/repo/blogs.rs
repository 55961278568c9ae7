use crate::{map_err, models::SqlBlog, Db};
use chrono::Utc;
use domain::{Blog, Error};

const BLOG_COLUMNS: &str =
    "id, owner_id, title, description, slug, view_count, created_at, updated_at";

impl Db {
    pub async fn create_blog(
        &self,
        owner_id: i64,
        title: &str,
        description: &str,
        slug: &str,
    ) -> Result<Blog, Error> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            INSERT INTO blogs (owner_id, title, description, slug, view_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(slug)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(Blog {
            id: result.last_insert_rowid(),
            owner_id,
            title: title.to_string(),
            description: description.to_string(),
            slug: slug.to_string(),
            view_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_blog(&self, id: i64) -> Result<Option<Blog>, Error> {
        let row = sqlx::query_as::<_, SqlBlog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Into::into))
    }

    pub async fn list_blogs_by_owner(&self, owner_id: i64) -> Result<Vec<Blog>, Error> {
        let rows = sqlx::query_as::<_, SqlBlog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE owner_id = ? ORDER BY updated_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update_blog(
        &self,
        id: i64,
        title: &str,
        description: &str,
        slug: &str,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE blogs SET title = ?, description = ?, slug = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(slug)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    /// 公开读取时的浏览计数自增。
    pub async fn increment_blog_views(&self, id: i64) -> Result<(), Error> {
        sqlx::query("UPDATE blogs SET view_count = view_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    /// 删除博客；文章与其下评论由外键级联清除。
    pub async fn delete_blog(&self, id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    /// slug 预检查：同一所有者范围内是否被（除自身外的）其他博客占用。
    /// 只是省一次写回合的优化，最终仲裁是唯一索引。
    pub async fn blog_slug_taken(
        &self,
        owner_id: i64,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM blogs
            WHERE owner_id = ? AND slug = ? AND id != COALESCE(?, -1)
            "#,
        )
        .bind(owner_id)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(count > 0)
    }
}
