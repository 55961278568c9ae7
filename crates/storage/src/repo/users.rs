use crate::{map_err, models::SqlUser, Db};
use chrono::Utc;
use domain::{Error, User};

impl Db {
    /// 写入新用户；用户名/邮箱的唯一索引冲突映射为 Conflict。
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, Error> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    /// 登录标识可以是用户名或邮箱（两者都唯一）。
    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, SqlUser>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = ? OR email = ?
            "#,
        )
        .bind(login)
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Into::into))
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, SqlUser>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Into::into))
    }

    /// 删号：博客连带级联，已发表的评论保留、作者链接置空。
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }
}
