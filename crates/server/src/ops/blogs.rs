use domain::guard::{can_mutate, Action, Resource};
use domain::{slug, validate, Blog, BlogEntry, Error, Principal};
use serde::Serialize;
use storage::Db;

use super::{reserve, retry_decorated};

#[derive(Debug, Serialize)]
pub struct BlogDetails {
    #[serde(flatten)]
    pub blog: Blog,
    pub entries: Vec<BlogEntry>,
}

pub async fn my_blogs(db: &Db, principal: Option<&Principal>) -> Result<Vec<Blog>, Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    db.list_blogs_by_owner(principal.id).await
}

pub async fn create_blog(
    db: &Db,
    principal: Option<&Principal>,
    title: &str,
    description: &str,
) -> Result<Blog, Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    if !can_mutate(Some(principal), Resource::Blog { owner_id: None }, Action::Create) {
        return Err(Error::Forbidden);
    }

    let title = validate::title(title)?;
    let base = slug::slugify(&title);
    let candidate = reserve(&base, |s| {
        let db = db.clone();
        let owner = principal.id;
        async move { db.blog_slug_taken(owner, &s, None).await }
    })
    .await?;

    let first = db
        .create_blog(principal.id, &title, description, &candidate)
        .await;
    retry_decorated(first, &base, |decorated| async move {
        db.create_blog(principal.id, &title, description, &decorated)
            .await
    })
    .await
}

/// 公开读取：浏览计数 +1，文章按创建时间倒序。
pub async fn blog_details(db: &Db, blog_id: i64) -> Result<BlogDetails, Error> {
    let mut blog = db.get_blog(blog_id).await?.ok_or(Error::NotFound)?;
    db.increment_blog_views(blog_id).await?;
    blog.view_count += 1;

    let entries = db.list_entries_for_blog(blog_id).await?;
    Ok(BlogDetails { blog, entries })
}

pub async fn update_blog(
    db: &Db,
    principal: Option<&Principal>,
    blog_id: i64,
    title: &str,
    description: &str,
) -> Result<Blog, Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    let blog = db.get_blog(blog_id).await?.ok_or(Error::NotFound)?;
    // 非所有者得到与"不存在"同样的答复，避免资源枚举
    if !can_mutate(Some(principal), Resource::Blog { owner_id: Some(blog.owner_id) }, Action::Update) {
        return Err(Error::NotFound);
    }

    let title = validate::title(title)?;
    let base = slug::slugify(&title);

    // 标题未变导致的相同 candidate 不换地址
    let candidate = if base == blog.slug {
        blog.slug.clone()
    } else {
        reserve(&base, |s| {
            let db = db.clone();
            let owner = blog.owner_id;
            async move { db.blog_slug_taken(owner, &s, Some(blog_id)).await }
        })
        .await?
    };

    let first = db
        .update_blog(blog_id, &title, description, &candidate)
        .await;
    retry_decorated(first, &base, |decorated| async move {
        db.update_blog(blog_id, &title, description, &decorated).await
    })
    .await?;

    db.get_blog(blog_id).await?.ok_or(Error::NotFound)
}

pub async fn delete_blog(db: &Db, principal: Option<&Principal>, blog_id: i64) -> Result<(), Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    let blog = db.get_blog(blog_id).await?.ok_or(Error::NotFound)?;
    if !can_mutate(Some(principal), Resource::Blog { owner_id: Some(blog.owner_id) }, Action::Delete) {
        return Err(Error::NotFound);
    }
    db.delete_blog(blog_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::PrincipalResolver;
    use std::time::Duration;

    async fn seeded() -> (Db, PrincipalResolver, Principal) {
        let db = Db::open_in_memory().await.unwrap();
        let resolver = PrincipalResolver::session(Duration::from_secs(60));
        let (user, _) = super::super::register(&db, &resolver, "owner", "owner@example.com", "password1")
            .await
            .unwrap();
        let principal = Principal {
            id: user.id,
            username: user.username,
            email: user.email,
        };
        (db, resolver, principal)
    }

    #[tokio::test]
    async fn create_requires_principal() {
        let (db, _, _) = seeded().await;
        let err = create_blog(&db, None, "Notes", "").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_titles_get_decorated_slugs() {
        let (db, _, p) = seeded().await;
        let first = create_blog(&db, Some(&p), "My Notes", "").await.unwrap();
        assert_eq!(first.slug, "my-notes");

        let second = create_blog(&db, Some(&p), "My Notes", "").await.unwrap();
        assert_ne!(second.slug, "my-notes");
        assert!(second.slug.starts_with("my-notes-"));
    }

    #[tokio::test]
    async fn unchanged_title_keeps_the_slug() {
        let (db, _, p) = seeded().await;
        let blog = create_blog(&db, Some(&p), "My Notes", "old").await.unwrap();

        let updated = update_blog(&db, Some(&p), blog.id, "My Notes", "new")
            .await
            .unwrap();
        assert_eq!(updated.slug, blog.slug);
        assert_eq!(updated.description, "new");
    }

    #[tokio::test]
    async fn rename_rederives_the_slug() {
        let (db, _, p) = seeded().await;
        let blog = create_blog(&db, Some(&p), "My Notes", "").await.unwrap();

        let updated = update_blog(&db, Some(&p), blog.id, "Field Journal", "")
            .await
            .unwrap();
        assert_eq!(updated.slug, "field-journal");
    }

    #[tokio::test]
    async fn non_owner_mutations_masquerade_as_not_found() {
        let (db, resolver, p) = seeded().await;
        let blog = create_blog(&db, Some(&p), "Mine", "original").await.unwrap();

        let (intruder, _) =
            super::super::register(&db, &resolver, "intruder", "i@example.com", "password1")
                .await
                .unwrap();
        let other = Principal {
            id: intruder.id,
            username: intruder.username,
            email: intruder.email,
        };

        let err = update_blog(&db, Some(&other), blog.id, "Stolen", "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound));
        let err = delete_blog(&db, Some(&other), blog.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound));

        // 博客原样未动
        let kept = db.get_blog(blog.id).await.unwrap().unwrap();
        assert_eq!(kept.title, "Mine");
        assert_eq!(kept.description, "original");
    }

    #[tokio::test]
    async fn details_bump_view_count() {
        let (db, _, p) = seeded().await;
        let blog = create_blog(&db, Some(&p), "Mine", "").await.unwrap();
        assert_eq!(blog_details(&db, blog.id).await.unwrap().blog.view_count, 1);
        assert_eq!(blog_details(&db, blog.id).await.unwrap().blog.view_count, 2);
    }

    #[tokio::test]
    async fn empty_slug_title_is_rejected() {
        let (db, _, p) = seeded().await;
        let err = create_blog(&db, Some(&p), "!!!", "").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
