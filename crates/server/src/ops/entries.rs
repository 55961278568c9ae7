use domain::guard::{can_mutate, Action, Resource};
use domain::{slug, validate, BlogEntry, CommentNode, Error, Principal};
use serde::Serialize;
use storage::Db;

use super::{reserve, retry_decorated};
use crate::render::markdown_to_html;

#[derive(Debug, Serialize)]
pub struct EntryDetails {
    #[serde(flatten)]
    pub entry: BlogEntry,
    /// 评论树；comments_enabled = false 时为空集（数据仍在库里）
    pub comments: Vec<CommentNode>,
}

pub async fn create_entry(
    db: &Db,
    principal: Option<&Principal>,
    blog_id: i64,
    title: &str,
    content: &str,
) -> Result<BlogEntry, Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    let blog = db.get_blog(blog_id).await?.ok_or(Error::NotFound)?;
    if !can_mutate(Some(principal), Resource::Entry { blog_owner_id: blog.owner_id }, Action::Create) {
        return Err(Error::NotFound);
    }

    let title = validate::title(title)?;
    let base = slug::slugify(&title);
    let candidate = reserve(&base, |s| {
        let db = db.clone();
        async move { db.entry_slug_taken(blog_id, &s, None).await }
    })
    .await?;

    let rendered = markdown_to_html(content);
    let first = db
        .create_entry(blog_id, &title, content, &rendered, &candidate)
        .await;
    retry_decorated(first, &base, |decorated| async move {
        db.create_entry(blog_id, &title, content, &rendered, &decorated)
            .await
    })
    .await
}

pub async fn entry_details(db: &Db, entry_id: i64) -> Result<EntryDetails, Error> {
    let entry = db.get_entry(entry_id).await?.ok_or(Error::NotFound)?;
    with_comments(db, entry).await
}

pub async fn entry_by_slug(db: &Db, blog_id: i64, slug: &str) -> Result<EntryDetails, Error> {
    let entry = db
        .get_entry_by_slug(blog_id, slug)
        .await?
        .ok_or(Error::NotFound)?;
    with_comments(db, entry).await
}

async fn with_comments(db: &Db, entry: BlogEntry) -> Result<EntryDetails, Error> {
    // 可见性闸门：关了就不读，开回来呈现的是同一批数据
    let comments = if entry.comments_enabled {
        domain::build_tree(db.list_comments_for_entry(entry.id).await?)
    } else {
        Vec::new()
    };
    Ok(EntryDetails { entry, comments })
}

pub async fn update_entry(
    db: &Db,
    principal: Option<&Principal>,
    entry_id: i64,
    title: &str,
    content: &str,
) -> Result<BlogEntry, Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    let entry = db.get_entry(entry_id).await?.ok_or(Error::NotFound)?;
    let owner = db
        .blog_owner_of_entry(entry_id)
        .await?
        .ok_or(Error::NotFound)?;
    if !can_mutate(Some(principal), Resource::Entry { blog_owner_id: owner }, Action::Update) {
        return Err(Error::NotFound);
    }

    let title = validate::title(title)?;
    let base = slug::slugify(&title);
    let candidate = if base == entry.slug {
        entry.slug.clone()
    } else {
        reserve(&base, |s| {
            let db = db.clone();
            let blog_id = entry.blog_id;
            async move { db.entry_slug_taken(blog_id, &s, Some(entry_id)).await }
        })
        .await?
    };

    // rendered_content 是 content 的纯派生，每次内容写入都重算
    let rendered = markdown_to_html(content);
    let first = db
        .update_entry(entry_id, &title, content, &rendered, &candidate)
        .await;
    retry_decorated(first, &base, |decorated| async move {
        db.update_entry(entry_id, &title, content, &rendered, &decorated)
            .await
    })
    .await?;

    db.get_entry(entry_id).await?.ok_or(Error::NotFound)
}

pub async fn delete_entry(
    db: &Db,
    principal: Option<&Principal>,
    entry_id: i64,
) -> Result<(), Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    let owner = db
        .blog_owner_of_entry(entry_id)
        .await?
        .ok_or(Error::NotFound)?;
    if !can_mutate(Some(principal), Resource::Entry { blog_owner_id: owner }, Action::Delete) {
        return Err(Error::NotFound);
    }
    db.delete_entry(entry_id).await
}

/// 博客所有者开关评论可见性；返回新状态。
pub async fn toggle_comments(
    db: &Db,
    principal: Option<&Principal>,
    entry_id: i64,
) -> Result<bool, Error> {
    let principal = principal.ok_or(Error::Unauthorized)?;
    let entry = db.get_entry(entry_id).await?.ok_or(Error::NotFound)?;
    let owner = db
        .blog_owner_of_entry(entry_id)
        .await?
        .ok_or(Error::NotFound)?;
    if !can_mutate(Some(principal), Resource::Entry { blog_owner_id: owner }, Action::ToggleComments) {
        return Err(Error::NotFound);
    }

    let enabled = !entry.comments_enabled;
    db.set_comments_enabled(entry_id, enabled).await?;
    Ok(enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::PrincipalResolver;
    use std::time::Duration;

    async fn seeded() -> (Db, Principal, i64) {
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
        let blog = super::super::create_blog(&db, Some(&principal), "Notes", "")
            .await
            .unwrap();
        (db, principal, blog.id)
    }

    #[tokio::test]
    async fn same_title_in_same_blog_gets_new_slug_other_blog_keeps_it() {
        let (db, p, blog) = seeded().await;
        let first = create_entry(&db, Some(&p), blog, "Intro", "hello").await.unwrap();
        assert_eq!(first.slug, "intro");

        let second = create_entry(&db, Some(&p), blog, "Intro", "again").await.unwrap();
        assert_ne!(second.slug, "intro");
        assert!(second.slug.starts_with("intro-"));

        // 另一个博客下同名标题原封不动拿到 "intro"
        let other_blog = super::super::create_blog(&db, Some(&p), "Other", "")
            .await
            .unwrap();
        let third = create_entry(&db, Some(&p), other_blog.id, "Intro", "x").await.unwrap();
        assert_eq!(third.slug, "intro");
    }

    #[tokio::test]
    async fn content_writes_recompute_rendered_html() {
        let (db, p, blog) = seeded().await;
        let entry = create_entry(&db, Some(&p), blog, "Post", "# Heading").await.unwrap();
        assert!(entry.rendered_content.contains("<h1>Heading</h1>"));

        let updated = update_entry(&db, Some(&p), entry.id, "Post", "*italic*")
            .await
            .unwrap();
        assert!(updated.rendered_content.contains("<em>italic</em>"));
        assert_eq!(updated.slug, entry.slug);
    }

    #[tokio::test]
    async fn toggle_hides_then_reveals_identical_comments() {
        let (db, p, blog) = seeded().await;
        let entry = create_entry(&db, Some(&p), blog, "Post", "x").await.unwrap();

        // 打开评论并写入两条
        assert!(toggle_comments(&db, Some(&p), entry.id).await.unwrap());
        db.create_comment(entry.id, None, Some(p.id), None, None, "one").await.unwrap();
        db.create_comment(entry.id, None, None, Some("g"), Some("g@x.com"), "two")
            .await
            .unwrap();
        let visible = entry_details(&db, entry.id).await.unwrap().comments;
        assert_eq!(visible.len(), 2);

        // 关闭：读路径看不到，但数据没删
        assert!(!toggle_comments(&db, Some(&p), entry.id).await.unwrap());
        assert!(entry_details(&db, entry.id).await.unwrap().comments.is_empty());
        assert_eq!(db.list_comments_for_entry(entry.id).await.unwrap().len(), 2);

        // 再打开：同一批数据原样可见
        assert!(toggle_comments(&db, Some(&p), entry.id).await.unwrap());
        let restored = entry_details(&db, entry.id).await.unwrap().comments;
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].comment.content, "one");
        assert_eq!(restored[1].comment.content, "two");
    }

    #[tokio::test]
    async fn non_owner_gets_not_found() {
        let (db, p, blog) = seeded().await;
        let entry = create_entry(&db, Some(&p), blog, "Post", "x").await.unwrap();

        let other = Principal {
            id: p.id + 999,
            username: "other".into(),
            email: "other@example.com".into(),
        };
        for err in [
            create_entry(&db, Some(&other), blog, "Mine", "x").await.unwrap_err(),
            update_entry(&db, Some(&other), entry.id, "Post", "y").await.unwrap_err(),
            delete_entry(&db, Some(&other), entry.id).await.unwrap_err(),
            toggle_comments(&db, Some(&other), entry.id).await.unwrap_err(),
        ] {
            assert!(matches!(err, Error::NotFound));
        }
    }

    #[tokio::test]
    async fn entry_reachable_by_scoped_slug() {
        let (db, p, blog) = seeded().await;
        let entry = create_entry(&db, Some(&p), blog, "Intro", "x").await.unwrap();
        let details = entry_by_slug(&db, blog, "intro").await.unwrap();
        assert_eq!(details.entry.id, entry.id);

        let err = entry_by_slug(&db, blog + 1, "intro").await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }
}
