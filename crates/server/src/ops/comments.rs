use domain::guard::{can_mutate, Action, Resource};
use domain::{validate, Comment, CommentNode, Error, Principal};
use storage::Db;

/// 新评论的入站载荷；访客署名只在匿名提交时有意义。
#[derive(Debug, Default)]
pub struct NewComment {
    pub parent_comment_id: Option<i64>,
    pub content: String,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
}

/// 评论树读取；评论被关闭时返回空集（纯可见性闸门）。
pub async fn list_comments(db: &Db, entry_id: i64) -> Result<Vec<CommentNode>, Error> {
    let entry = db.get_entry(entry_id).await?.ok_or(Error::NotFound)?;
    if !entry.comments_enabled {
        return Ok(Vec::new());
    }
    Ok(domain::build_tree(db.list_comments_for_entry(entry_id).await?))
}

pub async fn create_comment(
    db: &Db,
    principal: Option<&Principal>,
    entry_id: i64,
    new: NewComment,
) -> Result<Comment, Error> {
    let entry = db.get_entry(entry_id).await?.ok_or(Error::NotFound)?;
    let owner = db
        .blog_owner_of_entry(entry_id)
        .await?
        .ok_or(Error::NotFound)?;

    // 创建评论的唯一门槛是可见性开关（作者身份这里还不存在）
    let probe = domain::CommentAuthor::Anonymous;
    let resource = Resource::Comment {
        author: &probe,
        blog_owner_id: owner,
        comments_enabled: entry.comments_enabled,
    };
    if !can_mutate(principal, resource, Action::Create) {
        return Err(Error::Forbidden);
    }

    let content = validate::comment_content(&new.content)?;

    // 声明的父评论必须存在且属于同一篇文章，禁止跨文章嫁接
    if let Some(parent_id) = new.parent_comment_id {
        let parent = db
            .get_comment(parent_id)
            .await?
            .ok_or_else(|| Error::validation("parent comment does not exist"))?;
        if parent.blog_entry_id != entry_id {
            return Err(Error::validation("parent comment belongs to a different entry"));
        }
    }

    match principal {
        Some(p) => {
            db.create_comment(entry_id, new.parent_comment_id, Some(p.id), None, None, &content)
                .await
        }
        None => {
            let (name, email) = validate::guest_attribution(
                new.guest_name.as_deref().unwrap_or(""),
                new.guest_email.as_deref().unwrap_or(""),
            )?;
            db.create_comment(
                entry_id,
                new.parent_comment_id,
                None,
                Some(&name),
                Some(&email),
                &content,
            )
            .await
        }
    }
}

pub async fn update_comment(
    db: &Db,
    principal: Option<&Principal>,
    comment_id: i64,
    content: &str,
) -> Result<Comment, Error> {
    if principal.is_none() {
        return Err(Error::Unauthorized);
    }
    let comment = db.get_comment(comment_id).await?.ok_or(Error::NotFound)?;
    let owner = db
        .blog_owner_of_entry(comment.blog_entry_id)
        .await?
        .ok_or(Error::NotFound)?;

    // 评论的存在性本来就是公开的，这里可以直说 Forbidden
    let entry = db
        .get_entry(comment.blog_entry_id)
        .await?
        .ok_or(Error::NotFound)?;
    let resource = Resource::Comment {
        author: &comment.author,
        blog_owner_id: owner,
        comments_enabled: entry.comments_enabled,
    };
    if !can_mutate(principal, resource, Action::Update) {
        return Err(Error::Forbidden);
    }

    let content = validate::comment_content(content)?;
    db.update_comment_content(comment_id, &content).await?;
    db.get_comment(comment_id).await?.ok_or(Error::NotFound)
}

pub async fn delete_comment(
    db: &Db,
    principal: Option<&Principal>,
    comment_id: i64,
) -> Result<(), Error> {
    if principal.is_none() {
        return Err(Error::Unauthorized);
    }
    let comment = db.get_comment(comment_id).await?.ok_or(Error::NotFound)?;
    let owner = db
        .blog_owner_of_entry(comment.blog_entry_id)
        .await?
        .ok_or(Error::NotFound)?;
    let entry = db
        .get_entry(comment.blog_entry_id)
        .await?
        .ok_or(Error::NotFound)?;

    let resource = Resource::Comment {
        author: &comment.author,
        blog_owner_id: owner,
        comments_enabled: entry.comments_enabled,
    };
    if !can_mutate(principal, resource, Action::Delete) {
        return Err(Error::Forbidden);
    }

    db.delete_comment(comment_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::PrincipalResolver;
    use std::time::Duration;

    struct Fixture {
        db: Db,
        owner: Principal,
        commenter: Principal,
        entry_id: i64,
    }

    async fn seeded() -> Fixture {
        let db = Db::open_in_memory().await.unwrap();
        let resolver = PrincipalResolver::session(Duration::from_secs(60));
        let (o, _) = super::super::register(&db, &resolver, "owner", "owner@example.com", "password1")
            .await
            .unwrap();
        let owner = Principal { id: o.id, username: o.username, email: o.email };
        let (c, _) = super::super::register(&db, &resolver, "carol", "carol@example.com", "password1")
            .await
            .unwrap();
        let commenter = Principal { id: c.id, username: c.username, email: c.email };

        let blog = super::super::create_blog(&db, Some(&owner), "Notes", "").await.unwrap();
        let entry = super::super::create_entry(&db, Some(&owner), blog.id, "Post", "x")
            .await
            .unwrap();
        super::super::toggle_comments(&db, Some(&owner), entry.id).await.unwrap();

        Fixture { db, owner, commenter, entry_id: entry.id }
    }

    fn guest(content: &str, name: &str, email: &str) -> NewComment {
        NewComment {
            content: content.into(),
            guest_name: Some(name.into()),
            guest_email: Some(email.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn guest_attribution_is_validated() {
        let f = seeded().await;

        let err = create_comment(&f.db, None, f.entry_id, guest("hi", "", "a@b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = create_comment(&f.db, None, f.entry_id, guest("hi", "visitor", "not-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let ok = create_comment(&f.db, None, f.entry_id, guest("hi", "visitor", "v@b.com"))
            .await
            .unwrap();
        assert_eq!(
            ok.author,
            domain::CommentAuthor::Guest { name: "visitor".into(), email: "v@b.com".into() }
        );
    }

    #[tokio::test]
    async fn disabled_comments_reject_creation() {
        let f = seeded().await;
        super::super::toggle_comments(&f.db, Some(&f.owner), f.entry_id).await.unwrap();

        let err = create_comment(&f.db, Some(&f.commenter), f.entry_id, NewComment {
            content: "hi".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Forbidden));
    }

    #[tokio::test]
    async fn cross_entry_parenting_is_rejected() {
        let f = seeded().await;
        let blog2 = super::super::create_blog(&f.db, Some(&f.owner), "Second", "").await.unwrap();
        let entry2 = super::super::create_entry(&f.db, Some(&f.owner), blog2.id, "Other", "x")
            .await
            .unwrap();
        super::super::toggle_comments(&f.db, Some(&f.owner), entry2.id).await.unwrap();

        let parent = create_comment(&f.db, Some(&f.commenter), f.entry_id, NewComment {
            content: "root".into(),
            ..Default::default()
        })
        .await
        .unwrap();

        let err = create_comment(&f.db, Some(&f.commenter), entry2.id, NewComment {
            content: "reply".into(),
            parent_comment_id: Some(parent.id),
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn edit_rights_are_author_only() {
        let f = seeded().await;
        let comment = create_comment(&f.db, Some(&f.commenter), f.entry_id, NewComment {
            content: "v1".into(),
            ..Default::default()
        })
        .await
        .unwrap();

        // 博客所有者不能替作者编辑（版主权只覆盖删除）
        let err = update_comment(&f.db, Some(&f.owner), comment.id, "hijack")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden));

        let edited = update_comment(&f.db, Some(&f.commenter), comment.id, "v2")
            .await
            .unwrap();
        assert_eq!(edited.content, "v2");
        assert!(edited.updated_at.is_some());
    }

    #[tokio::test]
    async fn guests_can_never_edit() {
        let f = seeded().await;
        let comment = create_comment(&f.db, None, f.entry_id, guest("hi", "visitor", "v@b.com"))
            .await
            .unwrap();

        let err = update_comment(&f.db, None, comment.id, "edited").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
        let err = update_comment(&f.db, Some(&f.commenter), comment.id, "edited")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden));
    }

    #[tokio::test]
    async fn moderation_delete_by_blog_owner() {
        let f = seeded().await;
        let comment = create_comment(&f.db, Some(&f.commenter), f.entry_id, NewComment {
            content: "spam".into(),
            ..Default::default()
        })
        .await
        .unwrap();

        // 第三方不行
        let err = delete_comment(&f.db, Some(&f.commenter_as_other()), comment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden));

        // 博客所有者行使版主权
        delete_comment(&f.db, Some(&f.owner), comment.id).await.unwrap();
        assert!(f.db.get_comment(comment.id).await.unwrap().is_none());
    }

    impl Fixture {
        fn commenter_as_other(&self) -> Principal {
            Principal {
                id: self.commenter.id + 1000,
                username: "stranger".into(),
                email: "stranger@example.com".into(),
            }
        }
    }
}
