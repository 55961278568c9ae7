//! 所有权链上的纯授权判定。无隐藏状态，只看 (principal, 资源所有权链, action)。
//!
//! 这里只回答"是否允许"；NotFound / Forbidden / Unauthorized 的外部措辞
//! 由边界层决定（博客与文章的拒绝统一伪装为 NotFound，避免资源枚举）。

use crate::models::CommentAuthor;
use crate::principal::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    ToggleComments,
}

#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// owner_id 在创建时尚不存在，故为 Option。
    Blog { owner_id: Option<i64> },
    /// 文章没有独立所有权，一律回溯到所属博客的 owner。
    Entry { blog_owner_id: i64 },
    Comment {
        author: &'a CommentAuthor,
        blog_owner_id: i64,
        comments_enabled: bool,
    },
}

pub fn can_mutate(principal: Option<&Principal>, resource: Resource<'_>, action: Action) -> bool {
    match (resource, action) {
        // 任何已认证主体都可以创建博客，所有权归该主体
        (Resource::Blog { .. }, Action::Create) => principal.is_some(),
        (Resource::Blog { owner_id }, Action::Update | Action::Delete) => {
            matches!((principal, owner_id), (Some(p), Some(o)) if p.id == o)
        }
        (Resource::Blog { .. }, Action::ToggleComments) => false,

        // 文章的增删改与评论开关都只属于博客所有者
        (Resource::Entry { blog_owner_id }, _) => {
            matches!(principal, Some(p) if p.id == blog_owner_id)
        }

        // 评论开关下的创建对所有人开放；访客的署名校验在 validate 层
        (Resource::Comment { comments_enabled, .. }, Action::Create) => comments_enabled,
        // 只有原注册作者能编辑；访客提交后没有可再认证的凭证
        (Resource::Comment { author, .. }, Action::Update) => {
            matches!((principal, author.user_id()), (Some(p), Some(uid)) if p.id == uid)
        }
        // 原注册作者或博客所有者（版主权）可删除
        (Resource::Comment { author, blog_owner_id, .. }, Action::Delete) => {
            match principal {
                Some(p) => author.user_id() == Some(p.id) || p.id == blog_owner_id,
                None => false,
            }
        }
        (Resource::Comment { .. }, Action::ToggleComments) => false,
    }
}
