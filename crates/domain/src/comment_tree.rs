//! 将每篇文章下的扁平评论集重建为树。
//!
//! 评论在存储中是带可空 parent id 的扁平节点；读取时按 parent id 建索引
//! 再递归组装，避免对象间的循环引用。同级排序固定为创建时间升序
//! （根评论与回复一致），保证线程阅读顺序稳定。

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Comment;

#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

pub fn build_tree(mut comments: Vec<Comment>) -> Vec<CommentNode> {
    // created_at 相同（同一事务批量写入）时以 id 决出稳定次序
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let mut children: HashMap<Option<i64>, Vec<Comment>> = HashMap::new();
    for c in comments {
        children.entry(c.parent_comment_id).or_default().push(c);
    }

    attach(None, &mut children)
}

fn attach(parent: Option<i64>, children: &mut HashMap<Option<i64>, Vec<Comment>>) -> Vec<CommentNode> {
    let Some(level) = children.remove(&parent) else {
        return Vec::new();
    };
    level
        .into_iter()
        .map(|comment| {
            let replies = attach(Some(comment.id), children);
            CommentNode { comment, replies }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommentAuthor;
    use chrono::NaiveDateTime;

    fn ts(secs: i64) -> NaiveDateTime {
        chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn comment(id: i64, parent: Option<i64>, secs: i64) -> Comment {
        Comment {
            id,
            blog_entry_id: 1,
            parent_comment_id: parent,
            author: CommentAuthor::Anonymous,
            content: format!("c{id}"),
            created_at: ts(secs),
            updated_at: None,
        }
    }

    #[test]
    fn roots_and_replies_sorted_by_creation_time() {
        let flat = vec![
            comment(3, None, 30),
            comment(1, None, 10),
            comment(4, Some(1), 40),
            comment(2, Some(1), 20),
            comment(5, Some(2), 50),
        ];
        let tree = build_tree(flat);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].comment.id, 1);
        assert_eq!(tree[1].comment.id, 3);

        let replies: Vec<i64> = tree[0].replies.iter().map(|n| n.comment.id).collect();
        assert_eq!(replies, vec![2, 4]);
        assert_eq!(tree[0].replies[0].replies[0].comment.id, 5);
    }

    #[test]
    fn equal_timestamps_fall_back_to_id_order() {
        let flat = vec![comment(2, None, 10), comment(1, None, 10)];
        let tree = build_tree(flat);
        assert_eq!(tree[0].comment.id, 1);
        assert_eq!(tree[1].comment.id, 2);
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        assert!(build_tree(Vec::new()).is_empty());
    }
}
