//! 应用服务层：解析出的主体 + 授权判定 + slug 保留 + 存储调用。
//!
//! 每个操作在任何变更落库之前，基于一次一致的所有权快照完成全部授权检查。

mod accounts;
mod blogs;
mod comments;
mod entries;

pub use accounts::{login, logout, register};
pub use blogs::{blog_details, create_blog, delete_blog, my_blogs, update_blog, BlogDetails};
pub use comments::{create_comment, delete_comment, list_comments, update_comment, NewComment};
pub use entries::{
    create_entry, delete_entry, entry_by_slug, entry_details, toggle_comments, update_entry,
    EntryDetails,
};

use chrono::Utc;
use domain::{slug, Error};

/// slug 预留：范围内被占用就装饰一次（时钟末 6 位），不做无限探测。
/// 预检查只是省回合的优化；真正的仲裁是存储层唯一索引（见 conflict 重试）。
async fn reserve<F, Fut>(candidate: &str, taken: F) -> Result<String, Error>
where
    F: Fn(String) -> Fut,
    Fut: std::future::Future<Output = Result<bool, Error>>,
{
    if candidate.is_empty() {
        return Err(Error::validation("title does not yield a usable slug"));
    }
    if taken(candidate.to_string()).await? {
        Ok(slug::decorate(candidate, clock()))
    } else {
        Ok(candidate.to_string())
    }
}

fn clock() -> i64 {
    Utc::now().timestamp_micros()
}

/// 对存储报告的唯一性冲突（预检查与写入之间的竞态）重试一次去重，
/// 再冲突就把 Conflict 交给边界层。
async fn retry_decorated<T, F, Fut>(
    first: Result<T, Error>,
    base: &str,
    write: F,
) -> Result<T, Error>
where
    F: FnOnce(String) -> Fut,
    Fut: std::future::Future<Output = Result<T, Error>>,
{
    match first {
        Err(Error::Conflict) => write(slug::decorate(base, clock())).await,
        other => other,
    }
}
