pub mod comment_tree;
pub mod guard;
pub mod slug;
pub mod validate;

mod error;
mod models;
mod principal;

pub use comment_tree::{build_tree, CommentNode};
pub use error::Error;
pub use models::{Blog, BlogEntry, Comment, CommentAuthor, User};
pub use principal::Principal;
