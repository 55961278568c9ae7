mod blogs;
mod comments;
mod entries;
mod users;
