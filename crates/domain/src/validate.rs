//! 入站输入的语法校验。全部以 `Error::Validation` 返回，绝不 panic。

use crate::error::Error;

pub const MAX_COMMENT_LEN: usize = 5000;
pub const MAX_TITLE_LEN: usize = 200;

/// 语法级邮箱检查：恰好一个 '@'，两侧非空，域名含 '.'，无空白字符。
/// 这里只关心"看起来像邮箱"，不做投递验证（非目标）。
pub fn email_is_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// 访客署名：非空显示名 + 语法合法的邮箱。只存档归属，不用于任何登录。
pub fn guest_attribution(name: &str, email: &str) -> Result<(String, String), Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("guest name must not be empty"));
    }
    let email = email.trim();
    if !email_is_valid(email) {
        return Err(Error::validation("guest email is not a valid address"));
    }
    Ok((name.to_string(), email.to_string()))
}

pub fn comment_content(content: &str) -> Result<String, Error> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::validation("comment content must not be empty"));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(Error::validation("comment content is too long"));
    }
    Ok(content.to_string())
}

pub fn title(title: &str) -> Result<String, Error> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::validation("title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::validation("title is too long"));
    }
    Ok(title.to_string())
}

pub fn registration(username: &str, email: &str, password: &str) -> Result<(), Error> {
    let username = username.trim();
    if username.chars().count() < 3 || username.chars().count() > 50 {
        return Err(Error::validation("username must be 3-50 characters"));
    }
    if !email_is_valid(email.trim()) {
        return Err(Error::validation("email is not a valid address"));
    }
    if password.chars().count() < 8 {
        return Err(Error::validation("password must be at least 8 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_syntax() {
        assert!(email_is_valid("a@b.com"));
        assert!(email_is_valid("first.last@sub.domain.org"));
        assert!(!email_is_valid("no-at-sign"));
        assert!(!email_is_valid("@b.com"));
        assert!(!email_is_valid("a@"));
        assert!(!email_is_valid("a@nodot"));
        assert!(!email_is_valid("a b@c.com"));
        assert!(!email_is_valid("a@b.com."));
        assert!(!email_is_valid(""));
    }

    #[test]
    fn guest_attribution_rules() {
        assert!(guest_attribution("", "a@b.com").is_err());
        assert!(guest_attribution("   ", "a@b.com").is_err());
        assert!(guest_attribution("visitor", "not-an-email").is_err());
        let (name, email) = guest_attribution(" visitor ", " a@b.com ").unwrap();
        assert_eq!(name, "visitor");
        assert_eq!(email, "a@b.com");
    }

    #[test]
    fn comment_content_bounds() {
        assert!(comment_content("  ").is_err());
        assert!(comment_content(&"x".repeat(MAX_COMMENT_LEN + 1)).is_err());
        assert_eq!(comment_content(" hi ").unwrap(), "hi");
    }

    #[test]
    fn registration_rules() {
        assert!(registration("ab", "a@b.com", "password1").is_err());
        assert!(registration("alice", "bad", "password1").is_err());
        assert!(registration("alice", "a@b.com", "short").is_err());
        assert!(registration("alice", "a@b.com", "password1").is_ok());
    }
}
