use auth::{credential, PrincipalResolver};
use domain::{validate, Error, Principal, User};
use storage::Db;

/// 注册即登录：写入用户并立刻签发令牌。
/// 用户名/邮箱撞唯一索引时以 Conflict 返回。
pub async fn register(
    db: &Db,
    resolver: &PrincipalResolver,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(User, String), Error> {
    validate::registration(username, email, password)?;

    let record = credential::hash(password);
    let user = db
        .create_user(username.trim(), email.trim(), &record)
        .await?;
    tracing::info!(user_id = user.id, "registered new user");

    let token = resolver.issue(principal_of(&user));
    Ok((user, token))
}

/// 登录标识可以是用户名或邮箱。"查无此人"与"密码不对"统一折叠为
/// CredentialInvalid，不向调用方泄露账号是否存在。
pub async fn login(
    db: &Db,
    resolver: &PrincipalResolver,
    login: &str,
    password: &str,
) -> Result<(User, String), Error> {
    let user = db
        .find_user_by_login(login.trim())
        .await?
        .ok_or(Error::CredentialInvalid)?;

    if !credential::verify(password, &user.password_hash) {
        return Err(Error::CredentialInvalid);
    }

    let token = resolver.issue(principal_of(&user));
    Ok((user, token))
}

pub fn logout(resolver: &PrincipalResolver, token: &str) {
    resolver.logout(token);
}

fn principal_of(user: &User) -> Principal {
    Principal {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    }
}
