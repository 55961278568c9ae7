use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

/// 认证策略按部署选定一次，不按请求混用。
#[derive(Deserialize, Clone)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuthSettings {
    /// 服务端会话 + 滑动空闲超时
    Session { idle_timeout_secs: u64 },
    /// 自包含签名令牌，离线验证
    Bearer {
        token_secret: String,
        token_ttl_secs: i64,
    },
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origins", "*")?
            .set_default("database.url", "sqlite://data/blog.db")?
            .set_default("auth.mode", "session")?
            .set_default("auth.idle_timeout_secs", 1800)?
            .set_default("auth.token_secret", "change_me_please")?
            .set_default("auth.token_ttl_secs", 3600)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(
                &serde_json::to_string(&env_map)
                    .expect("Environment variables should serialize to JSON"),
                config::FileFormat::Json,
            ))
            .build()?;

        s.try_deserialize()
    }
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("BLOG_"))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches("BLOG_")
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}
