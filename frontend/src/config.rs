//! 运行时配置
//!
//! 前端没有运行时环境变量，配置在构建时通过 `option_env!` 注入，
//! 未定义时使用下面的默认值。

use log::LevelFilter;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://localhost:8000";
const DEFAULT_TOKEN_KEY: &str = "token";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// 通知提示框显示时长
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
/// 重置密码成功后跳回登录页前的等待时间
pub const RESET_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 后端地址，不带结尾的 `/`
    pub api_base: String,
    /// LocalStorage 中保存 token 的键
    pub token_key: &'static str,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// 读取构建时注入的 `SUPPORTBOT_*` 变量
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("SUPPORTBOT_API_BASE"),
            option_env!("SUPPORTBOT_TOKEN_KEY"),
            option_env!("SUPPORTBOT_LOG_LEVEL"),
        )
    }

    fn from_values(
        api_base: Option<&str>,
        token_key: Option<&'static str>,
        log_level: Option<&str>,
    ) -> Self {
        let api_base = api_base
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let token_key = token_key
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_TOKEN_KEY);

        let log_level = log_level
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            api_base,
            token_key,
            log_level,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.token_key, "token");
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_overrides_are_normalized() {
        let config = AppConfig::from_values(
            Some(" https://support.example.com/ "),
            Some("sb_token"),
            Some("debug"),
        );
        assert_eq!(config.api_base, "https://support.example.com");
        assert_eq!(config.token_key, "sb_token");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_values(Some("   "), Some(""), Some("loud"));
        assert_eq!(config, AppConfig::default());
    }
}
