use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 模板演示文稿 ID
    pub template_id: String,
    /// 已签发的访问令牌（OAuth 流程不在本程序范围内）
    pub access_token: String,
    pub slides_api_base_url: String,
    pub drive_api_base_url: String,
    /// 重试基础延迟（毫秒），每次翻倍
    pub retry_base_delay_ms: u64,
    /// 最大重试次数（不含首次请求）
    pub max_retries: u32,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 分析数据 JSON 路径
    pub analytics_path: String,
    /// 生成内容 JSON 路径（文件不存在时使用兜底内容）
    pub insights_path: String,
    /// 是否开放"任何人可查看"链接
    pub publish_link: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_id: String::new(),
            access_token: String::new(),
            slides_api_base_url: "https://slides.googleapis.com/v1".to_string(),
            drive_api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            retry_base_delay_ms: 2000,
            max_retries: 3,
            request_timeout_secs: 60,
            analytics_path: ".tmp/analytics.json".to_string(),
            insights_path: ".tmp/insights.json".to_string(),
            publish_link: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → REPORT_CONFIG 指向的 TOML 文件 → 环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("REPORT_CONFIG") {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    pub fn from_toml_str(content: &str, path: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.to_string(),
                source,
            }
            .into()
        })
    }

    fn from_toml_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::file_read_failed(path, e))?;
        Self::from_toml_str(&content, path)
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            template_id: env_string("GOOGLE_SLIDES_TEMPLATE_ID").unwrap_or(self.template_id),
            access_token: env_string("GOOGLE_ACCESS_TOKEN").unwrap_or(self.access_token),
            slides_api_base_url: env_string("SLIDES_API_BASE_URL").unwrap_or(self.slides_api_base_url),
            drive_api_base_url: env_string("DRIVE_API_BASE_URL").unwrap_or(self.drive_api_base_url),
            retry_base_delay_ms: env_parsed("RETRY_BASE_DELAY_MS", "u64")?.unwrap_or(self.retry_base_delay_ms),
            max_retries: env_parsed("MAX_RETRIES", "u32")?.unwrap_or(self.max_retries),
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", "u64")?.unwrap_or(self.request_timeout_secs),
            analytics_path: env_string("ANALYTICS_PATH").unwrap_or(self.analytics_path),
            insights_path: env_string("INSIGHTS_PATH").unwrap_or(self.insights_path),
            publish_link: env_parsed("PUBLISH_LINK", "bool")?.unwrap_or(self.publish_link),
            verbose_logging: env_parsed("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }

    /// 校验必填项
    pub fn validate(&self) -> AppResult<()> {
        if self.template_id.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                var_name: "GOOGLE_SLIDES_TEMPLATE_ID".to_string(),
            }
            .into());
        }
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                var_name: "GOOGLE_ACCESS_TOKEN".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match env_string(var_name) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            template_id = "tmpl-123"
            max_retries = 5
            "#,
            "report.toml",
        )
        .unwrap();

        assert_eq!(config.template_id, "tmpl-123");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_base_delay_ms, 2000);
        assert!(config.publish_link);
    }

    #[test]
    fn test_toml_parse_error() {
        let result = Config::from_toml_str("max_retries = \"many\"", "bad.toml");
        assert!(matches!(
            result,
            Err(crate::error::AppError::Config(ConfigError::TomlParseFailed { .. }))
        ));
    }

    #[test]
    fn test_validate_requires_template_and_token() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.template_id = "tmpl".to_string();
        assert!(config.validate().is_err());

        config.access_token = "token".to_string();
        assert!(config.validate().is_ok());
    }
}
