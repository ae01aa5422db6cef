use crate::error::{AppError, AppResult};
use crate::models::analytics::AnalyticsBundle;
use crate::models::content::GeneratedContent;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

async fn load_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;

    serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(&display, e))
}

/// 从 JSON 文件加载分析数据包（必需）
pub async fn load_analytics(path: &Path) -> AppResult<AnalyticsBundle> {
    let bundle: AnalyticsBundle = load_json(path).await?;
    info!(
        "✓ 已加载分析数据: {} + {} 个竞品",
        bundle.channel.channel_name,
        bundle.competitors.len()
    );
    Ok(bundle)
}

/// 加载生成内容（可选）
///
/// 文件不存在不是错误，返回 None，由兜底生成器接管。
pub async fn load_generated_content(path: &Path) -> AppResult<Option<GeneratedContent>> {
    let exists = fs::try_exists(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    if !exists {
        warn!("⚠️ 未找到生成内容文件 {}，将使用兜底内容", path.display());
        return Ok(None);
    }

    let content: GeneratedContent = load_json(path).await?;
    info!("✓ 已加载生成内容: {} 个创意", content.video_ideas.len());
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_insights_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_generated_content(&dir.path().join("insights.json"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_insights_path_is_error() {
        // 父路径是普通文件，检查存在性本身就会失败
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_generated_content(&file.path().join("insights.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::File(crate::error::FileError::ReadFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_analytics_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"channel": {{"channel_name": "Mine"}}, "competitors": [], "days": 30}}"#
        )
        .unwrap();

        let bundle = load_analytics(file.path()).await.unwrap();
        assert_eq!(bundle.channel.channel_name, "Mine");
        assert_eq!(bundle.days, 30);
    }

    #[tokio::test]
    async fn test_invalid_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_analytics(file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(crate::error::FileError::JsonParseFailed { .. })
        ));
    }
}
