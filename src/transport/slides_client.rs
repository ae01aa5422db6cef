/// Google Slides / Drive HTTP 传输
///
/// 封装所有与远端文档服务相关的请求：模板复制、页复制、批量更新、权限。
/// 每个方法只发一次请求，重试由装配层负责。
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::assembly::mapping::IdentifierMapping;
use crate::config::Config;
use crate::error::{AppResult, TransportError};
use crate::template::AnchorSet;
use crate::transport::{BatchRequest, DocumentTransport};

/// Google Slides 传输
#[derive(Clone)]
pub struct GoogleSlidesTransport {
    client: Client,
    access_token: String,
    slides_base_url: String,
    drive_base_url: String,
}

impl std::fmt::Debug for GoogleSlidesTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSlidesTransport")
            .field("slides_base_url", &self.slides_base_url)
            .field("drive_base_url", &self.drive_base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl GoogleSlidesTransport {
    /// 从配置创建
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_endpoints(
            &config.access_token,
            &config.slides_api_base_url,
            &config.drive_api_base_url,
            config.request_timeout(),
        )
    }

    /// 指定服务地址创建（测试时指向本地 mock 服务）
    pub fn with_endpoints(
        access_token: &str,
        slides_base_url: &str,
        drive_base_url: &str,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::fatal("client", format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self {
            client,
            access_token: access_token.to_string(),
            slides_base_url: slides_base_url.trim_end_matches('/').to_string(),
            drive_base_url: drive_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 发送 POST 请求并解析 JSON 响应
    async fn post_json(
        &self,
        operation: &str,
        url: &str,
        body: &Value,
    ) -> Result<Value, TransportError> {
        debug!("{} -> POST {}", operation, url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(operation, e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("{} 返回 HTTP {}", operation, status.as_u16());
            return Err(TransportError::from_status(
                operation,
                status.as_u16(),
                error_message(&text),
            ));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| TransportError::fatal(operation, format!("响应解析失败: {e}")))
    }

    fn batch_update_url(&self, document_id: &str) -> String {
        format!(
            "{}/presentations/{}:batchUpdate",
            self.slides_base_url, document_id
        )
    }
}

#[async_trait]
impl DocumentTransport for GoogleSlidesTransport {
    async fn copy_template(&self, template_id: &str, title: &str) -> Result<String, TransportError> {
        let operation = "copy_template";
        let url = format!("{}/files/{}/copy", self.drive_base_url, template_id);

        // 复制失败一律视为致命
        let response = self
            .post_json(operation, &url, &json!({ "name": title }))
            .await
            .map_err(TransportError::into_fatal)?;

        response["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TransportError::fatal(operation, "响应中缺少文档 ID"))
    }

    async fn duplicate_section(
        &self,
        document_id: &str,
        anchors: &AnchorSet,
        suffix: &str,
    ) -> Result<IdentifierMapping, TransportError> {
        let operation = "duplicate_section";

        // 新 ID 由本地指定：源 ID + 实例标签
        let mut object_ids = serde_json::Map::new();
        object_ids.insert(
            anchors.section_id.clone(),
            json!(format!("{}_{suffix}", anchors.section_id)),
        );
        for id in anchors.object_ids() {
            object_ids.insert(id.to_string(), json!(format!("{id}_{suffix}")));
        }

        let body = json!({
            "requests": [{
                "duplicateObject": {
                    "objectId": anchors.section_id,
                    "objectIds": Value::Object(object_ids.clone()),
                }
            }]
        });
        let response = self
            .post_json(operation, &self.batch_update_url(document_id), &body)
            .await?;

        let section = response["replies"][0]["duplicateObject"]["objectId"]
            .as_str()
            .ok_or_else(|| TransportError::fatal(operation, "响应中缺少新页 ID"))?;

        let mut mapping =
            IdentifierMapping::new(anchors.kind, suffix, &anchors.section_id, section);
        for id in anchors.object_ids() {
            if let Some(new_id) = object_ids.get(id).and_then(Value::as_str) {
                mapping.insert(id, new_id);
            }
        }
        Ok(mapping)
    }

    async fn submit_batch(
        &self,
        document_id: &str,
        requests: &[BatchRequest],
    ) -> Result<(), TransportError> {
        if requests.is_empty() {
            return Ok(());
        }
        let body = json!({
            "requests": requests.iter().map(BatchRequest::to_json).collect::<Vec<_>>(),
        });
        self.post_json("submit_batch", &self.batch_update_url(document_id), &body)
            .await?;
        Ok(())
    }

    async fn publish(&self, document_id: &str) -> Result<(), TransportError> {
        let url = format!("{}/files/{}/permissions", self.drive_base_url, document_id);
        self.post_json("publish", &url, &json!({ "type": "anyone", "role": "reader" }))
            .await?;
        Ok(())
    }

    fn document_link(&self, document_id: &str) -> String {
        format!("https://docs.google.com/presentation/d/{document_id}/edit")
    }
}

/// 连接失败和超时可重试，其余请求错误为致命
fn classify_reqwest_error(operation: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() || error.is_connect() {
        TransportError::retryable(operation, format!("网络错误: {error}"))
    } else {
        TransportError::fatal(operation, format!("请求失败: {error}"))
    }
}

/// 提取 Google API 错误体中的 message 字段
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
