//! 文档传输层
//!
//! 远端文档服务的抽象接口。装配流程只依赖这个 trait，
//! 具体实现见 [`slides_client`]；测试里用内存实现替换。

pub mod slides_client;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::assembly::mapping::IdentifierMapping;
use crate::error::TransportError;
use crate::template::{AnchorSet, RunStyle, TextStyle};

pub use slides_client::GoogleSlidesTransport;

/// 文本范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRange {
    All,
    /// UTF-16 下标，左闭右开
    Fixed { start: usize, end: usize },
}

impl TextRange {
    fn to_json(self) -> Value {
        match self {
            TextRange::All => json!({ "type": "ALL" }),
            TextRange::Fixed { start, end } => json!({
                "type": "FIXED_RANGE",
                "startIndex": start,
                "endIndex": end,
            }),
        }
    }
}

/// 收尾批次中的单个操作
#[derive(Debug, Clone, PartialEq)]
pub enum BatchRequest {
    /// 清空元素文本（结构性操作，也用于清除未绑定的占位符）
    DeleteText { object_id: String },
    InsertText { object_id: String, text: String },
    UpdateTextStyle {
        object_id: String,
        range: TextRange,
        style: RunStyle,
    },
    /// 删除整页（模板幻灯片）
    DeleteObject { object_id: String },
}

impl BatchRequest {
    /// 整段样式
    pub fn style_all(object_id: impl Into<String>, style: TextStyle) -> Self {
        BatchRequest::UpdateTextStyle {
            object_id: object_id.into(),
            range: TextRange::All,
            style: style.into(),
        }
    }

    pub fn object_id(&self) -> &str {
        match self {
            BatchRequest::DeleteText { object_id }
            | BatchRequest::InsertText { object_id, .. }
            | BatchRequest::UpdateTextStyle { object_id, .. }
            | BatchRequest::DeleteObject { object_id } => object_id,
        }
    }

    /// 转换成 Slides batchUpdate 的请求 JSON
    pub fn to_json(&self) -> Value {
        match self {
            BatchRequest::DeleteText { object_id } => json!({
                "deleteText": {
                    "objectId": object_id,
                    "textRange": TextRange::All.to_json(),
                }
            }),
            BatchRequest::InsertText { object_id, text } => json!({
                "insertText": {
                    "objectId": object_id,
                    "text": text,
                    "insertionIndex": 0,
                }
            }),
            BatchRequest::UpdateTextStyle {
                object_id,
                range,
                style,
            } => {
                let color = style.color;
                let mut body = json!({
                    "foregroundColor": {
                        "opaqueColor": {
                            "rgbColor": { "red": color.red, "green": color.green, "blue": color.blue }
                        }
                    },
                    "bold": style.bold,
                });
                let mut fields = vec!["foregroundColor", "bold"];
                if let Some(size) = style.font_size {
                    body["fontSize"] = json!({ "magnitude": size, "unit": "PT" });
                    fields.push("fontSize");
                }
                if let Some(family) = style.font_family {
                    body["fontFamily"] = json!(family);
                    fields.push("fontFamily");
                }
                json!({
                    "updateTextStyle": {
                        "objectId": object_id,
                        "style": body,
                        "textRange": range.to_json(),
                        "fields": fields.join(","),
                    }
                })
            }
            BatchRequest::DeleteObject { object_id } => json!({
                "deleteObject": { "objectId": object_id }
            }),
        }
    }
}

/// 远端文档服务
///
/// 每个方法对应一次网络往返。错误按 [`crate::error::ErrorClass`] 分类，
/// 由调用方决定是否重试。
#[async_trait]
pub trait DocumentTransport: Send + Sync {
    /// 复制模板，返回新文档 ID
    async fn copy_template(&self, template_id: &str, title: &str) -> Result<String, TransportError>;

    /// 复制一页幻灯片，新页插在源页之后
    ///
    /// # 参数
    /// - `anchors`: 源页的锚点集
    /// - `suffix`: 本次复制的实例标签（"c0"、"i3"），实现可以用它构造新 ID
    ///
    /// # 返回
    /// 源页内每个元素到新 ID 的映射
    async fn duplicate_section(
        &self,
        document_id: &str,
        anchors: &AnchorSet,
        suffix: &str,
    ) -> Result<IdentifierMapping, TransportError>;

    /// 提交收尾批次（远端原子执行）
    async fn submit_batch(
        &self,
        document_id: &str,
        requests: &[BatchRequest],
    ) -> Result<(), TransportError>;

    /// 开放"知道链接的人可查看"
    async fn publish(&self, document_id: &str) -> Result<(), TransportError>;

    /// 文档的访问链接
    fn document_link(&self, document_id: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::style::{GREEN, WHITE};

    #[test]
    fn test_style_all_json() {
        let request = BatchRequest::style_all("obj_1", TextStyle::mono(14, WHITE));
        let json = request.to_json();
        let body = &json["updateTextStyle"];

        assert_eq!(body["objectId"], "obj_1");
        assert_eq!(body["textRange"]["type"], "ALL");
        assert_eq!(body["style"]["fontSize"]["magnitude"], 14);
        assert_eq!(body["style"]["fontFamily"], "Roboto Mono");
        assert_eq!(body["fields"], "foregroundColor,bold,fontSize,fontFamily");
    }

    #[test]
    fn test_fixed_range_run_json() {
        let request = BatchRequest::UpdateTextStyle {
            object_id: "obj_2".to_string(),
            range: TextRange::Fixed { start: 9, end: 10 },
            style: RunStyle {
                color: GREEN,
                bold: true,
                font_size: None,
                font_family: None,
            },
        };
        let json = request.to_json();
        let body = &json["updateTextStyle"];

        assert_eq!(body["textRange"]["type"], "FIXED_RANGE");
        assert_eq!(body["textRange"]["startIndex"], 9);
        assert_eq!(body["textRange"]["endIndex"], 10);
        assert_eq!(body["fields"], "foregroundColor,bold");
        assert!(body["style"].get("fontSize").is_none());
    }

    #[test]
    fn test_delete_requests_json() {
        let clear = BatchRequest::DeleteText {
            object_id: "x".to_string(),
        };
        assert_eq!(clear.to_json()["deleteText"]["textRange"]["type"], "ALL");
        assert_eq!(clear.object_id(), "x");

        let delete = BatchRequest::DeleteObject {
            object_id: "tmpl_idea".to_string(),
        };
        assert_eq!(delete.to_json()["deleteObject"]["objectId"], "tmpl_idea");
    }
}
