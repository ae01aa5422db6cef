//! 演示文稿文字内容
//!
//! 生成内容（上游模型输出）和兜底内容都归一成同一个 `ContentBundle`，
//! 绑定层不关心内容来自哪里。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::analytics::AnalyticsBundle;

/// 视频创意页的数量（模板布局固定）
pub const IDEA_SLOTS: usize = 5;
/// 趋势 / 差距要点最多三条
pub const BULLET_SLOTS: usize = 3;
/// 结论页固定三条
pub const TAKEAWAY_SLOTS: usize = 3;
/// 每个创意的标题变体数
pub const TITLE_VARIATION_SLOTS: usize = 5;
/// 每个创意的开场钩子数
pub const HOOK_SLOTS: usize = 2;

/// 单个视频创意
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VideoIdea {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub title_variations: Vec<String>,
    #[serde(default)]
    pub hooks: Vec<String>,
    #[serde(default)]
    pub topic: String,
}

impl VideoIdea {
    /// 补位用的创意（编号从 1 开始）
    pub fn placeholder(number: usize) -> Self {
        Self {
            title: format!("Video Idea #{number}"),
            ..Default::default()
        }
    }
}

/// 绑定层消费的统一内容形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentBundle {
    pub overview: String,
    pub key_trends: Vec<String>,
    pub content_gaps: Vec<String>,
    pub top_performer_note: String,
    pub ideas: Vec<VideoIdea>,
    pub takeaways: Vec<String>,
}

impl ContentBundle {
    /// 截断到模板槽位数，创意不足五个时补位
    pub fn normalized(mut self) -> Self {
        self.key_trends.truncate(BULLET_SLOTS);
        self.content_gaps.truncate(BULLET_SLOTS);
        self.takeaways.truncate(TAKEAWAY_SLOTS);
        self.ideas.truncate(IDEA_SLOTS);
        while self.ideas.len() < IDEA_SLOTS {
            self.ideas.push(VideoIdea::placeholder(self.ideas.len() + 1));
        }
        self
    }
}

/// 内容来源：生成内容或兜底生成器
///
/// 编排层在绑定之前只选择一次。
pub trait ContentSource: Send + Sync {
    /// 来源名称（用于日志）
    fn name(&self) -> &'static str;

    fn resolve(&self, analytics: &AnalyticsBundle) -> ContentBundle;
}

/// 生成内容中对比分析的部分
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComparativeInsights {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub key_trends: Vec<String>,
    #[serde(default)]
    pub content_gaps: Vec<String>,
    #[serde(default)]
    pub top_performer_note: String,
}

/// 上游生成的内容（insights JSON）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneratedContent {
    #[serde(default)]
    pub comparative_analysis: Option<ComparativeInsights>,
    #[serde(default)]
    pub video_ideas: Vec<VideoIdea>,
    #[serde(default)]
    pub takeaways: Vec<String>,
}

impl ContentSource for GeneratedContent {
    fn name(&self) -> &'static str {
        "generated"
    }

    /// 缺失的部分逐项用兜底内容补齐
    fn resolve(&self, analytics: &AnalyticsBundle) -> ContentBundle {
        let fallback = crate::assembly::FallbackGenerator.resolve(analytics);

        if self.comparative_analysis.is_none() {
            debug!("生成内容缺少对比分析，整段使用兜底内容");
        }
        let ca = self.comparative_analysis.clone().unwrap_or_default();

        let overview = text_or("overview", &ca.overview, fallback.overview);
        let key_trends = non_empty_or("key_trends", &ca.key_trends, fallback.key_trends);
        let content_gaps = non_empty_or("content_gaps", &ca.content_gaps, fallback.content_gaps);
        let top_performer_note = text_or(
            "top_performer_note",
            &ca.top_performer_note,
            fallback.top_performer_note,
        );

        let ideas = if self.video_ideas.is_empty() {
            debug!("生成内容缺少 video_ideas，使用兜底内容");
            fallback.ideas
        } else {
            self.video_ideas.clone()
        };

        ContentBundle {
            overview,
            key_trends,
            content_gaps,
            top_performer_note,
            ideas,
            takeaways: non_empty_or("takeaways", &self.takeaways, fallback.takeaways),
        }
        .normalized()
    }
}

fn text_or(field: &str, text: &str, fallback: String) -> String {
    if text.trim().is_empty() {
        debug!("生成内容缺少 {}，使用兜底内容", field);
        fallback
    } else {
        text.to_string()
    }
}

fn non_empty_or(field: &str, items: &[String], fallback: Vec<String>) -> Vec<String> {
    let kept: Vec<String> = items
        .iter()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect();
    if kept.is_empty() {
        debug!("生成内容缺少 {}，使用兜底内容", field);
        fallback
    } else {
        kept
    }
}
