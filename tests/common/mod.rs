//! 集成测试共用：内存文档传输和样例数据
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use slides_report::assembly::{IdentifierMapping, RetryPolicy};
use slides_report::error::TransportError;
use slides_report::models::analytics::{
    AnalyticsBundle, ChannelRole, ChannelSummary, EngagementRank, LeaderboardEntry, TopVideo,
    ViewsRank,
};
use slides_report::models::content::{ComparativeInsights, GeneratedContent, VideoIdea};
use slides_report::template::{AnchorRegistry, AnchorSet, SectionKind};
use slides_report::{AssemblyOptions, BatchRequest, DocumentTransport};

/// 模板中幻灯片的初始顺序
pub const TEMPLATE_PAGES: [&str; 6] = [
    "tmpl_title",
    "tmpl_channel",
    "tmpl_competitor",
    "tmpl_comparative",
    "tmpl_idea",
    "tmpl_takeaways",
];

#[derive(Default)]
struct MockState {
    pages: Vec<String>,
    /// 新页 ID -> 实例标签
    labels: HashMap<String, String>,
    issued: HashSet<String>,
    next_id: u64,
    copy_failure: Option<TransportError>,
    duplicate_failures: VecDeque<TransportError>,
    submit_failures: VecDeque<TransportError>,
    copies: usize,
    duplicate_calls: usize,
    submitted: Vec<Vec<BatchRequest>>,
    published: Vec<String>,
}

/// 内存文档传输
///
/// 复制的新页插在源页之后，新 ID 不可预测；可以注入失败。
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        let state = MockState {
            pages: TEMPLATE_PAGES.iter().map(|p| p.to_string()).collect(),
            next_id: 1,
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn fail_copy(&self, err: TransportError) {
        self.state.lock().unwrap().copy_failure = Some(err);
    }

    pub fn fail_duplicates(&self, times: usize, err: TransportError) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..times {
            state.duplicate_failures.push_back(err.clone());
        }
    }

    pub fn fail_submit(&self, err: TransportError) {
        self.state.lock().unwrap().submit_failures.push_back(err);
    }

    pub fn copies(&self) -> usize {
        self.state.lock().unwrap().copies
    }

    pub fn duplicate_calls(&self) -> usize {
        self.state.lock().unwrap().duplicate_calls
    }

    pub fn submitted(&self) -> Vec<Vec<BatchRequest>> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// 唯一一次提交的批次
    pub fn only_batch(&self) -> Vec<BatchRequest> {
        let submitted = self.submitted();
        assert_eq!(submitted.len(), 1, "应当只提交一次收尾批次");
        submitted.into_iter().next().unwrap()
    }

    pub fn published(&self) -> Vec<String> {
        self.state.lock().unwrap().published.clone()
    }

    /// 复制过程中发出的所有新 ID
    pub fn issued_ids(&self) -> HashSet<String> {
        self.state.lock().unwrap().issued.clone()
    }

    /// 应用已提交批次中的删除后，文档的页顺序（复制页用实例标签表示）
    pub fn page_labels(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let deleted: HashSet<&str> = state
            .submitted
            .iter()
            .flatten()
            .filter_map(|r| match r {
                BatchRequest::DeleteObject { object_id } => Some(object_id.as_str()),
                _ => None,
            })
            .collect();
        state
            .pages
            .iter()
            .filter(|p| !deleted.contains(p.as_str()))
            .map(|p| state.labels.get(p).cloned().unwrap_or_else(|| p.clone()))
            .collect()
    }

    fn fresh_id(state: &mut MockState) -> String {
        let id = format!("g{:012x}", state.next_id.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 16);
        state.next_id += 1;
        state.issued.insert(id.clone());
        id
    }
}

#[async_trait]
impl DocumentTransport for MockTransport {
    async fn copy_template(&self, _template_id: &str, _title: &str) -> Result<String, TransportError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.copy_failure.take() {
            return Err(err);
        }
        state.copies += 1;
        Ok(format!("doc_{}", state.copies))
    }

    async fn duplicate_section(
        &self,
        _document_id: &str,
        anchors: &AnchorSet,
        suffix: &str,
    ) -> Result<IdentifierMapping, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.duplicate_calls += 1;
        if let Some(err) = state.duplicate_failures.pop_front() {
            return Err(err);
        }

        let page = Self::fresh_id(&mut state);
        let position = state
            .pages
            .iter()
            .position(|p| *p == anchors.section_id)
            .ok_or_else(|| TransportError::fatal("duplicate_section", "源页不存在"))?;
        state.pages.insert(position + 1, page.clone());
        state.labels.insert(page.clone(), suffix.to_string());

        let mut mapping = IdentifierMapping::new(anchors.kind, suffix, &anchors.section_id, page);
        for id in anchors.object_ids() {
            let new_id = Self::fresh_id(&mut state);
            mapping.insert(id, new_id);
        }
        Ok(mapping)
    }

    async fn submit_batch(
        &self,
        _document_id: &str,
        requests: &[BatchRequest],
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.submit_failures.pop_front() {
            return Err(err);
        }
        state.submitted.push(requests.to_vec());
        Ok(())
    }

    async fn publish(&self, document_id: &str) -> Result<(), TransportError> {
        self.state
            .lock()
            .unwrap()
            .published
            .push(document_id.to_string());
        Ok(())
    }

    fn document_link(&self, document_id: &str) -> String {
        format!("mock://{document_id}")
    }
}

/// 标准注册表的变体：`edit` 可以删掉某个锚点集或其中的元素
pub fn registry_with(edit: impl FnOnce(&mut Vec<AnchorSet>)) -> AnchorRegistry {
    let standard = AnchorRegistry::standard();
    let mut sets: Vec<AnchorSet> = SectionKind::ALL
        .iter()
        .map(|kind| standard.anchors_for(*kind).unwrap().clone())
        .collect();
    edit(&mut sets);
    AnchorRegistry::new(sets)
}

/// 测试用选项：很短的重试延迟，固定日期
pub fn options(base_delay_ms: u64, max_retries: u32) -> AssemblyOptions {
    AssemblyOptions {
        template_id: "tmpl_deck".to_string(),
        retry: RetryPolicy::new(Duration::from_millis(base_delay_ms), max_retries),
        publish_link: true,
        report_date: NaiveDate::from_ymd_opt(2026, 5, 1),
    }
}

fn channel(name: &str, role: ChannelRole, views: u64, videos: usize) -> ChannelSummary {
    ChannelSummary {
        channel_id: format!("UC_{name}"),
        channel_name: name.to_string(),
        role,
        subscriber_count: Some(views / 10),
        total_period_views: views,
        video_count: 20,
        avg_engagement: 3.5,
        upload_frequency: 2.0,
        top_videos: (0..videos)
            .map(|i| TopVideo {
                title: format!("{name} video {}", i + 1),
                video_id: format!("{name}_v{i}"),
                views: views / 10 - i as u64 * 100,
                engagement: 4.0,
                outlier_score: 1.5,
            })
            .collect(),
    }
}

/// 样例分析数据：主频道 + `competitors` 个竞品，排行榜 7 条
pub fn sample_analytics(competitors: usize) -> AnalyticsBundle {
    let mut bundle = AnalyticsBundle {
        channel: channel("Mine", ChannelRole::Own, 50_000, 5),
        days: 60,
        ..Default::default()
    };
    for i in 0..competitors {
        // 最后一个竞品只有三个视频
        let videos = if i + 1 == competitors { 3 } else { 5 };
        bundle.competitors.push(channel(
            &format!("Rival{i}"),
            ChannelRole::Competitor,
            100_000 + i as u64 * 10_000,
            videos,
        ));
    }

    let mut all: Vec<ChannelSummary> = bundle.all_channels().cloned().collect();
    all.sort_by(|a, b| b.total_period_views.cmp(&a.total_period_views));
    bundle.comparative.views_ranking = all
        .iter()
        .map(|c| ViewsRank {
            channel_name: c.channel_name.clone(),
            total_period_views: c.total_period_views,
        })
        .collect();
    bundle.comparative.engagement_ranking = all
        .iter()
        .map(|c| EngagementRank {
            channel_name: c.channel_name.clone(),
            avg_engagement: c.avg_engagement,
        })
        .collect();
    bundle.comparative.top_performer = all.first().map(|c| c.channel_name.clone());

    for i in 0..7u64 {
        bundle
            .comparative
            .cross_channel_leaderboard
            .push(LeaderboardEntry {
                channel_name: "Mine".to_string(),
                title: format!("Outlier {i}"),
                video_id: format!("out_{i}"),
                views: 10_000 + i,
                outlier_score: 1.0 + i as f64,
                engagement: 5.0,
            });
    }
    bundle
}

/// 样例生成内容：只有三个创意，第一个创意只有三个标题变体
pub fn sample_generated() -> GeneratedContent {
    GeneratedContent {
        comparative_analysis: Some(ComparativeInsights {
            overview: "Generated overview".to_string(),
            key_trends: vec!["Trend A".into(), "Trend B".into(), "Trend C".into()],
            content_gaps: vec!["Gap A".into()],
            top_performer_note: "Generated note".to_string(),
        }),
        video_ideas: (1..=3)
            .map(|n| VideoIdea {
                title: format!("Generated idea {n}"),
                title_variations: if n == 1 {
                    vec!["A".into(), "B".into(), "C".into()]
                } else {
                    (1..=5).map(|v| format!("Variation {v}")).collect()
                },
                hooks: vec!["Hook one".into(), "Hook two".into()],
                topic: "Topic".to_string(),
            })
            .collect(),
        takeaways: vec!["Do A".into(), "Do B".into(), "Do C".into()],
    }
}

/// 批次中所有写入文本的 (目标, 文本)
pub fn inserted_texts(batch: &[BatchRequest]) -> Vec<(String, String)> {
    batch
        .iter()
        .filter_map(|r| match r {
            BatchRequest::InsertText { object_id, text } => Some((object_id.clone(), text.clone())),
            _ => None,
        })
        .collect()
}

pub fn count_deletions(batch: &[BatchRequest], section: &str) -> usize {
    batch
        .iter()
        .filter(|r| matches!(r, BatchRequest::DeleteObject { object_id } if object_id == section))
        .count()
}
