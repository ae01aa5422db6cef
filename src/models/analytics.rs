//! 分析数据包（上游已经计算好的结果，本程序只读）

use serde::{Deserialize, Serialize};

fn default_days() -> u32 {
    60
}

/// 频道角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelRole {
    /// 被分析的主频道
    #[serde(rename = "self")]
    Own,
    #[default]
    Competitor,
}

/// 单个视频的排行记录
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TopVideo {
    pub title: String,
    #[serde(default)]
    pub video_id: String,
    pub views: u64,
    /// 互动率，百分比数值（4.1 表示 4.1%）
    #[serde(default)]
    pub engagement: f64,
    #[serde(default)]
    pub outlier_score: f64,
}

/// 单个频道的汇总
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelSummary {
    #[serde(default)]
    pub channel_id: String,
    pub channel_name: String,
    #[serde(default)]
    pub role: ChannelRole,
    /// 订阅数被隐藏时为 None
    #[serde(default)]
    pub subscriber_count: Option<u64>,
    #[serde(default)]
    pub total_period_views: u64,
    #[serde(default)]
    pub video_count: u64,
    #[serde(default)]
    pub avg_engagement: f64,
    /// 每周上传数
    #[serde(default)]
    pub upload_frequency: f64,
    #[serde(default)]
    pub top_videos: Vec<TopVideo>,
}

impl ChannelSummary {
    /// 平均每个视频的播放量
    pub fn avg_views_per_video(&self) -> u64 {
        if self.video_count == 0 {
            0
        } else {
            self.total_period_views / self.video_count
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewsRank {
    pub channel_name: String,
    pub total_period_views: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngagementRank {
    pub channel_name: String,
    pub avg_engagement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutlierRank {
    pub channel_name: String,
    pub highest_outlier_score: f64,
}

/// 跨频道离群视频排行榜条目
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeaderboardEntry {
    pub channel_name: String,
    pub title: String,
    #[serde(default)]
    pub video_id: String,
    pub views: u64,
    pub outlier_score: f64,
    #[serde(default)]
    pub engagement: f64,
}

/// 对比分析部分
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Comparative {
    #[serde(default)]
    pub views_ranking: Vec<ViewsRank>,
    #[serde(default)]
    pub engagement_ranking: Vec<EngagementRank>,
    #[serde(default)]
    pub outlier_ranking: Vec<OutlierRank>,
    #[serde(default)]
    pub top_performer: Option<String>,
    #[serde(default)]
    pub cross_channel_leaderboard: Vec<LeaderboardEntry>,
}

/// 完整的分析数据包
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalyticsBundle {
    pub channel: ChannelSummary,
    #[serde(default)]
    pub competitors: Vec<ChannelSummary>,
    #[serde(default)]
    pub comparative: Comparative,
    /// 分析窗口天数
    #[serde(default = "default_days")]
    pub days: u32,
}

impl AnalyticsBundle {
    /// 主频道 + 所有竞品，按输入顺序
    pub fn all_channels(&self) -> impl Iterator<Item = &ChannelSummary> {
        std::iter::once(&self.channel).chain(self.competitors.iter())
    }

    pub fn find_channel(&self, name: &str) -> Option<&ChannelSummary> {
        self.all_channels().find(|c| c.channel_name == name)
    }

    /// 播放量排名（从 1 开始）
    pub fn views_rank_of(&self, name: &str) -> Option<usize> {
        self.comparative
            .views_ranking
            .iter()
            .position(|r| r.channel_name == name)
            .map(|i| i + 1)
    }

    /// 互动率排名（从 1 开始）
    pub fn engagement_rank_of(&self, name: &str) -> Option<usize> {
        self.comparative
            .engagement_ranking
            .iter()
            .position(|r| r.channel_name == name)
            .map(|i| i + 1)
    }

    /// 按离群分数降序的排行榜（稳定排序，同分保持原顺序）
    pub fn leaderboard_by_outlier(&self) -> Vec<&LeaderboardEntry> {
        let mut entries: Vec<&LeaderboardEntry> =
            self.comparative.cross_channel_leaderboard.iter().collect();
        entries.sort_by(|a, b| b.outlier_score.total_cmp(&a.outlier_score));
        entries
    }
}
