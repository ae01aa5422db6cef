//! 兜底内容生成
//!
//! 没有生成内容时，直接从分析数据里的排名推导可展示的文字。
//! 输出完全确定（不读当前时间，不依赖哈希顺序），且每个槽位都非空。

use tracing::debug;

use crate::assembly::format::{format_count, format_outlier, format_percent, truncate};
use crate::models::analytics::{AnalyticsBundle, ChannelSummary, LeaderboardEntry};
use crate::models::content::{
    ContentBundle, ContentSource, VideoIdea, BULLET_SLOTS, IDEA_SLOTS, TAKEAWAY_SLOTS,
};

/// 排名列表为空时的中性要点
pub const INSUFFICIENT_DATA: &str = "Insufficient data to determine this trend";
/// 没有发现差距时的要点
pub const NO_GAPS: &str =
    "No significant content gaps identified, channel is competitive across key metrics";

/// 兜底内容生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl ContentSource for FallbackGenerator {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn resolve(&self, analytics: &AnalyticsBundle) -> ContentBundle {
        let leaderboard = analytics.leaderboard_by_outlier();
        debug!(
            "兜底内容: {} 个竞品, 排行榜 {} 条",
            analytics.competitors.len(),
            leaderboard.len()
        );

        ContentBundle {
            overview: overview(analytics, &leaderboard),
            key_trends: trends(analytics, &leaderboard),
            content_gaps: gaps(analytics),
            top_performer_note: top_performer_note(analytics),
            ideas: ideas(&leaderboard),
            takeaways: takeaways(analytics, &leaderboard),
        }
        .normalized()
    }
}

fn channel_name(analytics: &AnalyticsBundle) -> &str {
    if analytics.channel.channel_name.is_empty() {
        "Your channel"
    } else {
        &analytics.channel.channel_name
    }
}

fn top_performer(analytics: &AnalyticsBundle) -> &str {
    analytics
        .comparative
        .top_performer
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("N/A")
}

fn overview(analytics: &AnalyticsBundle, leaderboard: &[&LeaderboardEntry]) -> String {
    let name = channel_name(analytics);
    let mut parts = vec![format!(
        "Analysis of {name} against {} competitors.",
        analytics.competitors.len()
    )];

    match (
        analytics.views_rank_of(name),
        analytics.engagement_rank_of(name),
    ) {
        (Some(views), Some(engagement)) => parts.push(format!(
            "{name} ranks #{views} in total period views and #{engagement} in average engagement."
        )),
        (Some(views), None) => parts.push(format!("{name} ranks #{views} in total period views.")),
        (None, Some(engagement)) => {
            parts.push(format!("{name} ranks #{engagement} in average engagement."))
        }
        (None, None) => {}
    }

    parts.push(format!("Top performer by views: {}.", top_performer(analytics)));

    if let Some(top) = leaderboard.first() {
        parts.push(format!(
            "Highest outlier video: \"{}\" by {} ({} median, {} views).",
            truncate(&top.title, 40),
            top.channel_name,
            format_outlier(top.outlier_score),
            format_count(top.views)
        ));
    }

    parts.join(" ")
}

fn trends(analytics: &AnalyticsBundle, leaderboard: &[&LeaderboardEntry]) -> Vec<String> {
    let comparative = &analytics.comparative;
    let mut trends = Vec::with_capacity(BULLET_SLOTS);

    match comparative.views_ranking.as_slice() {
        [top, _, ..] => trends.push(format!(
            "{} leads in views with {} total period views",
            top.channel_name,
            format_count(top.total_period_views)
        )),
        _ => trends.push(INSUFFICIENT_DATA.to_string()),
    }

    match comparative.engagement_ranking.first() {
        Some(top) => trends.push(format!(
            "{} has highest engagement at {}",
            top.channel_name,
            format_percent(top.avg_engagement)
        )),
        None => trends.push(INSUFFICIENT_DATA.to_string()),
    }

    // 按出现顺序去重
    let mut channels: Vec<&str> = Vec::new();
    for entry in leaderboard.iter().take(IDEA_SLOTS) {
        if !channels.contains(&entry.channel_name.as_str()) {
            channels.push(&entry.channel_name);
        }
    }
    match channels.as_slice() {
        [] => trends.push(INSUFFICIENT_DATA.to_string()),
        [only] => trends.push(format!("{only} dominates the top outlier videos")),
        many => trends.push(format!(
            "Top outlier videos spread across {}",
            many.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        )),
    }

    trends
}

fn gaps(analytics: &AnalyticsBundle) -> Vec<String> {
    let channel = &analytics.channel;
    let mut gaps = Vec::with_capacity(BULLET_SLOTS);

    let names = |pred: &dyn Fn(&ChannelSummary) -> bool| -> Option<String> {
        let matched: Vec<&str> = analytics
            .competitors
            .iter()
            .filter(|c| pred(c))
            .take(2)
            .map(|c| c.channel_name.as_str())
            .collect();
        (!matched.is_empty()).then(|| matched.join(", "))
    };

    if let Some(names) = names(&|c| c.upload_frequency > channel.upload_frequency * 1.5) {
        gaps.push(format!(
            "Upload frequency gap: {names} publish significantly more often"
        ));
    }
    if let Some(names) = names(&|c| c.avg_engagement > channel.avg_engagement * 1.2) {
        gaps.push(format!(
            "Engagement gap: {names} achieve higher engagement rates"
        ));
    }
    if let Some(names) =
        names(&|c| c.total_period_views as f64 > channel.total_period_views as f64 * 1.5)
    {
        gaps.push(format!(
            "Views gap: {names} generate significantly more total views"
        ));
    }

    if gaps.is_empty() {
        gaps.push(NO_GAPS.to_string());
    }
    gaps
}

fn top_performer_note(analytics: &AnalyticsBundle) -> String {
    let Some(name) = analytics.comparative.top_performer.as_deref() else {
        return String::new();
    };
    match analytics.find_channel(name) {
        Some(top) => format!(
            "{} avg views/video across {} videos",
            format_count(top.avg_views_per_video()),
            top.video_count
        ),
        None => String::new(),
    }
}

fn ideas(leaderboard: &[&LeaderboardEntry]) -> Vec<VideoIdea> {
    let mut ideas: Vec<VideoIdea> = leaderboard
        .iter()
        .take(IDEA_SLOTS)
        .map(|video| idea_from(video))
        .collect();

    while ideas.len() < IDEA_SLOTS {
        ideas.push(pending_idea(ideas.len() + 1));
    }
    ideas
}

fn idea_from(video: &LeaderboardEntry) -> VideoIdea {
    let channel = &video.channel_name;
    let outlier = format_outlier(video.outlier_score);
    VideoIdea {
        title: format!("Inspired by: {}", truncate(&video.title, 45)),
        title_variations: vec![
            format!("Variation on: {}", truncate(&video.title, 40)),
            format!("Our take on {channel}'s top video"),
            format!("Why \"{}\" went viral", truncate(&video.title, 30)),
            format!("Response to {channel}: {}", truncate(&video.title, 25)),
            format!("Deep dive: {}", truncate(&video.title, 35)),
        ],
        hooks: vec![
            format!(
                "This video by {channel} got {} views and scored {outlier}. Here's what made it work.",
                format_count(video.views)
            ),
            format!(
                "With {} engagement, this topic clearly resonates with the audience. Here's how to put your own spin on it.",
                format_percent(video.engagement)
            ),
        ],
        topic: format!("Based on {channel}'s outlier ({outlier})"),
    }
}

fn pending_idea(number: usize) -> VideoIdea {
    VideoIdea {
        title: format!("Video Idea #{number}"),
        title_variations: vec![
            "Generated ideas will appear here once insights are available".to_string(),
        ],
        hooks: vec!["Hook content will be generated from the insights analysis.".to_string()],
        topic: "Pending insights analysis".to_string(),
    }
}

fn takeaways(analytics: &AnalyticsBundle, leaderboard: &[&LeaderboardEntry]) -> Vec<String> {
    let name = channel_name(analytics);
    let ranking = &analytics.comparative.views_ranking;
    let mut takeaways = Vec::with_capacity(TAKEAWAY_SLOTS);

    let rank = analytics.views_rank_of(name).unwrap_or(ranking.len());
    takeaways.push(format!(
        "{name} ranks #{rank} of {} channels in total period views. Top performer is {}.",
        ranking.len(),
        top_performer(analytics)
    ));

    if let Some(top) = leaderboard.first() {
        takeaways.push(format!(
            "The highest-performing video across all channels is \"{}\" by {} with {} median performance.",
            truncate(&top.title, 40),
            top.channel_name,
            format_outlier(top.outlier_score)
        ));
    }

    takeaways.push(
        "Provide generated insights for personalized content strategy recommendations and data-driven video ideas."
            .to_string(),
    );
    takeaways
}
