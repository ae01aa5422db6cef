//! 内容绑定 - 业务能力层
//!
//! 纯函数：一个数据条目 + 它的绑定目标 -> 元素级修改指令列表。
//! 未填充的可选字段直接省略，不生成空文本指令。

use crate::assembly::format::{
    format_count, format_optional_count, format_percent, truncate, utf16_len,
};
use crate::assembly::mapping::BindTarget;
use crate::error::AppResult;
use crate::models::analytics::ChannelSummary;
use crate::models::content::{ContentBundle, VideoIdea, HOOK_SLOTS, TITLE_VARIATION_SLOTS};
use crate::template::anchors::VIDEO_ROWS;
use crate::template::style::{
    RunStyle, TextStyle, BULLET_COLORS, FONT_BODY, GREEN, LIGHT_GRAY, WHITE,
};

/// 空视频行的标题占位
pub const EMPTY_ROW: &str = "—";
/// 要点列表为空时的文字
pub const NO_DATA: &str = "No data available";

/// 文本中的一段（UTF-16 下标，左闭右开）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyledRun {
    pub start: usize,
    pub end: usize,
    pub style: RunStyle,
}

/// 单个元素的修改指令
///
/// 不携带幻灯片上下文：目标 ID 必须事先经过正确的映射解析。
#[derive(Debug, Clone, PartialEq)]
pub struct MutationInstruction {
    pub target: String,
    pub text: String,
    pub style: TextStyle,
    pub runs: Vec<StyledRun>,
}

/// 逐个元素收集指令
struct InstructionList<'a> {
    target: BindTarget<'a>,
    out: Vec<MutationInstruction>,
}

impl<'a> InstructionList<'a> {
    fn new(target: BindTarget<'a>) -> Self {
        Self {
            target,
            out: Vec::new(),
        }
    }

    fn text(&mut self, name: &str, text: &str, style: TextStyle) -> AppResult<()> {
        self.styled(name, text, style, Vec::new())
    }

    fn styled(
        &mut self,
        name: &str,
        text: &str,
        style: TextStyle,
        runs: Vec<StyledRun>,
    ) -> AppResult<()> {
        let element = self.target.resolve(name)?;
        if text.trim().is_empty() {
            return Ok(());
        }
        let text = match element.budget {
            Some(budget) => truncate(text, budget),
            None => text.to_string(),
        };
        self.out.push(MutationInstruction {
            target: element.object_id,
            text,
            style,
            runs,
        });
        Ok(())
    }

    fn finish(self) -> Vec<MutationInstruction> {
        self.out
    }
}

/// 标题页：日期行 + 主频道名
pub fn bind_title(
    target: BindTarget<'_>,
    date_label: &str,
    days: u32,
    channel_name: &str,
) -> AppResult<Vec<MutationInstruction>> {
    let mut list = InstructionList::new(target);
    list.text(
        "date",
        &format!("{date_label}  |  {days}-Day Analysis Window"),
        TextStyle::body(16, LIGHT_GRAY),
    )?;
    list.text("channel", channel_name, TextStyle::display(24, WHITE))?;
    Ok(list.finish())
}

/// 频道页（主频道和竞品共用）
pub fn bind_channel(
    target: BindTarget<'_>,
    summary: &ChannelSummary,
) -> AppResult<Vec<MutationInstruction>> {
    let mut list = InstructionList::new(target);
    let metric = TextStyle::mono(14, WHITE);

    list.text("name", &summary.channel_name, TextStyle::display(32, WHITE))?;
    list.text(
        "subscribers_value",
        &format_optional_count(summary.subscriber_count),
        metric,
    )?;
    list.text("views_value", &format_count(summary.total_period_views), metric)?;
    list.text("videos_value", &format_count(summary.video_count), metric)?;
    list.text(
        "engagement_value",
        &format_percent(summary.avg_engagement),
        metric,
    )?;

    for v in 1..=VIDEO_ROWS {
        match summary.top_videos.get(v - 1) {
            Some(video) => {
                list.text(&format!("v{v}_title"), &video.title, TextStyle::body(11, WHITE))?;
                list.text(
                    &format!("v{v}_views"),
                    &format_count(video.views),
                    TextStyle::mono(11, GREEN),
                )?;
                list.text(
                    &format!("v{v}_engagement"),
                    &format_percent(video.engagement),
                    TextStyle::mono(11, LIGHT_GRAY).bold(false),
                )?;
            }
            None => {
                list.text(&format!("v{v}_title"), EMPTY_ROW, TextStyle::body(11, LIGHT_GRAY))?;
            }
        }
    }

    Ok(list.finish())
}

/// 对比分析页
pub fn bind_comparative(
    target: BindTarget<'_>,
    top_performer: Option<&str>,
    content: &ContentBundle,
) -> AppResult<Vec<MutationInstruction>> {
    let mut list = InstructionList::new(target);

    list.text("overview_text", &content.overview, TextStyle::body(10, WHITE))?;

    let (trends, trend_runs) = bullet_text(&content.key_trends);
    list.styled("trends_text", &trends, TextStyle::body(9, WHITE), trend_runs)?;

    let (gaps, gap_runs) = bullet_text(&content.content_gaps);
    list.styled("gaps_text", &gaps, TextStyle::body(9, WHITE), gap_runs)?;

    let name = top_performer.filter(|n| !n.is_empty()).unwrap_or("N/A");
    let (text, runs) = top_performer_text(name, &content.top_performer_note);
    list.styled("top_name", &text, TextStyle::display(18, WHITE), runs)?;

    Ok(list.finish())
}

/// 单个视频创意页（编号从 1 开始）
pub fn bind_idea(
    target: BindTarget<'_>,
    idea: &VideoIdea,
    number: usize,
) -> AppResult<Vec<MutationInstruction>> {
    let mut list = InstructionList::new(target);

    list.text("number", &number.to_string(), TextStyle::display(18, WHITE))?;
    let title = if idea.title.trim().is_empty() {
        format!("Video Idea #{number}")
    } else {
        idea.title.clone()
    };
    list.text("title", &title, TextStyle::display(24, WHITE))?;

    for (i, variation) in idea
        .title_variations
        .iter()
        .take(TITLE_VARIATION_SLOTS)
        .enumerate()
        .filter(|(_, v)| !v.trim().is_empty())
    {
        list.text(
            &format!("tv{}_text", i + 1),
            &format!("{}. {variation}", i + 1),
            TextStyle::body(11, WHITE),
        )?;
    }

    for (i, hook) in idea.hooks.iter().take(HOOK_SLOTS).enumerate() {
        list.text(&format!("hook{}_text", i + 1), hook, TextStyle::body(9, WHITE))?;
    }

    if !idea.topic.trim().is_empty() {
        list.text("topic", &format!("Topic: {}", idea.topic), TextStyle::body(9, WHITE))?;
    }

    Ok(list.finish())
}

/// 结论页
pub fn bind_takeaways(
    target: BindTarget<'_>,
    takeaways: &[String],
) -> AppResult<Vec<MutationInstruction>> {
    let mut list = InstructionList::new(target);
    for (i, takeaway) in takeaways
        .iter()
        .take(crate::models::content::TAKEAWAY_SLOTS)
        .enumerate()
    {
        list.text(&format!("{}_text", i + 1), takeaway, TextStyle::body(11, WHITE))?;
    }
    Ok(list.finish())
}

/// "• a\n\n• b\n\n• c"，每个圆点单独着色
fn bullet_text(items: &[String]) -> (String, Vec<StyledRun>) {
    let no_data = [NO_DATA.to_string()];
    let items: &[String] = if items.is_empty() { &no_data } else { items };

    let mut text = String::new();
    let mut runs = Vec::new();
    for (i, item) in items.iter().take(BULLET_COLORS.len()).enumerate() {
        if i > 0 {
            text.push_str("\n\n");
        }
        let start = utf16_len(&text);
        text.push_str("• ");
        text.push_str(item);
        runs.push(StyledRun {
            start,
            end: start + 1,
            style: RunStyle {
                color: BULLET_COLORS[i],
                bold: true,
                font_size: None,
                font_family: None,
            },
        });
    }
    (text, runs)
}

/// "名字\n备注"：名字用标题样式，备注用小号灰色正文
fn top_performer_text(name: &str, note: &str) -> (String, Vec<StyledRun>) {
    if note.trim().is_empty() {
        return (name.to_string(), Vec::new());
    }
    let text = format!("{name}\n{note}");
    let name_end = utf16_len(name);
    let runs = vec![
        StyledRun {
            start: 0,
            end: name_end,
            style: TextStyle::display(18, WHITE).into(),
        },
        StyledRun {
            start: name_end + 1,
            end: utf16_len(&text),
            style: RunStyle {
                color: LIGHT_GRAY,
                bold: false,
                font_size: Some(9),
                font_family: Some(FONT_BODY),
            },
        },
    ];
    (text, runs)
}
