//! 锚点注册表
//!
//! 描述模板中每一页幻灯片及其可寻址元素的固定 ID。
//! 模板布局的任何变化只需要改这里。

use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult, RegistryError};

/// 视频行数（每个频道页固定五行）
pub const VIDEO_ROWS: usize = 5;
/// 视频标题槽位的字符预算
pub const VIDEO_TITLE_BUDGET: usize = 50;
/// 频道名槽位的字符预算
pub const CHANNEL_NAME_BUDGET: usize = 40;
/// 创意标题槽位的字符预算
pub const IDEA_TITLE_BUDGET: usize = 70;
/// 标题变体槽位的字符预算（包含 "1. " 前缀）
pub const TITLE_VARIATION_BUDGET: usize = 90;

/// 幻灯片类型（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Title,
    /// 主频道（单实例）
    OwnChannel,
    /// 竞品频道（每个竞品复制一份）
    Competitor,
    Comparative,
    /// 视频创意（每个创意复制一份）
    Idea,
    Takeaways,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Title,
        SectionKind::OwnChannel,
        SectionKind::Competitor,
        SectionKind::Comparative,
        SectionKind::Idea,
        SectionKind::Takeaways,
    ];

    /// 是否按数据条目复制
    pub fn is_dynamic(self) -> bool {
        matches!(self, SectionKind::Competitor | SectionKind::Idea)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Title => "title",
            SectionKind::OwnChannel => "self",
            SectionKind::Competitor => "competitor",
            SectionKind::Comparative => "comparative",
            SectionKind::Idea => "idea",
            SectionKind::Takeaways => "takeaways",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SectionKind::Title),
            "self" | "channel" => Ok(SectionKind::OwnChannel),
            "competitor" => Ok(SectionKind::Competitor),
            "comparative" => Ok(SectionKind::Comparative),
            "idea" => Ok(SectionKind::Idea),
            "takeaways" => Ok(SectionKind::Takeaways),
            other => Err(AppError::unknown_section_kind(other)),
        }
    }
}

/// 幻灯片内的一个元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAnchor {
    /// 元素在本页内的名字，如 "name"、"v3_title"
    pub name: String,
    /// 模板中的对象 ID
    pub object_id: String,
    /// 定宽槽位的字符预算
    pub budget: Option<usize>,
    /// 模板里带占位文字、未绑定时需要清空
    pub placeholder: bool,
}

impl ElementAnchor {
    fn fixed(prefix: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            object_id: format!("{prefix}_{name}"),
            name,
            budget: None,
            placeholder: false,
        }
    }

    fn slot(prefix: &str, name: impl Into<String>) -> Self {
        Self {
            placeholder: true,
            ..Self::fixed(prefix, name)
        }
    }

    fn budgeted(prefix: &str, name: impl Into<String>, budget: usize) -> Self {
        Self {
            budget: Some(budget),
            ..Self::slot(prefix, name)
        }
    }
}

/// 一页模板幻灯片的锚点集
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSet {
    pub kind: SectionKind,
    /// 幻灯片（页）ID
    pub section_id: String,
    pub elements: Vec<ElementAnchor>,
}

impl AnchorSet {
    pub fn element(&self, name: &str) -> Result<&ElementAnchor, RegistryError> {
        self.elements
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| RegistryError::UnknownElement {
                section: self.section_id.clone(),
                element: name.to_string(),
            })
    }

    pub fn object_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.object_id.as_str())
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &ElementAnchor> {
        self.elements.iter().filter(|e| e.placeholder)
    }
}

/// 锚点注册表，每次运行加载一次
#[derive(Debug, Clone)]
pub struct AnchorRegistry {
    sets: Vec<AnchorSet>,
}

impl AnchorRegistry {
    pub fn new(sets: Vec<AnchorSet>) -> Self {
        Self { sets }
    }

    /// 标准六页模板
    pub fn standard() -> Self {
        Self::new(vec![
            title_anchors(),
            data_anchors(SectionKind::OwnChannel, "tmpl_channel", "tmpl_channel"),
            data_anchors(SectionKind::Competitor, "tmpl_competitor", "tmpl_comp"),
            comparative_anchors(),
            idea_anchors(),
            takeaways_anchors(),
        ])
    }

    /// 纯查找；注册表中没有该类型时返回 UnknownSectionKind
    pub fn anchors_for(&self, kind: SectionKind) -> AppResult<&AnchorSet> {
        self.sets
            .iter()
            .find(|s| s.kind == kind)
            .ok_or_else(|| AppError::unknown_section_kind(kind.as_str()))
    }

    /// 按名字查找（外部传入的类型名）
    pub fn anchors_for_name(&self, kind: &str) -> AppResult<&AnchorSet> {
        self.anchors_for(kind.parse()?)
    }
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// ========== 模板布局 ==========

fn title_anchors() -> AnchorSet {
    let p = "tmpl_title";
    AnchorSet {
        kind: SectionKind::Title,
        section_id: "tmpl_title".to_string(),
        elements: vec![
            ElementAnchor::fixed(p, "gradient"),
            ElementAnchor::fixed(p, "line1"),
            ElementAnchor::fixed(p, "line2"),
            ElementAnchor::fixed(p, "accent"),
            ElementAnchor::fixed(p, "subtitle"),
            ElementAnchor::slot(p, "date"),
            ElementAnchor::budgeted(p, "channel", CHANNEL_NAME_BUDGET),
            ElementAnchor::fixed(p, "footer"),
        ],
    }
}

/// 主频道页和竞品页共用同一布局，只有前缀不同
fn data_anchors(kind: SectionKind, section_id: &str, p: &str) -> AnchorSet {
    let mut elements = vec![
        ElementAnchor::fixed(p, "gradient"),
        ElementAnchor::fixed(p, "label"),
        ElementAnchor::budgeted(p, "name", CHANNEL_NAME_BUDGET),
        ElementAnchor::fixed(p, "line"),
        ElementAnchor::fixed(p, "top_header"),
    ];
    for metric in ["subscribers", "views", "videos", "engagement"] {
        elements.push(ElementAnchor::fixed(p, format!("{metric}_bg")));
        elements.push(ElementAnchor::fixed(p, format!("{metric}_accent")));
        elements.push(ElementAnchor::fixed(p, format!("{metric}_label")));
        elements.push(ElementAnchor::slot(p, format!("{metric}_value")));
    }
    for v in 1..=VIDEO_ROWS {
        elements.push(ElementAnchor::fixed(p, format!("v{v}_bg")));
        elements.push(ElementAnchor::fixed(p, format!("v{v}_rank")));
        elements.push(ElementAnchor::budgeted(p, format!("v{v}_title"), VIDEO_TITLE_BUDGET));
        elements.push(ElementAnchor::slot(p, format!("v{v}_views")));
        elements.push(ElementAnchor::slot(p, format!("v{v}_engagement")));
    }
    AnchorSet {
        kind,
        section_id: section_id.to_string(),
        elements,
    }
}

fn comparative_anchors() -> AnchorSet {
    let p = "tmpl_comp";
    AnchorSet {
        kind: SectionKind::Comparative,
        section_id: "tmpl_comparative".to_string(),
        elements: vec![
            ElementAnchor::fixed(p, "header"),
            ElementAnchor::fixed(p, "accent_line"),
            ElementAnchor::fixed(p, "overview_bg"),
            ElementAnchor::fixed(p, "overview_accent"),
            ElementAnchor::slot(p, "overview_text"),
            ElementAnchor::fixed(p, "trends_bg"),
            ElementAnchor::fixed(p, "trends_accent"),
            ElementAnchor::fixed(p, "trends_header"),
            ElementAnchor::slot(p, "trends_text"),
            ElementAnchor::fixed(p, "gaps_bg"),
            ElementAnchor::fixed(p, "gaps_accent"),
            ElementAnchor::fixed(p, "gaps_header"),
            ElementAnchor::slot(p, "gaps_text"),
            ElementAnchor::fixed(p, "top_bg"),
            ElementAnchor::fixed(p, "top_label"),
            ElementAnchor::slot(p, "top_name"),
        ],
    }
}

fn idea_anchors() -> AnchorSet {
    let p = "tmpl_idea";
    let mut elements = vec![
        ElementAnchor::fixed(p, "circle"),
        ElementAnchor::slot(p, "number"),
        ElementAnchor::fixed(p, "label"),
        ElementAnchor::budgeted(p, "title", IDEA_TITLE_BUDGET),
        ElementAnchor::fixed(p, "accent"),
        ElementAnchor::fixed(p, "titles_bg"),
        ElementAnchor::fixed(p, "titles_accent"),
        ElementAnchor::fixed(p, "titles_header"),
        ElementAnchor::fixed(p, "hooks_bg"),
        ElementAnchor::fixed(p, "hooks_accent"),
        ElementAnchor::fixed(p, "hooks_header"),
        ElementAnchor::fixed(p, "bottom_bg"),
        ElementAnchor::fixed(p, "badge_bg"),
        ElementAnchor::fixed(p, "badge"),
        ElementAnchor::slot(p, "topic"),
    ];
    for i in 1..=crate::models::content::TITLE_VARIATION_SLOTS {
        elements.push(ElementAnchor::budgeted(p, format!("tv{i}_text"), TITLE_VARIATION_BUDGET));
    }
    for i in 1..=crate::models::content::HOOK_SLOTS {
        elements.push(ElementAnchor::fixed(p, format!("hook{i}_label")));
        elements.push(ElementAnchor::slot(p, format!("hook{i}_text")));
    }
    AnchorSet {
        kind: SectionKind::Idea,
        section_id: "tmpl_idea".to_string(),
        elements,
    }
}

fn takeaways_anchors() -> AnchorSet {
    let p = "tmpl_take";
    let mut elements = vec![
        ElementAnchor::fixed(p, "gradient"),
        ElementAnchor::fixed(p, "header"),
        ElementAnchor::fixed(p, "header2"),
    ];
    for i in 1..=crate::models::content::TAKEAWAY_SLOTS {
        elements.push(ElementAnchor::fixed(p, format!("{i}_bg")));
        elements.push(ElementAnchor::fixed(p, format!("{i}_circle")));
        elements.push(ElementAnchor::fixed(p, format!("{i}_num")));
        elements.push(ElementAnchor::slot(p, format!("{i}_text")));
    }
    elements.push(ElementAnchor::fixed(p, "footer"));
    AnchorSet {
        kind: SectionKind::Takeaways,
        section_id: "tmpl_takeaways".to_string(),
        elements,
    }
}
