//! 报告装配器 - 编排层
//!
//! ## 职责
//!
//! 驱动一次完整的装配运行，并维护阶段状态机：
//!
//! ```text
//! Created → TemplateCopied → SectionsDuplicated → ContentBound → Submitted → Done
//!     任何阶段失败 → AssemblyFailure（记录失败阶段和最后完成的阶段）
//! ```
//!
//! ## 核心流程
//!
//! 1. **选择内容来源**：生成内容或兜底内容，只选一次
//! 2. **解析锚点集**：六类幻灯片的锚点集在复制模板之前一次取齐，
//!    注册表与模板不一致时不产生任何文档
//! 3. **复制模板**：失败即终止，不重试
//! 4. **复制可变页**：竞品页、创意页逐个往返，可重试
//! 5. **绑定内容**：每个单实例页 + 每个复制实例，指令汇入装配计划
//! 6. **提交收尾批次**：校验后一次提交，可重试
//! 7. **发布链接**：可选
//!
//! 失败时不删除已复制的文档，文档 ID 随失败信息一起返回。

use std::fmt;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::assembly::binder::{
    bind_channel, bind_comparative, bind_idea, bind_takeaways, bind_title,
};
use crate::assembly::{
    AssemblyPlan, BindTarget, DuplicatedInstance, DuplicationPlanner, FallbackGenerator,
    IdentifierMapping, RetryPolicy,
};
use crate::config::Config;
use crate::error::{AppError, AppResult, AssemblyFailure, BindingError};
use crate::models::analytics::AnalyticsBundle;
use crate::models::content::{ContentBundle, ContentSource, GeneratedContent};
use crate::template::{AnchorRegistry, AnchorSet, SectionKind};
use crate::transport::DocumentTransport;
use crate::utils::logging::log_stage;

/// 装配阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssemblyStage {
    Created,
    TemplateCopied,
    SectionsDuplicated,
    ContentBound,
    Submitted,
    Done,
}

impl AssemblyStage {
    /// 正常流程中的下一个阶段（Done 之后没有阶段）
    pub fn next(self) -> Self {
        match self {
            AssemblyStage::Created => AssemblyStage::TemplateCopied,
            AssemblyStage::TemplateCopied => AssemblyStage::SectionsDuplicated,
            AssemblyStage::SectionsDuplicated => AssemblyStage::ContentBound,
            AssemblyStage::ContentBound => AssemblyStage::Submitted,
            AssemblyStage::Submitted | AssemblyStage::Done => AssemblyStage::Done,
        }
    }
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 装配选项
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub template_id: String,
    pub retry: RetryPolicy,
    pub publish_link: bool,
    /// 报告日期（标题和日期行使用），默认为当天
    pub report_date: Option<NaiveDate>,
}

impl AssemblyOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            template_id: config.template_id.clone(),
            retry: RetryPolicy::from_config(config),
            publish_link: config.publish_link,
            report_date: None,
        }
    }
}

/// 装配结果
#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub document_id: String,
    pub link: String,
    pub title: String,
    pub competitor_instances: usize,
    pub idea_instances: usize,
    pub requests_submitted: usize,
    /// 本次运行中所有重试等待的时长，按发生顺序
    pub retry_delays: Vec<Duration>,
    pub content_source: &'static str,
    pub published: bool,
}

/// 一次运行的状态
struct RunState {
    last_completed: AssemblyStage,
    document_id: Option<String>,
    retry_log: Vec<Duration>,
}

impl RunState {
    fn new() -> Self {
        Self {
            last_completed: AssemblyStage::Created,
            document_id: None,
            retry_log: Vec::new(),
        }
    }

    fn complete(&mut self, stage: AssemblyStage, detail: &str) {
        log_stage(stage, detail);
        self.last_completed = stage;
    }

    fn failure(&self, source: AppError) -> AssemblyFailure {
        AssemblyFailure {
            failed_stage: self.last_completed.next(),
            last_completed: self.last_completed,
            document_id: self.document_id.clone(),
            source,
        }
    }
}

/// 复制阶段的产物
struct Duplicates {
    competitors: Vec<DuplicatedInstance>,
    ideas: Vec<DuplicatedInstance>,
}

/// 一次运行用到的全部锚点集，在复制模板之前取齐
struct TemplateAnchors<'a> {
    title: &'a AnchorSet,
    own_channel: &'a AnchorSet,
    competitor: &'a AnchorSet,
    comparative: &'a AnchorSet,
    idea: &'a AnchorSet,
    takeaways: &'a AnchorSet,
}

impl<'a> TemplateAnchors<'a> {
    fn resolve(registry: &'a AnchorRegistry) -> AppResult<Self> {
        Ok(Self {
            title: registry.anchors_for(SectionKind::Title)?,
            own_channel: registry.anchors_for(SectionKind::OwnChannel)?,
            competitor: registry.anchors_for(SectionKind::Competitor)?,
            comparative: registry.anchors_for(SectionKind::Comparative)?,
            idea: registry.anchors_for(SectionKind::Idea)?,
            takeaways: registry.anchors_for(SectionKind::Takeaways)?,
        })
    }

    fn statics(&self) -> [&'a AnchorSet; 4] {
        [self.title, self.own_channel, self.comparative, self.takeaways]
    }
}

/// 报告装配器
pub struct ReportAssembler<T: DocumentTransport> {
    transport: T,
    registry: AnchorRegistry,
    options: AssemblyOptions,
}

impl<T: DocumentTransport> ReportAssembler<T> {
    pub fn new(transport: T, options: AssemblyOptions) -> Self {
        Self::with_registry(transport, AnchorRegistry::standard(), options)
    }

    pub fn with_registry(transport: T, registry: AnchorRegistry, options: AssemblyOptions) -> Self {
        Self {
            transport,
            registry,
            options,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 执行一次完整装配
    ///
    /// # 参数
    /// - `analytics`: 分析数据（必需）
    /// - `generated`: 生成内容（可选，缺失时使用兜底内容）
    ///
    /// # 返回
    /// 成功返回文档链接等信息；失败返回失败阶段和已复制的文档 ID
    pub async fn run(
        &self,
        analytics: &AnalyticsBundle,
        generated: Option<&GeneratedContent>,
    ) -> Result<AssembledReport, AssemblyFailure> {
        let mut state = RunState::new();

        // ========== 内容来源 ==========
        let source: &dyn ContentSource = match generated {
            Some(content) => content,
            None => {
                warn!("⚠️ 没有生成内容，使用兜底内容");
                &FallbackGenerator
            }
        };
        let content = source.resolve(analytics);
        info!("💡 内容来源: {}", source.name());

        let date = self
            .options
            .report_date
            .unwrap_or_else(|| Local::now().date_naive());

        // ========== Created → TemplateCopied ==========
        // 注册表与模板不一致属于启动错误，此时还没有复制任何文档
        let anchors = TemplateAnchors::resolve(&self.registry).map_err(|e| state.failure(e))?;

        let title = report_title(&analytics.channel.channel_name, date);
        let document_id = self
            .transport
            .copy_template(&self.options.template_id, &title)
            .await
            .map_err(|e| state.failure(e.into_fatal().into()))?;
        state.document_id = Some(document_id.clone());
        state.complete(
            AssemblyStage::TemplateCopied,
            &format!("{title} ({document_id})"),
        );

        // ========== TemplateCopied → SectionsDuplicated ==========
        let mut plan = AssemblyPlan::new();
        let duplicates = self
            .duplicate_sections(
                &anchors,
                &document_id,
                analytics.competitors.len(),
                content.ideas.len(),
                &mut plan,
                &mut state.retry_log,
            )
            .await
            .map_err(|e| state.failure(e))?;
        state.complete(
            AssemblyStage::SectionsDuplicated,
            &format!(
                "竞品页 {} 个, 创意页 {} 个",
                duplicates.competitors.len(),
                duplicates.ideas.len()
            ),
        );

        // ========== SectionsDuplicated → ContentBound ==========
        bind_content(&anchors, analytics, &content, date, &duplicates, &mut plan)
            .map_err(|e| state.failure(e))?;
        state.complete(
            AssemblyStage::ContentBound,
            &format!("{} 条修改指令", plan.instructions().len()),
        );

        // ========== ContentBound → Submitted ==========
        let requests = plan.compile();
        let policy = self.options.retry;
        let transport = &self.transport;
        let batch = requests.as_slice();
        let document = document_id.as_str();
        policy
            .run("submit_batch", &mut state.retry_log, move || {
                transport.submit_batch(document, batch)
            })
            .await
            .map_err(|e| state.failure(e.into()))?;
        state.complete(
            AssemblyStage::Submitted,
            &format!("收尾批次 {} 个请求", requests.len()),
        );

        // ========== Submitted → Done ==========
        if self.options.publish_link {
            policy
                .run("publish", &mut state.retry_log, move || {
                    transport.publish(document)
                })
                .await
                .map_err(|e| state.failure(e.into()))?;
        }
        let link = self.transport.document_link(&document_id);
        state.complete(AssemblyStage::Done, &link);

        Ok(AssembledReport {
            document_id,
            link,
            title,
            competitor_instances: duplicates.competitors.len(),
            idea_instances: duplicates.ideas.len(),
            requests_submitted: requests.len(),
            retry_delays: state.retry_log,
            content_source: source.name(),
            published: self.options.publish_link,
        })
    }

    /// 复制竞品页和创意页，并把所有可寻址元素登记到计划中
    async fn duplicate_sections(
        &self,
        anchors: &TemplateAnchors<'_>,
        document_id: &str,
        competitor_count: usize,
        idea_count: usize,
        plan: &mut AssemblyPlan,
        retry_log: &mut Vec<Duration>,
    ) -> AppResult<Duplicates> {
        for set in anchors.statics() {
            plan.register_static(set)?;
        }

        plan.begin_duplication(&anchors.competitor.section_id);
        plan.begin_duplication(&anchors.idea.section_id);

        let competitor_plan = DuplicationPlanner::plan(anchors.competitor, competitor_count);
        let competitors = DuplicationPlanner::execute(
            &competitor_plan,
            &self.transport,
            document_id,
            &self.options.retry,
            retry_log,
        )
        .await?;
        plan.finish_duplication(competitor_plan.template_section());

        let idea_plan = DuplicationPlanner::plan(anchors.idea, idea_count);
        let ideas = DuplicationPlanner::execute(
            &idea_plan,
            &self.transport,
            document_id,
            &self.options.retry,
            retry_log,
        )
        .await?;
        plan.finish_duplication(idea_plan.template_section());

        for instance in &competitors {
            plan.register_instance(anchors.competitor, &instance.mapping)?;
        }
        for instance in &ideas {
            plan.register_instance(anchors.idea, &instance.mapping)?;
        }

        // 模板页在所有复制完成之后才能删除
        plan.delete_section(competitor_plan.template_section())?;
        plan.delete_section(idea_plan.template_section())?;

        Ok(Duplicates { competitors, ideas })
    }
}

/// 为每个单实例页和复制实例生成修改指令，并做引用完整性检查
fn bind_content(
    anchors: &TemplateAnchors<'_>,
    analytics: &AnalyticsBundle,
    content: &ContentBundle,
    date: NaiveDate,
    duplicates: &Duplicates,
    plan: &mut AssemblyPlan,
) -> AppResult<()> {
    plan.extend(bind_title(
        BindTarget::Static(anchors.title),
        &date.format("%B %Y").to_string(),
        analytics.days,
        &analytics.channel.channel_name,
    )?);

    plan.extend(bind_channel(
        BindTarget::Static(anchors.own_channel),
        &analytics.channel,
    )?);

    for instance in &duplicates.competitors {
        let summary = analytics
            .competitors
            .get(instance.item_index)
            .ok_or_else(|| missing_item(&instance.mapping))?;
        debug!("绑定竞品 {} -> {}", summary.channel_name, instance.mapping.section);
        plan.extend(bind_channel(
            BindTarget::Instance {
                anchors: anchors.competitor,
                mapping: &instance.mapping,
            },
            summary,
        )?);
    }

    plan.extend(bind_comparative(
        BindTarget::Static(anchors.comparative),
        analytics.comparative.top_performer.as_deref(),
        content,
    )?);

    for instance in &duplicates.ideas {
        let idea = content
            .ideas
            .get(instance.item_index)
            .ok_or_else(|| missing_item(&instance.mapping))?;
        plan.extend(bind_idea(
            BindTarget::Instance {
                anchors: anchors.idea,
                mapping: &instance.mapping,
            },
            idea,
            instance.item_index + 1,
        )?);
    }

    plan.extend(bind_takeaways(
        BindTarget::Static(anchors.takeaways),
        &content.takeaways,
    )?);

    plan.validate()
}

fn missing_item(mapping: &IdentifierMapping) -> AppError {
    BindingError::MissingItem {
        instance: mapping.instance.clone(),
    }
    .into()
}

/// 报告文档标题
pub fn report_title(channel_name: &str, date: NaiveDate) -> String {
    let month = date.format("%B %Y");
    if channel_name.is_empty() {
        format!("YouTube Analytics Report — {month}")
    } else {
        format!("{channel_name} YouTube Analytics Report — {month}")
    }
}
