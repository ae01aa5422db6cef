//! 复制规划
//!
//! 远端的页复制是"插在源页之后"。按 N-1 到 0 的逆序逐个复制，
//! 每个新页都紧跟在模板页后面，最终顺序恰好是 1..N。
//! 复制完成后模板页本身由收尾批次删除（N = 0 时同样删除）。

use std::time::Duration;

use tracing::{debug, info};

use crate::assembly::mapping::IdentifierMapping;
use crate::assembly::retry::RetryPolicy;
use crate::error::AppResult;
use crate::template::{AnchorSet, SectionKind};
use crate::transport::DocumentTransport;

/// 一次复制请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationRequest {
    /// 对应的数据条目下标（从 0 开始）
    pub item_index: usize,
    /// 实例标签，如 "c2"、"i0"
    pub suffix: String,
}

/// 某个可复制幻灯片的复制计划
#[derive(Debug, Clone)]
pub struct DuplicationPlan<'a> {
    pub anchors: &'a AnchorSet,
    /// 按发出顺序排列（下标递减）
    pub requests: Vec<DuplicationRequest>,
}

impl DuplicationPlan<'_> {
    pub fn count(&self) -> usize {
        self.requests.len()
    }

    /// 复制完成后需要删除的模板页
    pub fn template_section(&self) -> &str {
        &self.anchors.section_id
    }
}

/// 复制出来的实例
#[derive(Debug, Clone)]
pub struct DuplicatedInstance {
    pub item_index: usize,
    pub mapping: IdentifierMapping,
}

/// 复制规划器
pub struct DuplicationPlanner;

impl DuplicationPlanner {
    /// 为 `count` 个数据条目生成复制计划
    pub fn plan(anchors: &AnchorSet, count: usize) -> DuplicationPlan<'_> {
        let tag = instance_tag(anchors.kind);
        let requests = (0..count)
            .rev()
            .map(|item_index| DuplicationRequest {
                item_index,
                suffix: format!("{tag}{item_index}"),
            })
            .collect();
        DuplicationPlan { anchors, requests }
    }

    /// 逐个执行复制（每次一个往返），返回按数据顺序排列的实例
    ///
    /// 每个返回的映射都要覆盖整个锚点集，否则视为致命错误。
    pub async fn execute<T>(
        plan: &DuplicationPlan<'_>,
        transport: &T,
        document_id: &str,
        policy: &RetryPolicy,
        retry_log: &mut Vec<Duration>,
    ) -> AppResult<Vec<DuplicatedInstance>>
    where
        T: DocumentTransport + ?Sized,
    {
        let anchors = plan.anchors;
        let mut instances = Vec::with_capacity(plan.count());

        for request in &plan.requests {
            let suffix = request.suffix.as_str();
            let mapping = policy
                .run("duplicate_section", retry_log, move || {
                    transport.duplicate_section(document_id, anchors, suffix)
                })
                .await?;
            mapping.ensure_covers(anchors)?;

            info!(
                "📄 复制 {} -> {} (条目 {})",
                anchors.section_id,
                mapping.section,
                request.item_index + 1
            );
            debug!("实例 {} 映射了 {} 个元素", suffix, mapping.len());

            instances.push(DuplicatedInstance {
                item_index: request.item_index,
                mapping,
            });
        }

        instances.sort_by_key(|instance| instance.item_index);
        Ok(instances)
    }
}

fn instance_tag(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Competitor => "c",
        SectionKind::Idea => "i",
        _ => "s",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::AnchorRegistry;

    /// 模拟"插在源页之后"的文档顺序
    fn apply_insert_after_source(plan: &DuplicationPlan<'_>) -> Vec<String> {
        let mut pages = vec![plan.template_section().to_string()];
        for request in &plan.requests {
            let pos = pages
                .iter()
                .position(|p| p == plan.template_section())
                .unwrap();
            pages.insert(pos + 1, request.suffix.clone());
        }
        pages.retain(|p| p != plan.template_section());
        pages
    }

    #[test]
    fn test_plan_issues_in_reverse() {
        let registry = AnchorRegistry::standard();
        let anchors = registry.anchors_for(SectionKind::Competitor).unwrap();
        let plan = DuplicationPlanner::plan(anchors, 4);

        let order: Vec<usize> = plan.requests.iter().map(|r| r.item_index).collect();
        assert_eq!(order, vec![3, 2, 1, 0]);
        assert_eq!(plan.requests[0].suffix, "c3");
        assert_eq!(plan.template_section(), "tmpl_competitor");
    }

    #[test]
    fn test_reverse_issue_yields_ascending_document_order() {
        let registry = AnchorRegistry::standard();
        let anchors = registry.anchors_for(SectionKind::Idea).unwrap();
        let plan = DuplicationPlanner::plan(anchors, 5);

        assert_eq!(
            apply_insert_after_source(&plan),
            vec!["i0", "i1", "i2", "i3", "i4"]
        );
    }

    #[test]
    fn test_empty_plan() {
        let registry = AnchorRegistry::standard();
        let anchors = registry.anchors_for(SectionKind::Competitor).unwrap();
        let plan = DuplicationPlanner::plan(anchors, 0);

        assert_eq!(plan.count(), 0);
        assert!(apply_insert_after_source(&plan).is_empty());
    }
}
