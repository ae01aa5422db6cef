//! 标识映射
//!
//! 每个复制出来的幻灯片实例拥有自己的映射（模板 ID -> 新 ID），
//! 只传给该实例的绑定调用，不进入任何共享状态。

use std::collections::BTreeMap;

use crate::error::{AppResult, BindingError};
use crate::template::{AnchorSet, ElementAnchor, SectionKind};

/// 一次复制得到的源 ID 到新 ID 的映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierMapping {
    pub kind: SectionKind,
    /// 实例标签（如 "c0"、"i3"），只用于日志和错误信息
    pub instance: String,
    pub source_section: String,
    pub section: String,
    elements: BTreeMap<String, String>,
}

impl IdentifierMapping {
    pub fn new(
        kind: SectionKind,
        instance: impl Into<String>,
        source_section: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            instance: instance.into(),
            source_section: source_section.into(),
            section: section.into(),
            elements: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, source: impl Into<String>, destination: impl Into<String>) {
        self.elements.insert(source.into(), destination.into());
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.elements.get(source).map(String::as_str)
    }

    /// 本实例的所有新 ID（含页 ID）
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.section.as_str()).chain(self.elements.values().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 检查映射是否覆盖了锚点集中的每个元素
    pub fn ensure_covers(&self, anchors: &AnchorSet) -> AppResult<()> {
        let missing = anchors
            .object_ids()
            .filter(|id| !self.elements.contains_key(*id))
            .count();
        if missing > 0 {
            return Err(BindingError::IncompleteMapping {
                section: anchors.section_id.clone(),
                missing,
            }
            .into());
        }
        Ok(())
    }
}

/// 解析后的元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedElement {
    pub object_id: String,
    pub budget: Option<usize>,
}

/// 绑定目标：单实例幻灯片直接用静态锚点，复制实例必须经过映射
#[derive(Debug, Clone, Copy)]
pub enum BindTarget<'a> {
    Static(&'a AnchorSet),
    Instance {
        anchors: &'a AnchorSet,
        mapping: &'a IdentifierMapping,
    },
}

impl<'a> BindTarget<'a> {
    pub fn anchors(&self) -> &'a AnchorSet {
        match self {
            BindTarget::Static(anchors) => anchors,
            BindTarget::Instance { anchors, .. } => anchors,
        }
    }

    /// 按元素名解析出本实例中的对象 ID
    pub fn resolve(&self, name: &str) -> AppResult<ResolvedElement> {
        let anchor = self.anchors().element(name)?;
        let object_id = self.resolve_anchor(anchor)?;
        Ok(ResolvedElement {
            object_id,
            budget: anchor.budget,
        })
    }

    pub fn resolve_anchor(&self, anchor: &ElementAnchor) -> AppResult<String> {
        match self {
            BindTarget::Static(anchors) => {
                if anchors.kind.is_dynamic() {
                    return Err(BindingError::RawTemplateTarget {
                        section: anchors.section_id.clone(),
                    }
                    .into());
                }
                Ok(anchor.object_id.clone())
            }
            BindTarget::Instance { mapping, .. } => mapping
                .get(&anchor.object_id)
                .map(str::to_string)
                .ok_or_else(|| {
                    BindingError::MissingMapping {
                        instance: mapping.instance.clone(),
                        object_id: anchor.object_id.clone(),
                    }
                    .into()
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::template::AnchorRegistry;

    fn suffixed(anchors: &AnchorSet, suffix: &str) -> IdentifierMapping {
        let mut mapping = IdentifierMapping::new(
            anchors.kind,
            suffix,
            &anchors.section_id,
            format!("{}_{suffix}", anchors.section_id),
        );
        for id in anchors.object_ids() {
            mapping.insert(id, format!("{id}_{suffix}"));
        }
        mapping
    }

    #[test]
    fn test_instance_resolves_through_mapping() {
        let registry = AnchorRegistry::standard();
        let anchors = registry.anchors_for(SectionKind::Competitor).unwrap();
        let mapping = suffixed(anchors, "c2");

        let target = BindTarget::Instance {
            anchors,
            mapping: &mapping,
        };
        let resolved = target.resolve("v1_title").unwrap();
        assert_eq!(resolved.object_id, "tmpl_comp_v1_title_c2");
        assert!(resolved.budget.is_some());
    }

    #[test]
    fn test_static_target_rejects_dynamic_section() {
        let registry = AnchorRegistry::standard();
        let anchors = registry.anchors_for(SectionKind::Idea).unwrap();
        let err = BindTarget::Static(anchors).resolve("title").unwrap_err();
        assert!(matches!(
            err,
            AppError::Binding(BindingError::RawTemplateTarget { .. })
        ));
    }

    #[test]
    fn test_incomplete_mapping_detected() {
        let registry = AnchorRegistry::standard();
        let anchors = registry.anchors_for(SectionKind::Idea).unwrap();
        let mut mapping =
            IdentifierMapping::new(SectionKind::Idea, "i0", &anchors.section_id, "new_page");
        mapping.insert("tmpl_idea_title", "x");

        let err = mapping.ensure_covers(anchors).unwrap_err();
        assert!(matches!(
            err,
            AppError::Binding(BindingError::IncompleteMapping { missing, .. }) if missing == anchors.elements.len() - 1
        ));

        let target = BindTarget::Instance {
            anchors,
            mapping: &mapping,
        };
        assert!(target.resolve("topic").is_err());
    }
}
