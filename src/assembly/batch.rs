//! 收尾批次
//!
//! 汇总所有绑定指令和结构性操作（清空未绑定的占位符、删除模板页），
//! 提交前先做引用完整性检查，然后编译成一次批量更新。

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::assembly::binder::MutationInstruction;
use crate::assembly::mapping::IdentifierMapping;
use crate::error::{AppResult, PlanError};
use crate::template::AnchorSet;
use crate::transport::{BatchRequest, TextRange};

/// 一次运行的装配计划，由编排器独占
#[derive(Debug, Default)]
pub struct AssemblyPlan {
    /// 可寻址的目标 ID -> 所属页（静态页或复制实例）
    owners: HashMap<String, String>,
    /// 需要在未绑定时清空的元素，按注册顺序
    placeholders: Vec<String>,
    instructions: Vec<MutationInstruction>,
    deletions: Vec<String>,
    /// 尚未完成复制的模板页
    pending_duplication: BTreeSet<String>,
}

impl AssemblyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个单实例页的静态锚点
    pub fn register_static(&mut self, anchors: &AnchorSet) -> AppResult<()> {
        for id in anchors.object_ids() {
            self.claim(id, &anchors.section_id)?;
        }
        self.placeholders
            .extend(anchors.placeholders().map(|e| e.object_id.clone()));
        Ok(())
    }

    /// 登记一个复制实例的映射
    pub fn register_instance(
        &mut self,
        anchors: &AnchorSet,
        mapping: &IdentifierMapping,
    ) -> AppResult<()> {
        for id in mapping.destinations() {
            self.claim(id, &mapping.instance)?;
        }
        self.placeholders.extend(
            anchors
                .placeholders()
                .filter_map(|e| mapping.get(&e.object_id))
                .map(str::to_string),
        );
        Ok(())
    }

    fn claim(&mut self, target: &str, owner: &str) -> AppResult<()> {
        if let Some(existing) = self.owners.get(target) {
            if existing != owner {
                return Err(PlanError::SharedDestination {
                    target: target.to_string(),
                }
                .into());
            }
        }
        self.owners.insert(target.to_string(), owner.to_string());
        Ok(())
    }

    /// 标记某个模板页开始复制；完成前不能删除
    pub fn begin_duplication(&mut self, section_id: &str) {
        self.pending_duplication.insert(section_id.to_string());
    }

    pub fn finish_duplication(&mut self, section_id: &str) {
        self.pending_duplication.remove(section_id);
    }

    /// 删除模板页（必须在它的所有复制完成之后）
    pub fn delete_section(&mut self, section_id: &str) -> AppResult<()> {
        if self.pending_duplication.contains(section_id) {
            return Err(PlanError::PrematureDeletion {
                section: section_id.to_string(),
            }
            .into());
        }
        self.deletions.push(section_id.to_string());
        Ok(())
    }

    pub fn extend(&mut self, instructions: Vec<MutationInstruction>) {
        self.instructions.extend(instructions);
    }

    pub fn instructions(&self) -> &[MutationInstruction] {
        &self.instructions
    }

    pub fn deletions(&self) -> &[String] {
        &self.deletions
    }

    /// 引用完整性检查
    ///
    /// 每条指令的目标必须是已登记的 ID，且同一目标只能有一条指令。
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = BTreeSet::new();
        for instruction in &self.instructions {
            if !self.owners.contains_key(&instruction.target) {
                return Err(PlanError::UnresolvedTarget {
                    target: instruction.target.clone(),
                }
                .into());
            }
            if !seen.insert(instruction.target.as_str()) {
                return Err(PlanError::SharedDestination {
                    target: instruction.target.clone(),
                }
                .into());
            }
        }
        if let Some(section) = self.pending_duplication.iter().next() {
            return Err(PlanError::PrematureDeletion {
                section: section.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// 编译成批量请求
    ///
    /// 顺序：占位符清空 -> 每条指令（清空、插入、整段样式、局部样式）-> 删除模板页。
    pub fn compile(&self) -> Vec<BatchRequest> {
        let bound: BTreeSet<&str> = self
            .instructions
            .iter()
            .map(|i| i.target.as_str())
            .collect();

        let mut requests = Vec::new();

        for id in self
            .placeholders
            .iter()
            .filter(|id| !bound.contains(id.as_str()))
        {
            requests.push(BatchRequest::DeleteText {
                object_id: id.clone(),
            });
        }

        for instruction in &self.instructions {
            let object_id = &instruction.target;
            requests.push(BatchRequest::DeleteText {
                object_id: object_id.clone(),
            });
            requests.push(BatchRequest::InsertText {
                object_id: object_id.clone(),
                text: instruction.text.clone(),
            });
            requests.push(BatchRequest::style_all(object_id.clone(), instruction.style));
            for run in &instruction.runs {
                requests.push(BatchRequest::UpdateTextStyle {
                    object_id: object_id.clone(),
                    range: TextRange::Fixed {
                        start: run.start,
                        end: run.end,
                    },
                    style: run.style,
                });
            }
        }

        for section in &self.deletions {
            requests.push(BatchRequest::DeleteObject {
                object_id: section.clone(),
            });
        }

        debug!(
            "收尾批次: {} 条指令, {} 个删除, 共 {} 个请求",
            self.instructions.len(),
            self.deletions.len(),
            requests.len()
        );
        requests
    }
}
