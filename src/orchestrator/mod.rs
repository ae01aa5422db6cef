//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次装配运行的流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 校验配置、创建传输
//! - 加载分析数据和生成内容
//! - 输出最终结果
//!
//! ### `assembler` - 报告装配器
//! - 维护阶段状态机（Created → ... → Done，失败时返回 AssemblyFailure）
//! - 选择内容来源（生成内容 / 兜底内容）
//! - 依次调用复制规划、内容绑定、收尾批次
//! - 失败时保留已复制的文档
//!
//! ## 层次关系
//!
//! ```text
//! app (配置 + 输入)
//!     ↓
//! assembler (阶段状态机)
//!     ↓
//! assembly (能力层：planner / binder / fallback / batch / retry)
//!     ↓
//! transport (远端文档服务)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单线程**：复制和提交都是顺序往返，远端文档是唯一的可变资源
//! 2. **计划独占**：装配计划只属于一次运行
//! 3. **向下依赖**：编排层 → assembly → transport

pub mod app;
pub mod assembler;

// 重新导出主要类型
pub use app::App;
pub use assembler::{AssembledReport, AssemblyOptions, AssemblyStage, ReportAssembler};
