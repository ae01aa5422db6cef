//! # Slides Report
//!
//! 从固定模板装配频道分析演示文稿的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 分析数据包、生成内容、统一内容形状
//! - `loaders` - JSON 输入加载
//!
//! ### ② 模板契约（Template）
//! - `template/anchors` - 锚点注册表：每页幻灯片及其元素的固定 ID
//! - `template/style` - 配色、字体、字号
//!
//! ### ③ 传输层（Transport）
//! - `transport/` - 远端文档服务接口 `DocumentTransport`
//! - `GoogleSlidesTransport` - Slides / Drive HTTP 实现
//!
//! ### ④ 业务能力层（Assembly）
//! - `assembly/` - 描述"我能做什么"，不关心运行阶段
//! - 复制规划、内容绑定、兜底内容、收尾批次、退避重试
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/assembler` - 阶段状态机，驱动一次装配
//! - `orchestrator/app` - 配置 + 输入 + 传输的组装
//!
//! ## 模块结构

pub mod assembly;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod template;
pub mod transport;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, AssemblyFailure};
pub use models::{AnalyticsBundle, ContentBundle, ContentSource, GeneratedContent};
pub use orchestrator::{App, AssembledReport, AssemblyOptions, AssemblyStage, ReportAssembler};
pub use template::{AnchorRegistry, SectionKind};
pub use transport::{BatchRequest, DocumentTransport, GoogleSlidesTransport};
