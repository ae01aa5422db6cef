//! 装配服务 - 业务能力层
//!
//! 提供演示文稿装配的各个独立能力：
//! - 显示格式（数值、截断）
//! - 标识映射和绑定目标
//! - 内容绑定（数据 -> 元素级修改指令）
//! - 复制规划（逆序复制得到正序结果）
//! - 兜底内容生成
//! - 收尾批次的校验和编译
//! - 退避重试
//!
//! 这些服务不关心运行阶段，只由编排层按顺序调用。

pub mod batch;
pub mod binder;
pub mod fallback;
pub mod format;
pub mod mapping;
pub mod planner;
pub mod retry;

pub use batch::AssemblyPlan;
pub use binder::{MutationInstruction, StyledRun};
pub use fallback::FallbackGenerator;
pub use mapping::{BindTarget, IdentifierMapping};
pub use planner::{DuplicatedInstance, DuplicationPlan, DuplicationPlanner};
pub use retry::RetryPolicy;
