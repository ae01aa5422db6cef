/// 日志工具模块
///
/// 提供日志初始化和阶段输出的辅助函数
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AssemblyFailure;
use crate::orchestrator::{AssembledReport, AssemblyStage};

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；否则默认 info，详细模式为 debug。
/// 重复调用不会报错（测试里会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 已加载的配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 演示文稿报告装配");
    info!("📄 模板: {}", config.template_id);
    info!("📁 分析数据: {}", config.analytics_path);
    info!("💡 生成内容: {}", config.insights_path);
    info!(
        "🔁 重试: 基础延迟 {}ms, 最多 {} 次",
        config.retry_base_delay_ms, config.max_retries
    );
    info!("{}", "=".repeat(60));
}

/// 记录阶段完成
///
/// # 参数
/// - `stage`: 刚完成的阶段
/// - `detail`: 附加说明
pub fn log_stage(stage: AssemblyStage, detail: &str) {
    info!("{}", "─".repeat(60));
    info!("✓ 阶段完成: {} - {}", stage, detail);
}

/// 打印最终结果
pub fn print_final_summary(report: &AssembledReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 报告装配完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📝 标题: {}", report.title);
    info!("🆔 文档: {}", report.document_id);
    info!(
        "📄 竞品页 {} 个, 创意页 {} 个",
        report.competitor_instances, report.idea_instances
    );
    info!(
        "📦 收尾批次 {} 个请求, 内容来源: {}",
        report.requests_submitted, report.content_source
    );
    if !report.retry_delays.is_empty() {
        info!("🔁 重试等待: {:?}", report.retry_delays);
    }
    info!("🔗 链接: {}", report.link);
    info!("{}", "=".repeat(60));
}

/// 打印失败信息
pub fn print_failure(failure: &AssemblyFailure) {
    error!("\n{}", "=".repeat(60));
    error!("❌ 报告装配失败");
    error!("失败阶段: {}", failure.failed_stage);
    error!("最后完成阶段: {}", failure.last_completed);
    if let Some(id) = &failure.document_id {
        error!("已复制的文档保留用于排查: {}", id);
    }
    error!("原因: {}", failure.source);
    error!("{}", "=".repeat(60));
}
