//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 把配置、输入文件、传输和装配器连起来：
//!
//! 1. **应用初始化**：校验配置、创建 HTTP 传输
//! 2. **加载输入**：分析数据（必需）、生成内容（可选）
//! 3. **执行装配**：委托 `ReportAssembler`
//! 4. **输出结果**：打印链接或失败阶段

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::models::loaders::{load_analytics, load_generated_content};
use crate::orchestrator::assembler::{AssembledReport, AssemblyOptions, ReportAssembler};
use crate::transport::GoogleSlidesTransport;
use crate::utils::logging::{log_startup, print_failure, print_final_summary};

/// 应用主结构
pub struct App {
    config: Config,
    assembler: ReportAssembler<GoogleSlidesTransport>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        log_startup(&config);

        let transport = GoogleSlidesTransport::new(&config).context("创建文档传输失败")?;
        let assembler = ReportAssembler::new(transport, AssemblyOptions::from_config(&config));

        Ok(Self { config, assembler })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<AssembledReport> {
        info!("\n📁 正在加载输入数据...");
        let analytics = load_analytics(Path::new(&self.config.analytics_path))
            .await
            .with_context(|| format!("无法加载分析数据: {}", self.config.analytics_path))?;
        let generated = load_generated_content(Path::new(&self.config.insights_path))
            .await
            .with_context(|| format!("无法加载生成内容: {}", self.config.insights_path))?;

        info!(
            "✓ 主频道: {}, 竞品 {} 个",
            analytics.channel.channel_name,
            analytics.competitors.len()
        );

        match self.assembler.run(&analytics, generated.as_ref()).await {
            Ok(report) => {
                print_final_summary(&report);
                Ok(report)
            }
            Err(failure) => {
                print_failure(&failure);
                Err(failure).context("报告装配失败")
            }
        }
    }
}
