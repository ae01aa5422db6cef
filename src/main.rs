use anyhow::{Context, Result};
use slides_report::utils::logging;
use slides_report::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let report = App::initialize(config)?.run().await?;

    println!("{}", report.link);
    Ok(())
}
