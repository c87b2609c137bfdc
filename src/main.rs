use anyhow::Result;
use research_automation::utils::logging;
use research_automation::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run().await?;

    if stats.failed > 0 {
        tracing::warn!("⚠️ {} 个工作流未成功完成", stats.failed);
    }

    Ok(())
}
