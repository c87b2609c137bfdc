//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::llm_model::model_info;
use crate::models::state::{Progress, WorkflowStatus};

/// 初始化 tracing 订阅者
///
/// 优先使用 `RUST_LOG`；未设置时按 `verbose` 选择 `debug` 或 `info`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n研究自动化工作流日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `model`: 默认模型
/// - `results_dir`: 结果目录
pub fn log_startup(model: &str, results_dir: &str) {
    let model_meta = model_info(model);
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 研究工作流批量执行模式");
    info!("🤖 默认模型: {} ({}, {})", model, model_meta.size, model_meta.description);
    info!("📁 结果目录: {}", results_dir);
    info!("{}", "=".repeat(60));
}

/// 记录请求加载信息
pub fn log_requests_loaded(total: usize) {
    info!("✓ 找到 {} 个待执行的工作流请求", total);
    info!("💡 所有工作流同时在后台执行\n");
}

/// 记录进度变化
pub fn log_progress(label: &str, progress: &Progress) {
    info!("{} ⏳ 进度 {}", label, progress);
}

/// 记录工作流结束
pub fn log_terminal(label: &str, status: WorkflowStatus, error: Option<&str>) {
    match (status, error) {
        (WorkflowStatus::Failed, Some(error)) => {
            info!("{} ❌ 状态: {} ({})", label, status, truncate_text(error, 120))
        }
        _ => info!("{} 🏁 状态: {}", label, status),
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `completed`: 完成数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(completed: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部工作流执行完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 完成: {}/{}", completed, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("检索增强生成", 2), "检索...");
    }

    #[test]
    fn test_init_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        init_log_file(path.to_str().unwrap()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("研究自动化工作流日志"));
    }
}
