//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use crate::config::Config;
use crate::scoring::{rounded_percentage, CohortStats};
use crate::services::HealthStatus;
use std::fs;
use tracing::{info, warn};

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> std::io::Result<()> {
    let log_header = format!(
        "{}\n评分日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量评分模式");
    info!("🌐 评分后端: {}", config.api_base_url);
    info!("📊 最大并发数: {}", config.max_concurrent_submissions);
    info!("{}", "=".repeat(60));
}

/// 记录后端健康状态
pub fn log_health(health: &HealthStatus) {
    if health.ok {
        info!("✓ 评分后端可用");
    } else {
        warn!(
            "⚠️ 评分后端不可用 ({}), 将使用本地评分，结果会标记为未确认",
            health.detail.as_deref().unwrap_or("未知原因")
        );
    }
}

/// 记录作业加载信息
///
/// # 参数
/// - `total`: 作业总数
/// - `max_concurrent`: 最大并发数
pub fn log_batches_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 份待评分的作业", total);
    info!("📋 每份作业最多同时评 {} 份提交\n", max_concurrent);
}

/// 记录单份作业开始
pub fn log_assignment_start(index: usize, total: usize, title: &str, submissions: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始评分第 {}/{} 份作业: {}", index, total, title);
    info!("📄 提交数量: {}", submissions);
    info!("{}", "=".repeat(60));
}

/// 记录班级统计
pub fn log_cohort_summary(title: &str, stats: &CohortStats) {
    info!("\n{}", "─".repeat(60));
    info!("📊 「{}」评分统计", title);
    info!("提交数: {}", stats.count);
    info!(
        "平均分: {:.1} / {} ({})",
        stats.average,
        stats.total_points,
        format_percentage(stats.average_percentage())
    );
    info!(
        "最高分: {} ({})",
        format_score(stats.max, stats.total_points),
        format_percentage(rounded_percentage(stats.max, stats.total_points))
    );
    info!(
        "最低分: {} ({})",
        format_score(stats.min, stats.total_points),
        format_percentage(rounded_percentage(stats.min, stats.total_points))
    );
    for bucket in &stats.distribution {
        info!(
            "  {}: {} 人 ({})",
            bucket.grade.label(),
            bucket.count,
            format_percentage(bucket.share)
        );
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功的作业数
/// - `failed`: 失败的作业数
/// - `graded`: 评完的提交数
/// - `unverified`: 其中本地兜底评分的提交数
pub fn print_final_stats(
    success: usize,
    failed: usize,
    graded: usize,
    unverified: usize,
    config: &Config,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部评分完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功作业: {}/{}", success, success + failed);
    info!("❌ 失败作业: {}", failed);
    info!("📝 已评提交: {} (本地兜底 {})", graded, unverified);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
    info!("报告已保存至: {}", config.report_file);
}

/// 分数显示为 `得分/总分`
pub fn format_score(score: f64, total: f64) -> String {
    format!("{}/{}", score, total)
}

/// 百分比显示
pub fn format_percentage(value: u32) -> String {
    format!("{}%", value)
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
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("abcdefgh", 3), "abc...");
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_score(8.5, 10.0), "8.5/10");
        assert_eq!(format_percentage(85), "85%");
    }

    #[test]
    fn test_init_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        init_log_file(path.to_str().unwrap()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("评分日志"));
    }
}
