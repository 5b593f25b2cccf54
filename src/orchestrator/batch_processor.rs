//! 批量作业处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量作业的评分和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、创建后端网关、检查后端健康状态
//! 2. **批量加载**：扫描并加载所有待评分的作业（`Vec<GradingBatch>`）
//! 3. **逐份评分**：委托 assignment_processor 评完一份作业再开始下一份
//! 4. **报告输出**：每份作业的报告追加写入 JSON Lines 文件
//! 5. **全局统计**：汇总所有作业的评分结果

use crate::config::Config;
use crate::models::{load_all_grading_batches, GradingBatch};
use crate::orchestrator::assignment_processor::{process_assignment, AssignmentReport};
use crate::services::{BackendGateway, ReportWriter};
use crate::utils::logging::{
    init_log_file, log_batches_loaded, log_health, log_startup, print_final_stats,
};
use anyhow::Result;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    gateway: BackendGateway,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let gateway = BackendGateway::new(&config)?;

        // 后端不可用时仍继续，评分会走本地兜底
        let health = gateway.check_health().await;
        log_health(&health);

        let report_writer = ReportWriter::with_path(config.report_file.clone());

        Ok(Self {
            config,
            gateway,
            report_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        let batches = self.load_batches().await?;

        if batches.is_empty() {
            warn!("⚠️ 没有找到待评分的TOML文件，程序结束");
            return Ok(RunStats::default());
        }

        log_batches_loaded(batches.len(), self.config.max_concurrent_submissions);

        let stats = self.process_all_batches(batches).await?;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.graded,
            stats.unverified,
            &self.config,
        );

        Ok(stats)
    }

    /// 加载作业
    async fn load_batches(&self) -> Result<Vec<GradingBatch>> {
        info!("\n📁 正在扫描待评分的作业...");
        Ok(load_all_grading_batches(&self.config.data_folder).await?)
    }

    /// 处理所有作业
    async fn process_all_batches(&self, batches: Vec<GradingBatch>) -> Result<RunStats> {
        let total = batches.len();
        let mut stats = RunStats {
            total,
            ..Default::default()
        };

        for (idx, batch) in batches.into_iter().enumerate() {
            let source = batch.file_path.clone().unwrap_or_default();
            match process_assignment(&self.gateway, batch, idx + 1, total, &self.config).await {
                Ok(report) => {
                    self.record(&report).await?;
                    stats.add(&report);
                }
                Err(e) => {
                    error!("[作业 {}] ❌ 评分失败 ({}): {:#}", idx + 1, source, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    async fn record(&self, report: &AssignmentReport) -> Result<()> {
        self.report_writer.append(report).await?;
        Ok(())
    }
}

/// 全部作业的评分统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// 作业总数
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// 评完的提交数
    pub graded: usize,
    /// 其中本地兜底的提交数
    pub unverified: usize,
}

impl RunStats {
    fn add(&mut self, report: &AssignmentReport) {
        self.success += 1;
        self.graded += report.submissions.len();
        self.unverified += report.unverified;
    }
}
