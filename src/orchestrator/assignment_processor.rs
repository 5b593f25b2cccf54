//! 单份作业处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责给一份作业的所有提交评分，是作业级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **校验作业**：题目自洽、总分与评分细则一致（严格模式）
//! 2. **并发评分**：每份提交一个 `GradingSession`，Semaphore 限制在途数量
//! 3. **统计输出**：汇总班级成绩分布，标记本地兜底的提交

use crate::config::Config;
use crate::models::{filter_submissions, GradingBatch, Provenance, SubmissionGrades};
use crate::scoring::{cohort_stats, rounded_percentage, CohortStats, LetterGrade};
use crate::services::BackendGateway;
use crate::utils::logging::{log_assignment_start, log_cohort_summary};
use crate::workflow::{GradingSession, SubmissionCtx};
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 单份提交的结果摘要
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub submission_id: String,
    pub student_name: String,
    pub student_id: String,
    pub total_score: f64,
    pub percentage: u32,
    pub letter_grade: LetterGrade,
    pub provenance: Provenance,
}

/// 一份作业的评分报告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentReport {
    pub assignment_id: String,
    pub title: String,
    pub total_points: f64,
    pub stats: CohortStats,
    pub submissions: Vec<SubmissionSummary>,
    /// 评分过程中出错的提交数
    pub failed: usize,
    /// 本地兜底、未经后端确认的提交数
    pub unverified: usize,
}

/// 处理单份作业
///
/// # 参数
/// - `gateway`: 评分后端网关
/// - `batch`: 作业及其提交
/// - `batch_index`: 作业序号（用于日志）
/// - `total_batches`: 作业总数（用于日志）
/// - `config`: 配置
pub async fn process_assignment(
    gateway: &BackendGateway,
    batch: GradingBatch,
    batch_index: usize,
    total_batches: usize,
    config: &Config,
) -> Result<AssignmentReport> {
    let GradingBatch {
        assignment,
        mut submissions,
        ..
    } = batch;

    if let Some(term) = config.student_filter.as_deref() {
        submissions = filter_submissions(submissions, term);
        info!("🔍 按「{}」筛选后剩余 {} 份提交", term, submissions.len());
    }

    log_assignment_start(batch_index, total_batches, &assignment.title, submissions.len());

    assignment
        .validate()
        .with_context(|| format!("作业「{}」数据不合法", assignment.title))?;
    assignment
        .check_total(config.strict_rubric_totals)
        .with_context(|| format!("作业「{}」总分校验失败", assignment.title))?;

    let assignment = Arc::new(assignment);
    let total_points = assignment.total_points();
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_submissions.max(1)));

    let mut handles = Vec::with_capacity(submissions.len());
    for (idx, submission) in submissions.into_iter().enumerate() {
        let ctx = SubmissionCtx::new(
            assignment.id.clone(),
            submission.id.clone(),
            submission.student_name.clone(),
            idx + 1,
        );
        let student_id = submission.student_id.clone();
        let permit = semaphore.clone().acquire_owned().await?;
        let gateway = gateway.clone();
        let assignment = Arc::clone(&assignment);

        let handle = tokio::spawn(async move {
            let _permit = permit;
            info!("{} 🤖 开始自动评分...", ctx);

            let mut session = GradingSession::pending(assignment, submission);
            let provenance = session.auto_grade(&gateway).await;
            if provenance.is_unverified() {
                warn!("{} ⚠️ 使用本地兜底评分，结果未经后端确认", ctx);
            }

            let grades = session.finish();
            info!("{} ✓ 评分完成: {}", ctx, grades.total_score);
            (ctx, student_id, grades)
        });
        handles.push(handle);
    }

    let mut results: Vec<(SubmissionCtx, String, SubmissionGrades)> = Vec::new();
    let mut failed = 0;
    for joined in futures::future::join_all(handles).await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => {
                error!("评分任务执行失败: {}", e);
                failed += 1;
            }
        }
    }

    let totals: Vec<f64> = results.iter().map(|(_, _, g)| g.total_score).collect();
    let stats = cohort_stats(&totals, total_points);

    let submissions: Vec<SubmissionSummary> = results
        .into_iter()
        .map(|(ctx, student_id, grades)| SubmissionSummary {
            submission_id: grades.submission_id,
            student_name: ctx.student_name,
            student_id,
            total_score: grades.total_score,
            percentage: rounded_percentage(grades.total_score, total_points),
            letter_grade: LetterGrade::from_score(grades.total_score, total_points),
            provenance: grades.provenance,
        })
        .collect();
    let unverified = submissions
        .iter()
        .filter(|s| s.provenance.is_unverified())
        .count();

    log_cohort_summary(&assignment.title, &stats);

    Ok(AssignmentReport {
        assignment_id: assignment.id.clone(),
        title: assignment.title.clone(),
        total_points,
        stats,
        submissions,
        failed,
        unverified,
    })
}
