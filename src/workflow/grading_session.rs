//! 单份提交的评分流程 - 流程层
//!
//! 流程顺序：
//! 1. 生成占位评分（每题 0 分，标记为 Pending）
//! 2. 后端自动评分 → 失败则本地兜底评分（标记为 LocalFallback）
//! 3. 教师勾选/取消评分项、手动改分、填写评语（改动后端结果会标记为 Manual）
//! 4. 完成，得到 `SubmissionGrades`

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ErrorEnvelope, GradingError};
use crate::models::{
    AppliedCriterion, Assignment, AutoGradeResponse, Grade, Provenance, Question, Submission,
    SubmissionGrades,
};
use crate::scoring;
use crate::services::{AnswerChecker, BackendGateway};

/// 评分项类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionKind {
    /// 加分项
    Addition,
    /// 扣分项
    Deduction,
}

/// 单份提交的评分会话
///
/// 自动评分需要 `&mut self`，同一会话同一时间只会有一个评分请求在途。
pub struct GradingSession {
    assignment: Arc<Assignment>,
    submission: Submission,
    grades: Vec<Grade>,
    total_score: f64,
    feedback: String,
    provenance: Provenance,
    last_error: Option<ErrorEnvelope>,
    checker: AnswerChecker,
}

impl GradingSession {
    /// 创建会话，每题先放一个 0 分的占位评分
    pub fn pending(assignment: Arc<Assignment>, submission: Submission) -> Self {
        let grades = assignment
            .questions
            .iter()
            .map(|question| Grade {
                question_id: question.id.clone(),
                score: 0.0,
                max_score: question.max_score(),
                student_answer: submission
                    .answer_for(&question.id)
                    .map(|a| a.answer.clone())
                    .unwrap_or_default(),
                applied_criteria: Vec::new(),
                deduction_criteria: Vec::new(),
                feedback: "自动评分中...".to_string(),
                is_auto_graded: false,
            })
            .collect();

        Self {
            assignment,
            submission,
            grades,
            total_score: 0.0,
            feedback: String::new(),
            provenance: Provenance::Pending,
            last_error: None,
            checker: AnswerChecker::new(),
        }
    }

    /// 自动评分：先请求后端，失败时本地兜底
    pub async fn auto_grade(&mut self, gateway: &BackendGateway) -> Provenance {
        match gateway
            .auto_grade(
                &self.submission.id,
                &self.assignment.id,
                &self.submission.answers,
            )
            .await
        {
            Ok(response) => {
                self.apply_backend_grades(response);
                info!("✓ 后端自动评分完成: {}", self.submission.id);
            }
            Err(e) => {
                warn!("⚠️ 后端自动评分失败，使用本地评分: {}", e);
                self.last_error = Some(e.to_envelope());
                self.grade_locally();
            }
        }

        self.provenance
    }

    /// 本地兜底评分
    ///
    /// 答对则全部加分项勾选，答错则全部不勾选，扣分项一律不勾选。
    pub fn grade_locally(&mut self) {
        let grades: Vec<Grade> = self
            .assignment
            .questions
            .iter()
            .map(|question| self.local_grade(question))
            .collect();
        self.grades = grades;
        self.total_score = scoring::total_score(&self.grades);
        self.provenance = Provenance::LocalFallback;
    }

    fn local_grade(&self, question: &Question) -> Grade {
        let answer = self.submission.answer_for(&question.id);
        let is_correct = self.checker.is_correct(question, answer);

        let applied_criteria: Vec<AppliedCriterion> = question
            .rubric
            .addition_criteria
            .iter()
            .map(|c| AppliedCriterion::new(c.clone(), is_correct))
            .collect();
        let deduction_criteria: Vec<AppliedCriterion> = question
            .rubric
            .deduction_criteria
            .iter()
            .map(|c| AppliedCriterion::new(c.clone(), false))
            .collect();

        let feedback = if is_correct {
            "回答正确（本地评分，未经后端确认）"
        } else {
            "回答错误或需人工复核（本地评分，未经后端确认）"
        };

        Grade {
            question_id: question.id.clone(),
            score: scoring::score_from_criteria(&applied_criteria, &deduction_criteria),
            max_score: question.max_score(),
            student_answer: answer.map(|a| a.answer.clone()).unwrap_or_default(),
            applied_criteria,
            deduction_criteria,
            feedback: feedback.to_string(),
            is_auto_graded: true,
        }
    }

    /// 勾选/取消某个评分项，返回该题新分数
    pub fn toggle_criterion(
        &mut self,
        question_index: usize,
        kind: CriterionKind,
        criterion_index: usize,
    ) -> Result<f64, GradingError> {
        let grade = self.grade_mut(question_index)?;

        let criteria = match kind {
            CriterionKind::Addition => &mut grade.applied_criteria,
            CriterionKind::Deduction => &mut grade.deduction_criteria,
        };
        let len = criteria.len();
        let criterion = criteria
            .get_mut(criterion_index)
            .ok_or(GradingError::CriterionIndexOutOfRange {
                question_index,
                index: criterion_index,
                len,
            })?;

        criterion.applied = !criterion.applied;
        debug!(
            "题目 {} 评分项 {} -> {}",
            grade.question_id, criterion.criterion.id, criterion.applied
        );

        grade.score = scoring::score_from_criteria(&grade.applied_criteria, &grade.deduction_criteria);
        let score = grade.score;

        self.mark_edited();
        self.recompute_total();
        Ok(score)
    }

    /// 手动改分，限制在 `[0, 满分]` 之间，返回实际写入的分数
    pub fn set_score(&mut self, question_index: usize, score: f64) -> Result<f64, GradingError> {
        let grade = self.grade_mut(question_index)?;

        let max = if grade.applied_criteria.is_empty() {
            grade.max_score
        } else {
            grade.applied_criteria.iter().map(AppliedCriterion::points).sum()
        };
        // NaN 按 0 处理
        grade.score = score.max(0.0).min(max.max(0.0));
        let clamped = grade.score;

        self.mark_edited();
        self.recompute_total();
        Ok(clamped)
    }

    /// 单题评语
    pub fn set_question_feedback(
        &mut self,
        question_index: usize,
        feedback: impl Into<String>,
    ) -> Result<(), GradingError> {
        self.grade_mut(question_index)?.feedback = feedback.into();
        Ok(())
    }

    /// 总评语
    pub fn set_feedback(&mut self, feedback: impl Into<String>) {
        self.feedback = feedback.into();
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// 最近一次后端失败
    pub fn last_error(&self) -> Option<&ErrorEnvelope> {
        self.last_error.as_ref()
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// 完成评分
    pub fn finish(self) -> SubmissionGrades {
        SubmissionGrades {
            submission_id: self.submission.id,
            grades: self.grades,
            total_score: self.total_score,
            feedback: self.feedback,
            graded_at: Utc::now(),
            provenance: self.provenance,
        }
    }

    // ========== 辅助函数 ==========

    fn apply_backend_grades(&mut self, response: AutoGradeResponse) {
        let computed = scoring::total_score(&response.grades);
        if (computed - response.total_score).abs() > 1e-6 {
            warn!(
                "⚠️ 后端总分 {} 与各题之和 {} 不一致，以各题之和为准",
                response.total_score, computed
            );
        }
        self.grades = response.grades;
        self.total_score = computed;
        self.provenance = Provenance::Backend;
        self.last_error = None;
    }

    /// 后端结果被教师改动后不再是原样的后端评分
    fn mark_edited(&mut self) {
        if self.provenance == Provenance::Backend {
            self.provenance = Provenance::Manual;
        }
    }

    fn grade_mut(&mut self, question_index: usize) -> Result<&mut Grade, GradingError> {
        let len = self.grades.len();
        self.grades
            .get_mut(question_index)
            .ok_or(GradingError::QuestionIndexOutOfRange {
                index: question_index,
                len,
            })
    }

    fn recompute_total(&mut self) {
        self.total_score = scoring::total_score(&self.grades);
    }
}
