//! 提交处理上下文
//!
//! 封装"我正在给哪份作业的哪位学生评分"这一信息

use std::fmt::Display;

/// 提交处理上下文，仅用于日志
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 作业ID
    pub assignment_id: String,

    /// 提交ID
    pub submission_id: String,

    /// 学生姓名
    pub student_name: String,

    /// 提交在本批中的序号（从1开始）
    pub index: usize,
}

impl SubmissionCtx {
    pub fn new(
        assignment_id: String,
        submission_id: String,
        student_name: String,
        index: usize,
    ) -> Self {
        Self {
            assignment_id,
            submission_id,
            student_name,
            index,
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[作业 #{} 提交#{} {} ({})]",
            self.assignment_id, self.index, self.student_name, self.submission_id
        )
    }
}
