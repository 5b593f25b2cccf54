use crate::models::question::Criterion;
use crate::models::serde_helpers::deserialize_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 带勾选状态的评分项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCriterion {
    #[serde(flatten)]
    pub criterion: Criterion,
    #[serde(default)]
    pub applied: bool,
}

impl AppliedCriterion {
    pub fn new(criterion: Criterion, applied: bool) -> Self {
        Self { criterion, applied }
    }

    pub fn points(&self) -> f64 {
        self.criterion.points
    }
}

/// 单题评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    #[serde(deserialize_with = "deserialize_id")]
    pub question_id: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub student_answer: String,
    /// 加分项
    #[serde(default)]
    pub applied_criteria: Vec<AppliedCriterion>,
    /// 扣分项
    #[serde(default)]
    pub deduction_criteria: Vec<AppliedCriterion>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub is_auto_graded: bool,
}

/// 评分结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// 尚未评分，只有占位分数
    Pending,
    /// 后端自动评分
    Backend,
    /// 后端不可用时的本地兜底评分（未经后端确认）
    LocalFallback,
    /// 教师手动调整过分数
    Manual,
}

impl Provenance {
    /// 是否为未经后端确认的结果
    pub fn is_unverified(self) -> bool {
        matches!(self, Provenance::Pending | Provenance::LocalFallback)
    }
}

/// 后端 `/submissions/{id}/auto-grade` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoGradeResponse {
    pub grades: Vec<Grade>,
    pub total_score: f64,
}

/// 一份提交的最终评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionGrades {
    #[serde(deserialize_with = "deserialize_id")]
    pub submission_id: String,
    pub grades: Vec<Grade>,
    pub total_score: f64,
    #[serde(default)]
    pub feedback: String,
    pub graded_at: DateTime<Utc>,
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied_criterion_flattened() {
        let json = r#"{"id": "d1", "text": "Minor calculation error", "points": 0.5, "applied": true}"#;
        let c: AppliedCriterion = serde_json::from_str(json).unwrap();
        assert_eq!(c.criterion.id, "d1");
        assert!(c.applied);

        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["text"], "Minor calculation error");
        assert_eq!(back["applied"], true);
    }

    #[test]
    fn test_provenance_wire_name() {
        let v = serde_json::to_value(Provenance::LocalFallback).unwrap();
        assert_eq!(v, "local-fallback");
        assert!(Provenance::LocalFallback.is_unverified());
        assert!(!Provenance::Backend.is_unverified());
        assert!(!Provenance::Manual.is_unverified());
        assert!(Provenance::Pending.is_unverified());
        assert_eq!(serde_json::to_value(Provenance::Pending).unwrap(), "pending");
    }
}
