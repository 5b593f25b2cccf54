use crate::error::GradingError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 总分比较允许的误差
const POINTS_EPSILON: f64 = 1e-6;

/// 评分标准（由后端根据作业内容生成）
///
/// 线上格式沿用后端的 snake_case：`{title, total_points, criteria}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub title: String,
    pub total_points: f64,
    #[serde(default)]
    pub criteria: Vec<RubricCriterion>,
}

/// 评分标准中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricCriterion {
    pub name: String,
    pub points: f64,
    #[serde(default)]
    pub description: String,
}

impl Rubric {
    /// 各项分值之和
    pub fn criteria_points(&self) -> f64 {
        self.criteria.iter().map(|c| c.points).sum()
    }

    /// 声明的总分与各项之和不一致时返回 `(声明值, 计算值)`
    pub fn points_mismatch(&self) -> Option<(f64, f64)> {
        let computed = self.criteria_points();
        if (computed - self.total_points).abs() > POINTS_EPSILON {
            Some((self.total_points, computed))
        } else {
            None
        }
    }

    /// 检查总分
    ///
    /// 非严格模式下只记录警告并信任后端给出的总分。
    pub fn check_total(&self, strict: bool) -> Result<(), GradingError> {
        check_declared_total(&self.title, self.total_points, self.criteria_points(), strict)
    }
}

/// 比较声明总分与计算总分，`strict` 时不一致即报错
pub fn check_declared_total(
    label: &str,
    declared: f64,
    computed: f64,
    strict: bool,
) -> Result<(), GradingError> {
    if (computed - declared).abs() <= POINTS_EPSILON {
        return Ok(());
    }
    if strict {
        return Err(GradingError::RubricTotalMismatch { declared, computed });
    }
    warn!(
        "⚠️ 「{}」声明总分 {} 与各项之和 {} 不一致，沿用声明值",
        label, declared, computed
    );
    Ok(())
}

/// 后端对文本作答的评分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub total_score: f64,
    #[serde(default)]
    pub criteria_scores: Vec<CriterionScore>,
    #[serde(default)]
    pub general_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
}
