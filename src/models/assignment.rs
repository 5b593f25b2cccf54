use crate::error::GradingError;
use crate::models::question::Question;
use crate::models::rubric::check_declared_total;
use crate::models::serde_helpers::deserialize_id;
use crate::models::submission::Submission;
use serde::{Deserialize, Serialize};

/// 作业
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// 后端声明的总分；缺省时按评分细则计算
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<f64>,
}

impl Assignment {
    /// 所有题目加分项之和
    pub fn computed_total_points(&self) -> f64 {
        self.questions.iter().map(Question::max_score).sum()
    }

    /// 总分，优先使用声明值
    pub fn total_points(&self) -> f64 {
        self.total_points
            .unwrap_or_else(|| self.computed_total_points())
    }

    /// 校验所有题目
    pub fn validate(&self) -> Result<(), GradingError> {
        self.questions.iter().try_for_each(Question::validate)
    }

    /// 检查声明总分与评分细则是否一致，未声明时直接通过
    pub fn check_total(&self, strict: bool) -> Result<(), GradingError> {
        match self.total_points {
            Some(declared) => {
                check_declared_total(&self.title, declared, self.computed_total_points(), strict)
            }
            None => Ok(()),
        }
    }
}

/// `GET /assignments` 的响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentList {
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// 一个批量评分文件：一份作业及其所有提交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingBatch {
    pub assignment: Assignment,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl GradingBatch {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{AnswerType, Criterion, QuestionRubric};

    fn question(id: &str, points: &[f64]) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            answer_type: AnswerType::ShortText,
            expected_answer: String::new(),
            points: points.iter().sum(),
            options: vec![],
            rubric: QuestionRubric {
                addition_criteria: points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Criterion::new(format!("a{}", i + 1), "Correct answer", *p))
                    .collect(),
                deduction_criteria: vec![Criterion::new("d1", "Minor error", 0.5)],
            },
        }
    }

    #[test]
    fn test_total_points_computed_from_additions() {
        let assignment = Assignment {
            id: "1".to_string(),
            title: "Machine Learning Quiz".to_string(),
            description: String::new(),
            questions: vec![question("q1", &[1.0]), question("q2", &[2.0, 3.0])],
            total_points: None,
        };
        assert_eq!(assignment.computed_total_points(), 6.0);
        assert_eq!(assignment.total_points(), 6.0);

        let declared = Assignment {
            total_points: Some(10.0),
            ..assignment
        };
        assert_eq!(declared.total_points(), 10.0);
    }
}
