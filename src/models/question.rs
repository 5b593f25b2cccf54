use crate::error::GradingError;
use crate::models::serde_helpers::deserialize_id;
use crate::scoring;
use crate::utils::text::extract_number;
use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// 作答类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerType {
    /// 长文本
    LongText,
    /// 短文本
    ShortText,
    /// 数值
    Numerical,
    /// 数学表达式
    Mathematical,
    /// 选择题
    MultipleChoice,
    /// 代码
    Code,
    /// 文件上传
    FileUpload,
}

/// 作答类型别名表
///
/// 后端返回的类型名写法不统一，这里收录常见写法。
static ANSWER_TYPE_ALIASES: phf::Map<&'static str, AnswerType> = phf_map! {
    "long-text" => AnswerType::LongText,
    "long_text" => AnswerType::LongText,
    "longtext" => AnswerType::LongText,
    "essay" => AnswerType::LongText,
    "text" => AnswerType::LongText,
    "short-text" => AnswerType::ShortText,
    "short_text" => AnswerType::ShortText,
    "shorttext" => AnswerType::ShortText,
    "short" => AnswerType::ShortText,
    "numerical" => AnswerType::Numerical,
    "numeric" => AnswerType::Numerical,
    "number" => AnswerType::Numerical,
    "mathematical" => AnswerType::Mathematical,
    "math" => AnswerType::Mathematical,
    "multiple-choice" => AnswerType::MultipleChoice,
    "multiple_choice" => AnswerType::MultipleChoice,
    "multiplechoice" => AnswerType::MultipleChoice,
    "mcq" => AnswerType::MultipleChoice,
    "choice" => AnswerType::MultipleChoice,
    "code" => AnswerType::Code,
    "file-upload" => AnswerType::FileUpload,
    "file_upload" => AnswerType::FileUpload,
    "file" => AnswerType::FileUpload,
};

impl AnswerType {
    /// 线上使用的标准名称
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerType::LongText => "long-text",
            AnswerType::ShortText => "short-text",
            AnswerType::Numerical => "numerical",
            AnswerType::Mathematical => "mathematical",
            AnswerType::MultipleChoice => "multiple-choice",
            AnswerType::Code => "code",
            AnswerType::FileUpload => "file-upload",
        }
    }

    /// 从名称或别名解析（忽略大小写和首尾空白）
    pub fn parse(name: &str) -> Option<Self> {
        ANSWER_TYPE_ALIASES
            .get(name.trim().to_lowercase().as_str())
            .copied()
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnswerType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnswerType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        AnswerType::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown answer type '{}'", name)))
    }
}

/// 评分项，加分项 points ≥ 0，扣分项正负写法均可
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub text: String,
    pub points: f64,
}

impl Criterion {
    pub fn new(id: impl Into<String>, text: impl Into<String>, points: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            points,
        }
    }
}

/// 题目附带的评分细则
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRubric {
    #[serde(default)]
    pub addition_criteria: Vec<Criterion>,
    #[serde(default)]
    pub deduction_criteria: Vec<Criterion>,
}

/// 选择题选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub text: String,
    pub answer_type: AnswerType,
    #[serde(default)]
    pub expected_answer: String,
    #[serde(default)]
    pub points: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub rubric: QuestionRubric,
}

impl Question {
    /// 本题满分：所有加分项之和
    pub fn max_score(&self) -> f64 {
        scoring::max_score(&self.rubric.addition_criteria)
    }

    /// 正确选项
    pub fn correct_options(&self) -> impl Iterator<Item = &ChoiceOption> {
        self.options.iter().filter(|o| o.is_correct)
    }

    /// 边界校验：按作答类型检查题目是否自洽
    pub fn validate(&self) -> Result<(), GradingError> {
        let invalid = |reason: &str| GradingError::InvalidQuestion {
            question_id: self.id.clone(),
            reason: reason.to_string(),
        };

        match self.answer_type {
            AnswerType::MultipleChoice => {
                if self.options.is_empty() {
                    return Err(invalid("选择题没有选项"));
                }
                if self.correct_options().next().is_none() {
                    return Err(invalid("选择题没有正确选项"));
                }
            }
            AnswerType::Numerical => {
                if !self.expected_answer.trim().is_empty()
                    && extract_number(&self.expected_answer).is_none()
                {
                    return Err(invalid("数值题的参考答案不是数字"));
                }
            }
            _ => {}
        }

        let mut seen = HashSet::new();
        for criterion in self
            .rubric
            .addition_criteria
            .iter()
            .chain(self.rubric.deduction_criteria.iter())
        {
            if !seen.insert(criterion.id.as_str()) {
                return Err(invalid(&format!("评分项 id 重复: {}", criterion.id)));
            }
        }

        if self.rubric.addition_criteria.iter().any(|c| c.points < 0.0) {
            return Err(invalid("加分项分值不能为负"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_question() -> Question {
        Question {
            id: "q2".to_string(),
            text: "Which metric is robust to class imbalance?".to_string(),
            answer_type: AnswerType::MultipleChoice,
            expected_answer: "B".to_string(),
            points: 1.0,
            options: vec![
                ChoiceOption {
                    id: "1".to_string(),
                    text: "A. Accuracy".to_string(),
                    is_correct: false,
                },
                ChoiceOption {
                    id: "2".to_string(),
                    text: "B. F1 score".to_string(),
                    is_correct: true,
                },
            ],
            rubric: QuestionRubric {
                addition_criteria: vec![Criterion::new("a1", "Correct answer selected", 1.0)],
                deduction_criteria: vec![],
            },
        }
    }

    #[test]
    fn test_answer_type_aliases() {
        assert_eq!(AnswerType::parse("numeric"), Some(AnswerType::Numerical));
        assert_eq!(AnswerType::parse(" MCQ "), Some(AnswerType::MultipleChoice));
        assert_eq!(AnswerType::parse("file"), Some(AnswerType::FileUpload));
        assert_eq!(AnswerType::parse("drawing"), None);
    }

    #[test]
    fn test_question_from_frontend_json() {
        let json = r#"{
            "id": 4,
            "text": "Compute the mean of 2, 4, 6.",
            "answerType": "numeric",
            "expectedAnswer": "4",
            "points": 1,
            "rubric": {
                "additionCriteria": [{"id": "a1", "text": "Correct answer", "points": 1}],
                "deductionCriteria": [{"id": "d1", "text": "Minor calculation error", "points": 0.5}]
            }
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, "4");
        assert_eq!(q.answer_type, AnswerType::Numerical);
        assert_eq!(q.max_score(), 1.0);
        assert!(q.validate().is_ok());

        let back = serde_json::to_value(&q).unwrap();
        assert_eq!(back["answerType"], "numerical");
    }

    #[test]
    fn test_unknown_answer_type_rejected() {
        let json = r#"{"id": "q1", "text": "?", "answerType": "drawing"}"#;
        let err = serde_json::from_str::<Question>(json).unwrap_err();
        assert!(err.to_string().contains("unknown answer type"));
    }

    #[test]
    fn test_validate_choice_question() {
        assert!(choice_question().validate().is_ok());

        let mut no_correct = choice_question();
        no_correct.options.iter_mut().for_each(|o| o.is_correct = false);
        assert!(matches!(
            no_correct.validate(),
            Err(GradingError::InvalidQuestion { .. })
        ));

        let mut no_options = choice_question();
        no_options.options.clear();
        assert!(no_options.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_criterion_ids() {
        let mut q = choice_question();
        q.rubric
            .deduction_criteria
            .push(Criterion::new("a1", "Partially correct selection", 0.5));
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_validate_numerical_expected_answer() {
        let mut q = choice_question();
        q.answer_type = AnswerType::Numerical;
        q.options.clear();
        q.expected_answer = "forty-two".to_string();
        assert!(q.validate().is_err());
        q.expected_answer = "42".to_string();
        assert!(q.validate().is_ok());
        // 本地判分能读出的写法都应通过校验
        for expected in ["1,250.5", "x = 3", "9.8 m/s"] {
            q.expected_answer = expected.to_string();
            assert!(q.validate().is_ok(), "{} should be accepted", expected);
        }
    }
}
