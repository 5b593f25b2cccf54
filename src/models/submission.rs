use crate::models::serde_helpers::deserialize_id;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 提交方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    /// 上传文件
    File,
    /// 手动录入
    #[default]
    Manual,
}

/// 学生对单题的作答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswer {
    #[serde(deserialize_with = "deserialize_id")]
    pub question_id: String,
    #[serde(default)]
    pub answer: String,
    /// 录入时已知的对错；缺省时由本地判分推断
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// 学生提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub student_name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub student_id: String,
    /// RFC 3339 时间字符串
    #[serde(default)]
    pub submission_date: String,
    #[serde(rename = "type", default)]
    pub kind: SubmissionType,
    #[serde(default)]
    pub answers: Vec<StudentAnswer>,
}

impl Submission {
    /// 查找某题的作答
    pub fn answer_for(&self, question_id: &str) -> Option<&StudentAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// 解析提交时间，格式不合法时返回 `None`
    pub fn submitted_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.submission_date).ok()
    }

    /// 按姓名或学号搜索（不区分大小写）
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.student_name.to_lowercase().contains(&term)
            || self.student_id.to_lowercase().contains(&term)
    }
}

/// 按搜索词过滤提交列表，空搜索词保留全部
pub fn filter_submissions(submissions: Vec<Submission>, term: &str) -> Vec<Submission> {
    submissions
        .into_iter()
        .filter(|s| s.matches_search(term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, student_id: &str) -> Submission {
        Submission {
            id: format!("sub-{}", student_id),
            student_name: name.to_string(),
            student_id: student_id.to_string(),
            submission_date: "2024-03-14T09:30:00Z".to_string(),
            kind: SubmissionType::File,
            answers: vec![StudentAnswer {
                question_id: "q1".to_string(),
                answer: "4".to_string(),
                is_correct: None,
            }],
        }
    }

    #[test]
    fn test_search_by_name_or_id() {
        let subs = vec![submission("Alice Chen", "S1001"), submission("Bob Li", "S1002")];
        assert_eq!(filter_submissions(subs.clone(), "alice").len(), 1);
        assert_eq!(filter_submissions(subs.clone(), "s100").len(), 2);
        assert_eq!(filter_submissions(subs.clone(), "  ").len(), 2);
        assert!(filter_submissions(subs, "carol").is_empty());
    }

    #[test]
    fn test_submission_wire_format() {
        let json = r#"{
            "id": "s1",
            "studentName": "Alice Chen",
            "studentId": 1001,
            "submissionDate": "2024-03-14T09:30:00Z",
            "type": "file",
            "answers": [{"questionId": 1, "answer": "B", "isCorrect": true}]
        }"#;
        let s: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(s.kind, SubmissionType::File);
        assert_eq!(s.student_id, "1001");
        assert_eq!(s.answer_for("1").and_then(|a| a.is_correct), Some(true));
        assert!(s.submitted_at().is_some());
    }

    #[test]
    fn test_bad_date_is_none() {
        let mut s = submission("Alice Chen", "S1001");
        s.submission_date = "yesterday".to_string();
        assert!(s.submitted_at().is_none());
    }
}
