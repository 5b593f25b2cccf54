//! 本地判分服务 - 业务能力层
//!
//! 后端不可用时用来推断单题对错。只能处理有明确参考答案的题型，
//! 长文本、代码、文件和数学表达式一律判为未得分，留给教师复核。

use crate::models::{AnswerType, Question, StudentAnswer};
use crate::utils::text::{extract_number, normalize_text, option_letter, split_selections};
use std::collections::BTreeSet;

/// 本地判分
pub struct AnswerChecker {
    /// 数值题的相对误差
    numeric_tolerance: f64,
}

impl AnswerChecker {
    pub fn new() -> Self {
        Self {
            numeric_tolerance: 1e-6,
        }
    }

    /// 判断作答是否正确
    ///
    /// 作答自带 `isCorrect` 时直接采用。
    pub fn is_correct(&self, question: &Question, answer: Option<&StudentAnswer>) -> bool {
        let Some(answer) = answer else {
            return false;
        };
        if let Some(known) = answer.is_correct {
            return known;
        }
        if answer.answer.trim().is_empty() {
            return false;
        }

        match question.answer_type {
            AnswerType::Numerical => self.numbers_match(&question.expected_answer, &answer.answer),
            AnswerType::ShortText => {
                let expected = normalize_text(&question.expected_answer);
                !expected.is_empty() && expected == normalize_text(&answer.answer)
            }
            AnswerType::MultipleChoice => choice_matches(question, &answer.answer),
            AnswerType::LongText
            | AnswerType::Mathematical
            | AnswerType::Code
            | AnswerType::FileUpload => false,
        }
    }

    fn numbers_match(&self, expected: &str, given: &str) -> bool {
        match (extract_number(expected), extract_number(given)) {
            (Some(e), Some(g)) => {
                let scale = e.abs().max(1.0);
                (e - g).abs() <= self.numeric_tolerance * scale
            }
            _ => false,
        }
    }
}

impl Default for AnswerChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// 选择题：选中的选项集合必须与正确选项集合完全一致，与顺序无关
///
/// 每个选择可以是选项 id、选项文本或字母编号（`A`、`B`...），多选用逗号或分号分隔。
/// 没有选项标记为正确时，用参考答案推出正确选项。
fn choice_matches(question: &Question, answer: &str) -> bool {
    let flagged: BTreeSet<usize> = question
        .options
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_correct)
        .map(|(idx, _)| idx)
        .collect();

    let correct = if flagged.is_empty() {
        match resolve_selections(question, &question.expected_answer) {
            Some(set) => set,
            None => {
                let expected: BTreeSet<String> =
                    split_selections(&question.expected_answer).into_iter().collect();
                let given: BTreeSet<String> = split_selections(answer).into_iter().collect();
                return !expected.is_empty() && expected == given;
            }
        }
    } else {
        flagged
    };

    if correct.is_empty() {
        return false;
    }

    resolve_selections(question, answer).is_some_and(|selected| selected == correct)
}

/// 把作答解析为选项下标集合，任一选择无法对应到选项时返回 `None`
fn resolve_selections(question: &Question, text: &str) -> Option<BTreeSet<usize>> {
    // 整个作答恰好是某个选项（选项文本里可能带逗号）
    if let Some(idx) = resolve_option(question, &normalize_text(text)) {
        return Some(BTreeSet::from([idx]));
    }

    split_selections(text)
        .iter()
        .map(|token| resolve_option(question, token))
        .collect()
}

fn resolve_option(question: &Question, token: &str) -> Option<usize> {
    if token.is_empty() {
        return None;
    }

    let matched = question.options.iter().position(|o| {
        normalize_text(&o.id) == token
            || normalize_text(&o.text) == token
            || option_letter(&o.text).as_deref() == Some(token)
    });
    if matched.is_some() {
        return matched;
    }

    // 单个字母按选项顺序对应：A 是第一个选项
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => {
            let idx = (c as u8 - b'A') as usize;
            (idx < question.options.len()).then_some(idx)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChoiceOption, QuestionRubric};

    fn question(answer_type: AnswerType, expected: &str) -> Question {
        Question {
            id: "q1".to_string(),
            text: "?".to_string(),
            answer_type,
            expected_answer: expected.to_string(),
            points: 1.0,
            options: vec![],
            rubric: QuestionRubric::default(),
        }
    }

    fn answer(text: &str) -> StudentAnswer {
        StudentAnswer {
            question_id: "q1".to_string(),
            answer: text.to_string(),
            is_correct: None,
        }
    }

    fn option(id: &str, text: &str, is_correct: bool) -> ChoiceOption {
        ChoiceOption {
            id: id.to_string(),
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn test_known_correctness_wins() {
        let checker = AnswerChecker::new();
        let q = question(AnswerType::LongText, "");
        let mut a = answer("An essay");
        a.is_correct = Some(true);
        assert!(checker.is_correct(&q, Some(&a)));
        assert!(!checker.is_correct(&q, None));
    }

    #[test]
    fn test_numerical() {
        let checker = AnswerChecker::new();
        let q = question(AnswerType::Numerical, "1,250.5");
        assert!(checker.is_correct(&q, Some(&answer("x = 1250.5"))));
        assert!(checker.is_correct(&q, Some(&answer("1250.50 units"))));
        assert!(!checker.is_correct(&q, Some(&answer("1251"))));
        assert!(!checker.is_correct(&q, Some(&answer("no idea"))));
    }

    #[test]
    fn test_short_text_normalized() {
        let checker = AnswerChecker::new();
        let q = question(AnswerType::ShortText, "Gradient Descent");
        assert!(checker.is_correct(&q, Some(&answer("  gradient   descent "))));
        assert!(!checker.is_correct(&q, Some(&answer("newton's method"))));
    }

    #[test]
    fn test_multiple_choice() {
        let checker = AnswerChecker::new();
        let mut q = question(AnswerType::MultipleChoice, "");
        q.options = vec![
            option("1", "A. Accuracy", false),
            option("2", "B. F1 score", true),
        ];
        assert!(checker.is_correct(&q, Some(&answer("2"))));
        assert!(checker.is_correct(&q, Some(&answer("b. f1 score"))));
        assert!(checker.is_correct(&q, Some(&answer("B"))));
        assert!(!checker.is_correct(&q, Some(&answer("1"))));

        q.options.push(option("3", "C. Recall", true));
        assert!(checker.is_correct(&q, Some(&answer("3, 2"))));
        assert!(!checker.is_correct(&q, Some(&answer("2"))));
    }

    #[test]
    fn test_multi_select_ignores_order_and_spacing() {
        let checker = AnswerChecker::new();
        let mut q = question(AnswerType::MultipleChoice, "A, B");
        q.options = vec![
            option("1", "A. Supervised learning", true),
            option("2", "B. Unsupervised learning", true),
            option("3", "C. Compiled learning", false),
        ];
        for given in ["A, B", "B, A", "A,B", "b；a", "1, 2"] {
            assert!(checker.is_correct(&q, Some(&answer(given))), "{} should be correct", given);
        }
        for given in ["A", "A, C", "A, B, C", "A, Z"] {
            assert!(!checker.is_correct(&q, Some(&answer(given))), "{} should be wrong", given);
        }
    }

    #[test]
    fn test_multi_select_from_expected_answer() {
        let checker = AnswerChecker::new();
        let mut q = question(AnswerType::MultipleChoice, "A, C");
        q.options = vec![
            option("o1", "Mean", false),
            option("o2", "Median", false),
            option("o3", "Mode", false),
        ];
        assert!(checker.is_correct(&q, Some(&answer("C, A"))));
        assert!(checker.is_correct(&q, Some(&answer("mode, mean"))));
        assert!(!checker.is_correct(&q, Some(&answer("A, B"))));
    }

    #[test]
    fn test_free_form_needs_review() {
        let checker = AnswerChecker::new();
        for kind in [AnswerType::LongText, AnswerType::Code, AnswerType::FileUpload, AnswerType::Mathematical] {
            let q = question(kind, "anything");
            assert!(!checker.is_correct(&q, Some(&answer("anything"))));
        }
    }
}
