//! 作答文本工具
//!
//! 本地判分和题目校验共用同一套数字、选项解析规则。

use regex::Regex;
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").ok());

/// 选项文本开头的字母编号，如 `A. Accuracy`、`B）F1`
static OPTION_LETTER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z])\s*[\.\)、:：）]").ok());

/// 统一大小写并合并空白
pub fn normalize_text(text: &str) -> String {
    text.to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 提取文本中的第一个数字，如 `"x = -3.5 cm"` → `-3.5`，千分位逗号会被忽略
pub fn extract_number(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    NUMBER_RE.as_ref()?.find(&cleaned)?.as_str().parse().ok()
}

/// 选项文本的字母编号（大写）
pub fn option_letter(text: &str) -> Option<String> {
    OPTION_LETTER_RE
        .as_ref()?
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
}

/// 把多选作答拆成单个选择，支持中英文逗号和分号
pub fn split_selections(text: &str) -> Vec<String> {
    text.split([',', ';', '，', '；'])
        .map(normalize_text)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("x = -3.5 cm"), Some(-3.5));
        assert_eq!(extract_number("1,250.5"), Some(1250.5));
        assert_eq!(extract_number("2e3"), Some(2000.0));
        assert_eq!(extract_number("none"), None);
    }

    #[test]
    fn test_option_letter() {
        assert_eq!(option_letter("A. Accuracy").as_deref(), Some("A"));
        assert_eq!(option_letter("b) Recall").as_deref(), Some("B"));
        assert_eq!(option_letter("C、召回率").as_deref(), Some("C"));
        assert_eq!(option_letter("Accuracy"), None);
    }

    #[test]
    fn test_split_selections() {
        assert_eq!(split_selections("A,b ; c，"), vec!["A", "B", "C"]);
        assert!(split_selections(" , ").is_empty());
    }
}
