use serde::{Deserialize, Serialize};
use std::fmt;

/// 等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// 从高到低
    pub const ALL: [LetterGrade; 5] = [
        LetterGrade::A,
        LetterGrade::B,
        LetterGrade::C,
        LetterGrade::D,
        LetterGrade::F,
    ];

    /// 按取整后的百分比划分等级
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => LetterGrade::A,
            80..=89 => LetterGrade::B,
            70..=79 => LetterGrade::C,
            60..=69 => LetterGrade::D,
            _ => LetterGrade::F,
        }
    }

    /// 分数换算为等级
    pub fn from_score(score: f64, total_points: f64) -> Self {
        Self::from_percentage(super::rounded_percentage(score, total_points))
    }

    /// 显示用标签
    pub fn label(self) -> &'static str {
        match self {
            LetterGrade::A => "A (90-100%)",
            LetterGrade::B => "B (80-89%)",
            LetterGrade::C => "C (70-79%)",
            LetterGrade::D => "D (60-69%)",
            LetterGrade::F => "F (0-59%)",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        f.write_str(letter)
    }
}
