//! 分数汇总
//!
//! 全部是纯函数：输入评分项勾选状态或各提交总分，输出题目得分和班级统计。

use crate::models::{AppliedCriterion, Criterion, Grade};
use crate::scoring::letter_grade::LetterGrade;
use serde::{Deserialize, Serialize};

/// 由勾选的评分项计算单题得分
///
/// 已勾选加分项之和减去已勾选扣分项绝对值之和，最低为 0。不设上限。
pub fn score_from_criteria(addition: &[AppliedCriterion], deduction: &[AppliedCriterion]) -> f64 {
    let added: f64 = addition
        .iter()
        .filter(|c| c.applied)
        .map(AppliedCriterion::points)
        .sum();
    let deducted: f64 = deduction
        .iter()
        .filter(|c| c.applied)
        .map(|c| c.points().abs())
        .sum();

    (added - deducted).max(0.0)
}

/// 加分项满分
pub fn max_score(addition: &[Criterion]) -> f64 {
    addition.iter().map(|c| c.points).sum()
}

/// 提交总分
pub fn total_score(grades: &[Grade]) -> f64 {
    grades.iter().map(|g| g.score).sum()
}

/// 百分比；总分为 0 时返回 0
pub fn percentage(score: f64, total_points: f64) -> f64 {
    if total_points <= 0.0 || !total_points.is_finite() || !score.is_finite() {
        return 0.0;
    }
    score / total_points * 100.0
}

/// 取整后的百分比
pub fn rounded_percentage(score: f64, total_points: f64) -> u32 {
    percentage(score, total_points).round().max(0.0) as u32
}

/// 单个等级的人数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBucket {
    pub grade: LetterGrade,
    pub count: usize,
    /// 占全班比例（取整百分比）
    pub share: u32,
}

/// 班级统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortStats {
    pub count: usize,
    pub total_points: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    /// A 到 F 依次排列
    pub distribution: Vec<GradeBucket>,
}

impl CohortStats {
    pub fn count_of(&self, grade: LetterGrade) -> usize {
        self.distribution
            .iter()
            .find(|b| b.grade == grade)
            .map_or(0, |b| b.count)
    }

    pub fn average_percentage(&self) -> u32 {
        rounded_percentage(self.average, self.total_points)
    }
}

/// 汇总一批提交的总分
pub fn cohort_stats(totals: &[f64], total_points: f64) -> CohortStats {
    let count = totals.len();

    let (average, max, min) = if count == 0 {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = totals.iter().sum();
        let max = totals.iter().copied().fold(f64::MIN, f64::max);
        let min = totals.iter().copied().fold(f64::MAX, f64::min);
        (sum / count as f64, max, min)
    };

    let mut counts = [0usize; 5];
    for &score in totals {
        let grade = LetterGrade::from_score(score, total_points);
        if let Some(idx) = LetterGrade::ALL.iter().position(|g| *g == grade) {
            counts[idx] += 1;
        }
    }

    let distribution = LetterGrade::ALL
        .iter()
        .zip(counts)
        .map(|(&grade, count)| GradeBucket {
            grade,
            count,
            share: rounded_percentage(count as f64, totals.len() as f64),
        })
        .collect();

    CohortStats {
        count,
        total_points,
        average,
        max,
        min,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(id: &str, points: f64, applied: bool) -> AppliedCriterion {
        AppliedCriterion::new(Criterion::new(id, "criterion", points), applied)
    }

    #[test]
    fn test_only_applied_additions_count() {
        let addition = vec![applied("a1", 25.0, true), applied("a2", 25.0, false)];
        assert_eq!(score_from_criteria(&addition, &[]), 25.0);
    }

    #[test]
    fn test_deduction_sign_is_ignored() {
        let addition = vec![applied("a1", 10.0, true)];
        assert_eq!(score_from_criteria(&addition, &[applied("d1", -4.0, true)]), 6.0);
        assert_eq!(score_from_criteria(&addition, &[applied("d1", 4.0, true)]), 6.0);
        assert_eq!(score_from_criteria(&addition, &[applied("d1", 4.0, false)]), 10.0);
    }

    #[test]
    fn test_never_negative() {
        let point_values: [f64; 7] = [0.0, 0.5, 1.0, 3.0, 10.0, -2.0, -7.5];
        for &a in &point_values {
            for &d in &point_values {
                for mask in 0..4u8 {
                    let addition = vec![applied("a1", a.abs(), mask & 1 == 1)];
                    let deduction = vec![applied("d1", d, mask & 2 == 2), applied("d2", d, true)];
                    let score = score_from_criteria(&addition, &deduction);
                    assert!(score >= 0.0, "a={} d={} mask={} -> {}", a, d, mask, score);
                }
            }
        }
    }

    #[test]
    fn test_no_upper_clamp() {
        let addition = vec![applied("a1", 5.0, true), applied("a2", 5.0, true)];
        assert_eq!(score_from_criteria(&addition, &[]), 10.0);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(10.0, 0.0), 0.0);
        assert_eq!(rounded_percentage(10.0, 0.0), 0);
        assert!(percentage(0.0, 0.0).is_finite());
    }

    #[test]
    fn test_empty_cohort() {
        let stats = cohort_stats(&[], 100.0);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.min, 0.0);
        assert!(stats.distribution.iter().all(|b| b.count == 0 && b.share == 0));
    }

    #[test]
    fn test_cohort_distribution() {
        let stats = cohort_stats(&[95.0, 89.0, 90.0, 60.0, 59.0, 72.0, 81.0, 40.0], 100.0);
        assert_eq!(stats.count, 8);
        assert_eq!(stats.max, 95.0);
        assert_eq!(stats.min, 40.0);
        assert!((stats.average - 73.25).abs() < 1e-9);
        assert_eq!(stats.count_of(LetterGrade::A), 2);
        assert_eq!(stats.count_of(LetterGrade::B), 2);
        assert_eq!(stats.count_of(LetterGrade::C), 1);
        assert_eq!(stats.count_of(LetterGrade::D), 1);
        assert_eq!(stats.count_of(LetterGrade::F), 2);
        assert_eq!(stats.distribution[0].share, 25);
        assert_eq!(stats.average_percentage(), 73);
    }

    #[test]
    fn test_cohort_zero_total_points() {
        let stats = cohort_stats(&[3.0, 4.0], 0.0);
        assert_eq!(stats.count_of(LetterGrade::F), 2);
        assert_eq!(stats.average_percentage(), 0);
    }
}
