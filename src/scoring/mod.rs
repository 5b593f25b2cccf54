//! 计分层
//!
//! 不依赖网络和文件，只做加减和统计。

pub mod aggregator;
pub mod letter_grade;

pub use aggregator::{
    cohort_stats, max_score, percentage, rounded_percentage, score_from_criteria, total_score,
    CohortStats, GradeBucket,
};
pub use letter_grade::LetterGrade;
