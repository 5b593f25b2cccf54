pub mod assignment;
pub mod grade;
pub mod loaders;
pub mod question;
pub mod rubric;
pub mod serde_helpers;
pub mod submission;

pub use assignment::{Assignment, AssignmentList, GradingBatch};
pub use grade::{AppliedCriterion, AutoGradeResponse, Grade, Provenance, SubmissionGrades};
pub use loaders::{load_all_grading_batches, load_grading_batch};
pub use question::{AnswerType, ChoiceOption, Criterion, Question, QuestionRubric};
pub use rubric::{CriterionScore, GradingResult, Rubric, RubricCriterion};
pub use submission::{filter_submissions, StudentAnswer, Submission, SubmissionType};
