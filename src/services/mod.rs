pub mod answer_checker;
pub mod gateway;
pub mod report_writer;

pub use answer_checker::AnswerChecker;
pub use gateway::{BackendGateway, HealthStatus};
pub use report_writer::ReportWriter;
