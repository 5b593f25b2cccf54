//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量评分和流程调度。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量作业处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载作业（Vec<GradingBatch>）
//! - 持有后端网关和报告写入器
//! - 输出全局统计信息
//!
//! ### `assignment_processor` - 单份作业处理器
//! - 校验作业和总分
//! - 为每份提交创建 GradingSession，Semaphore 控制并发
//! - 输出单份作业的班级统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<GradingBatch>)
//!     ↓
//! assignment_processor (处理 Vec<Submission>)
//!     ↓
//! workflow::GradingSession (处理单份 Submission)
//!     ↓
//! services (能力层：gateway / answer_checker / report_writer)
//! ```

pub mod assignment_processor;
pub mod batch_processor;

pub use assignment_processor::{process_assignment, AssignmentReport, SubmissionSummary};
pub use batch_processor::{App, RunStats};
