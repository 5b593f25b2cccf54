//! # Rubric Grader
//!
//! 按评分细则给学生作业打分的辅助工具
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据层（Models / Scoring）
//! - `models/` - 作业、题目、提交、评分细则和成绩的数据结构
//! - `scoring/` - 纯计算：细则加减分、总分、百分比、等级、班级统计
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `BackendGateway` - 评分后端的唯一入口，错误统一归类
//! - `AnswerChecker` - 本地判断答案对错
//! - `ReportWriter` - 写评分报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份提交"的完整评分流程
//! - `SubmissionCtx` - 上下文封装（assignment_id + submission_id）
//! - `GradingSession` - 自动评分、本地兜底、人工修改
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量作业处理器，管理资源
//! - `orchestrator/assignment_processor` - 单份作业处理器，并发评分提交
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod scoring;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ErrorEnvelope, GatewayError};
pub use models::{Assignment, GradingBatch, Rubric, Submission};
pub use orchestrator::{process_assignment, App, AssignmentReport, RunStats};
pub use services::BackendGateway;
pub use workflow::{GradingSession, SubmissionCtx};
