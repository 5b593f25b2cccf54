//! 评分报告写入服务 - 业务能力层
//!
//! 只负责"把一条记录追加到报告文件"能力，不关心流程

use crate::error::FileError;
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 报告写入服务
///
/// 每条记录序列化为一行 JSON 追加到报告文件。
pub struct ReportWriter {
    report_path: String,
}

impl ReportWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    /// 追加一条记录
    pub async fn append<T: Serialize>(&self, record: &T) -> Result<(), FileError> {
        let write_failed = |source: std::io::Error| FileError::WriteFailed {
            path: self.report_path.clone(),
            source,
        };

        let mut line = serde_json::to_string(record).map_err(|e| write_failed(e.into()))?;
        line.push('\n');

        debug!("写入报告: {} ({} 字节)", self.report_path, line.len());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_path)
            .await
            .map_err(write_failed)?;

        file.write_all(line.as_bytes()).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        Ok(())
    }
}
