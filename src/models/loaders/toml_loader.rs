use crate::error::FileError;
use crate::models::assignment::GradingBatch;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一个批量评分任务
pub async fn load_grading_batch(toml_file_path: &Path) -> Result<GradingBatch, FileError> {
    let path_str = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path_str.clone(),
            source,
        })?;

    let batch: GradingBatch = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
        path: path_str.clone(),
        source,
    })?;

    Ok(batch.with_file_path(path_str))
}

/// 加载文件夹中所有 TOML 批量评分文件
///
/// 单个文件解析失败只记录警告，不影响其他文件。按文件名排序以保证顺序稳定。
pub async fn load_all_grading_batches(folder_path: &str) -> Result<Vec<GradingBatch>, FileError> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        });
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: folder_path.to_string(),
            source,
        })?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| FileError::ReadFailed {
            path: folder_path.to_string(),
            source,
        })?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut batches = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_grading_batch(&path).await {
            Ok(batch) => {
                tracing::info!(
                    "成功加载作业「{}」: {} 道题, {} 份提交",
                    batch.assignment.title,
                    batch.assignment.questions.len(),
                    batch.submissions.len()
                );
                batches.push(batch);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: &str = r#"
[assignment]
id = "ml-quiz-1"
title = "Machine Learning Quiz"
description = "Week 3"

[[assignment.questions]]
id = "q1"
text = "Compute the mean of 2, 4, 6."
answerType = "numerical"
expectedAnswer = "4"
points = 1

[[assignment.questions.rubric.additionCriteria]]
id = "a1"
text = "Correct answer"
points = 1

[[submissions]]
id = "s1"
studentName = "Alice Chen"
studentId = "S1001"
submissionDate = "2024-03-14T09:30:00Z"
type = "manual"

[[submissions.answers]]
questionId = "q1"
answer = "4"
"#;

    #[tokio::test]
    async fn test_load_batch_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quiz.toml"), BATCH).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let batches = load_all_grading_batches(dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.assignment.id, "ml-quiz-1");
        assert_eq!(batch.assignment.questions[0].max_score(), 1.0);
        assert_eq!(batch.submissions[0].answers[0].answer, "4");
        assert!(batch.file_path.as_deref().unwrap().ends_with("quiz.toml"));
    }

    #[tokio::test]
    async fn test_missing_folder() {
        let result = load_all_grading_batches("/definitely/not/here").await;
        assert!(matches!(result, Err(FileError::DirectoryNotFound { .. })));
    }

    #[tokio::test]
    async fn test_parse_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[assignment]\nid = 1\n").unwrap();

        let err = load_grading_batch(&path).await.unwrap_err();
        assert!(matches!(err, FileError::TomlParseFailed { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
