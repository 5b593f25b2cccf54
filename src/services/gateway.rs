//! 评分后端网关 - 业务能力层
//!
//! 只负责把请求转发给外部评分服务并归一化失败，不关心评分流程。

use crate::config::Config;
use crate::error::{ConfigError, GatewayError};
use crate::models::{
    Assignment, AssignmentList, AutoGradeResponse, GradingResult, Rubric, StudentAnswer,
};
use crate::utils::logging::truncate_text;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, warn};

/// 健康检查结果，永远不会是错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl HealthStatus {
    fn down(detail: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            ok: false,
            detail: Some(detail.into()),
            status_code,
            data: None,
        }
    }
}

/// 评分后端网关
///
/// 职责：
/// - 生成评分标准、文本评分、自动评分、作业查询、健康检查
/// - 所有失败转换为 `GatewayError`，调用方据此决定是否兜底
/// - 在边界上校验返回的数据
#[derive(Clone)]
pub struct BackendGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendGateway {
    /// 创建新的网关
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let base_url = Url::parse(config.api_base_url.trim())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidBaseUrl {
                url: config.api_base_url.clone(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ConfigError::ClientBuildFailed)?;

        Ok(Self { client, base_url })
    }

    /// 根据内容生成评分标准
    pub async fn generate_rubric(&self, content: &str) -> Result<Rubric, GatewayError> {
        let endpoint = self.endpoint(&["generate-rubric"]);
        debug!("生成评分标准，内容长度: {} 字符", content.len());

        let rubric: Rubric = self.post_json(&endpoint, &json!({ "content": content })).await?;

        if rubric.criteria.iter().any(|c| !c.points.is_finite()) || !rubric.total_points.is_finite() {
            return Err(GatewayError::InvalidPayload {
                endpoint,
                reason: "评分标准分值不是有限数".to_string(),
            });
        }

        Ok(rubric)
    }

    /// 按评分标准对一份文本作答评分
    pub async fn grade_submission(
        &self,
        submission: &str,
        rubric: &Rubric,
        rubric_id: Option<&str>,
    ) -> Result<GradingResult, GatewayError> {
        let endpoint = self.endpoint(&["grade-submission"]);
        let body = json!({
            "submission": submission,
            "rubric": rubric,
            "rubricId": rubric_id,
        });

        let result: GradingResult = self.post_json(&endpoint, &body).await?;

        if !result.total_score.is_finite() || result.total_score < 0.0 {
            return Err(GatewayError::InvalidPayload {
                endpoint,
                reason: format!("总分不合法: {}", result.total_score),
            });
        }

        Ok(result)
    }

    /// 后端自动评分
    pub async fn auto_grade(
        &self,
        submission_id: &str,
        assignment_id: &str,
        answers: &[StudentAnswer],
    ) -> Result<AutoGradeResponse, GatewayError> {
        let endpoint = self.endpoint(&["submissions", submission_id, "auto-grade"]);
        let body = json!({
            "assignmentId": assignment_id,
            "answers": answers,
        });

        let response: AutoGradeResponse = self.post_json(&endpoint, &body).await?;

        if let Some(bad) = response
            .grades
            .iter()
            .find(|g| !g.score.is_finite() || g.score < 0.0 || !g.max_score.is_finite())
        {
            return Err(GatewayError::InvalidPayload {
                endpoint,
                reason: format!("题目 {} 的分数不合法: {}", bad.question_id, bad.score),
            });
        }

        Ok(response)
    }

    /// 作业列表，未通过校验的作业会被丢弃
    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, GatewayError> {
        let endpoint = self.endpoint(&["assignments"]);
        let list: AssignmentList = self.get_json(&endpoint).await?;

        let assignments = list
            .assignments
            .into_iter()
            .filter(|a| match a.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("⚠️ 丢弃不合法的作业 {}: {}", a.id, e);
                    false
                }
            })
            .collect();

        Ok(assignments)
    }

    /// 获取单个作业
    pub async fn get_assignment(&self, assignment_id: &str) -> Result<Assignment, GatewayError> {
        let endpoint = self.endpoint(&["assignments", assignment_id]);
        let assignment: Assignment = self.get_json(&endpoint).await?;

        assignment
            .validate()
            .map_err(|e| GatewayError::InvalidPayload {
                endpoint,
                reason: e.to_string(),
            })?;

        Ok(assignment)
    }

    /// 健康检查
    pub async fn check_health(&self) -> HealthStatus {
        let endpoint = self.endpoint(&["health"]);
        debug!("检查后端健康状态: {}", endpoint);

        let response = match self.client.get(&endpoint).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("后端健康检查失败: {}", e);
                return HealthStatus::down(format!("无法连接评分后端: {}", e), None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("后端健康检查返回状态: {}", status);
            let detail = if status == StatusCode::NOT_FOUND {
                "健康检查接口不存在"
            } else if status.is_server_error() {
                "评分后端服务器错误"
            } else {
                "评分后端不可用"
            };
            return HealthStatus::down(detail, Some(status.as_u16()));
        }

        match read_body::<JsonValue>(&endpoint, response).await {
            Ok(data) => HealthStatus {
                ok: true,
                detail: None,
                status_code: Some(status.as_u16()),
                data: Some(data),
            },
            Err(e) => {
                warn!("健康检查响应无法解析: {}", e);
                HealthStatus::down("评分后端响应无效", Some(status.as_u16()))
            }
        }
    }

    // ========== 辅助函数 ==========

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(endpoint)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| GatewayError::Unreachable {
                endpoint: endpoint.to_string(),
                source,
            })?;

        read_json(endpoint, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, GatewayError> {
        let response = self
            .client
            .get(endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| GatewayError::Unreachable {
                endpoint: endpoint.to_string(),
                source,
            })?;

        read_json(endpoint, response).await
    }
}

/// 检查状态码并解析响应体
async fn read_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("后端返回错误状态 {} ({})", status, endpoint);
        return Err(GatewayError::HttpStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    read_body(endpoint, response).await
}

async fn read_body<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, GatewayError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| GatewayError::Unreachable {
            endpoint: endpoint.to_string(),
            source,
        })?;

    serde_json::from_slice(&bytes).map_err(|source| GatewayError::MalformedResponse {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// 从错误响应体中提取提示信息：优先 JSON 的 `message` 字段，否则截断原文
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<JsonValue>(body).ok().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });

    Some(from_json.unwrap_or_else(|| truncate_text(body.trim(), 200)))
}
