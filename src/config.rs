/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 评分后端 API 基础地址
    pub api_base_url: String,
    /// 单个请求超时（秒）
    pub request_timeout_secs: u64,
    /// 同时评分的提交数量
    pub max_concurrent_submissions: usize,
    /// 批量评分 TOML 文件存放目录
    pub data_folder: String,
    /// 评分报告文件（每行一个 JSON）
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 评分标准总分与各项分值之和不一致时是否拒绝
    pub strict_rubric_totals: bool,
    /// 只评分姓名或学号包含该词的学生
    pub student_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/api".to_string(),
            request_timeout_secs: 30,
            max_concurrent_submissions: 8,
            data_folder: "grading_batches".to_string(),
            report_file: "grading_report.jsonl".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            strict_rubric_totals: false,
            student_filter: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("GRADER_API_URL").unwrap_or(default.api_base_url),
            request_timeout_secs: std::env::var("GRADER_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_concurrent_submissions: std::env::var("MAX_CONCURRENT_SUBMISSIONS").ok().and_then(|v| v.parse().ok()).filter(|n: &usize| *n > 0).unwrap_or(default.max_concurrent_submissions),
            data_folder: std::env::var("GRADER_DATA_FOLDER").unwrap_or(default.data_folder),
            report_file: std::env::var("GRADER_REPORT_FILE").unwrap_or(default.report_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            strict_rubric_totals: std::env::var("STRICT_RUBRIC_TOTALS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.strict_rubric_totals),
            student_filter: std::env::var("GRADER_STUDENT_FILTER").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    /// 指定后端地址，其余使用默认值
    pub fn with_api_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }
}
