use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 可观测性配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// 过滤级别
    ///
    /// 支持 EnvFilter 语法（如 "info,reqwest=warn"）。默认值 "info"。
    /// `RUST_LOG` 环境变量优先。
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// 日志配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 日志输出目标
    ///
    /// - "console": 仅输出到控制台（默认）
    /// - "file": 输出到文件
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志轮转开关
    ///
    /// 当 output = "file" 时有效：
    /// - true: 按天轮转日志文件
    /// - false: 追加到单个文件
    #[serde(default)]
    pub rotate: bool,

    /// 日志文件目录
    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter_level: default_filter_level(),
            log: LogConfig::default(),
            extensions: Map::new(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: default_log_output(),
            rotate: false,
            path: default_log_path(),
            extensions: Map::new(),
        }
    }
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs/".to_string()
}

fn default_filter_level() -> String {
    "info".to_string()
}

impl ObservabilityConfig {
    pub fn is_console_logging(&self) -> bool {
        self.log.output == "console"
    }

    pub fn should_rotate_logs(&self) -> bool {
        self.log.output == "file" && self.log.rotate
    }

    /// 获取过滤级别，优先使用 RUST_LOG
    pub fn get_filter_level(&self) -> String {
        std::env::var("RUST_LOG")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.filter_level.clone())
    }

    pub(crate) fn collect_problems(&self, errors: &mut Vec<String>) {
        let main_level = self.filter_level.split(',').next().unwrap_or("").trim();
        if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
            errors.push(format!(
                "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                self.filter_level
            ));
        }

        if !["console", "file"].contains(&self.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.log.output
            ));
        }

        if self.log.output == "file" && self.log.path.trim().is_empty() {
            errors.push("observability.log.path cannot be empty when logging to file".to_string());
        }
    }
}
