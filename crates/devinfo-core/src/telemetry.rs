use crate::config::TelemetryConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,  // trace|debug|info|warn|error
    pub format: String, // text|json
    pub no_ansi: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<&LogConfig> for (LogLevel, LogFormat) {
    fn from(cfg: &LogConfig) -> Self {
        let level = match cfg.level.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        };
        let format = if cfg.format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        };
        (level, format)
    }
}

impl LogConfig {
    /// 由遥测配置与实际生效的日志级别构建
    pub fn from_telemetry(telemetry: &TelemetryConfig, level: &str) -> Self {
        Self {
            level: level.to_string(),
            format: telemetry.log_format.clone(),
            no_ansi: telemetry.log_no_ansi,
        }
    }
}

/// 使用提供的配置初始化 tracing；重复调用时保留第一次的订阅者
pub fn init_tracing_with(cfg: &LogConfig) {
    let (lvl_enum, fmt_enum): (LogLevel, LogFormat) = cfg.into();

    let filter = EnvFilter::new(lvl_enum.as_filter());
    let base = fmt::layer().with_target(true).with_ansi(!cfg.no_ansi);
    let fmt_layer = match fmt_enum {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Text => base
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
