use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// 进程启动时间，启动时捕获一次，之后只读
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessClock {
    start_time: DateTime<Utc>,
}

impl ProcessClock {
    /// 以当前时间作为启动时间
    pub fn start_now() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self { start_time }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// 截至 `now` 的运行时长（整秒）；时钟回拨时记为 0
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.start_time).num_seconds()).unwrap_or(0)
    }
}

/// 运行时长报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UptimeReport {
    pub seconds: u64,
    pub human: String,
}

impl UptimeReport {
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds,
            human: format_uptime(seconds),
        }
    }
}

/// "H hours, M minutes"：不足一分钟的部分直接舍去，不进位；没有天数分量
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!(
        "{} {}, {} {}",
        hours,
        plural(hours, "hour"),
        minutes,
        plural(minutes, "minute")
    )
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

/// 主机信息快照，每次请求重新采集
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFacts {
    pub hostname: String,
    pub platform: String,
    pub platform_version: String,
    pub architecture: String,
    pub cpu_count: usize,
    pub rust_version: String,
}

/// 单次请求的只读上下文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub client_ip: String,
    pub user_agent: String,
    pub method: String,
    pub path: String,
}

/// 对外公布的接口描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn get(path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: "GET".to_string(),
            description: description.to_string(),
        }
    }
}

/// 已知接口列表，固定为 `/` 与 `/health`
pub fn known_endpoints() -> Vec<EndpointInfo> {
    vec![
        EndpointInfo::get("/", "Service information"),
        EndpointInfo::get("/health", "Health check"),
    ]
}

/// 服务元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub framework: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: SERVICE_DESCRIPTION.to_string(),
            framework: SERVICE_FRAMEWORK.to_string(),
        }
    }
}

pub const SERVICE_NAME: &str = "devops-info-service";
pub const SERVICE_DESCRIPTION: &str = "DevOps course info service";
pub const SERVICE_FRAMEWORK: &str = "axum";

/// ISO-8601，UTC，固定 `+00:00` 偏移与微秒精度
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}
