use devinfo_core::UNKNOWN_PLACEHOLDER;
use devinfo_core::error::{CoreError, Result};
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use tracing::{debug, warn};

use crate::application::ports::FactCollectorPort;
use crate::domain::SystemFacts;

/// 编译期记录的 `rustc --version` 输出，可能为空
const RUSTC_VERSION_RAW: &str = env!("DEVINFO_RUSTC_VERSION");

/// 基于 sysinfo 的主机信息采集器
#[derive(Debug, Default)]
pub struct SystemMonitor;

impl SystemMonitor {
    pub fn new() -> Self {
        Self
    }

    fn snapshot() -> SystemFacts {
        // 只刷新 CPU 列表，避免每次请求做全量刷新
        let sys = System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::new()));

        let raw = RawFacts {
            hostname: System::host_name(),
            platform: Some(os_family(std::env::consts::OS)),
            platform_version: System::kernel_version(),
            architecture: System::cpu_arch(),
            cpu_count: Some(sys.cpus().len()).filter(|n| *n > 0),
            rust_version: parse_rustc_version(RUSTC_VERSION_RAW),
        };

        raw.resolve()
    }
}

#[async_trait::async_trait]
impl FactCollectorPort for SystemMonitor {
    async fn collect(&self) -> Result<SystemFacts> {
        let facts = tokio::task::spawn_blocking(Self::snapshot)
            .await
            .map_err(|e| CoreError::internal(format!("fact collection task failed: {}", e)))?;

        debug!(
            hostname = %facts.hostname,
            platform = %facts.platform,
            cpu_count = facts.cpu_count,
            "Collected system facts"
        );

        Ok(facts)
    }
}

/// 操作系统的原始应答，`None` 表示该字段查询失败
#[derive(Debug, Default, Clone)]
pub(crate) struct RawFacts {
    pub hostname: Option<String>,
    pub platform: Option<String>,
    pub platform_version: Option<String>,
    pub architecture: Option<String>,
    pub cpu_count: Option<usize>,
    pub rust_version: Option<String>,
}

impl RawFacts {
    /// 缺失字段填入占位值并记录 warn，不中断整体响应
    pub(crate) fn resolve(self) -> SystemFacts {
        let architecture = match non_empty(self.architecture) {
            Some(arch) => arch,
            None => {
                warn!(
                    field = "architecture",
                    fallback = std::env::consts::ARCH,
                    "System fact unavailable, using compile-time target"
                );
                std::env::consts::ARCH.to_string()
            }
        };

        let cpu_count = match self.cpu_count {
            Some(count) => count,
            None => {
                let fallback = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(0);
                warn!(
                    field = "cpu_count",
                    fallback,
                    "System fact unavailable, using fallback"
                );
                fallback
            }
        };

        SystemFacts {
            hostname: or_placeholder("hostname", self.hostname),
            platform: or_placeholder("platform", self.platform),
            platform_version: or_placeholder("platform_version", self.platform_version),
            architecture,
            cpu_count,
            rust_version: or_placeholder("rust_version", self.rust_version),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn or_placeholder(field: &'static str, value: Option<String>) -> String {
    non_empty(value).unwrap_or_else(|| {
        warn!(
            field,
            fallback = UNKNOWN_PLACEHOLDER,
            "System fact unavailable, using placeholder"
        );
        UNKNOWN_PLACEHOLDER.to_string()
    })
}

/// 操作系统家族名，与发行版无关："linux" -> "Linux"、"macos" -> "Darwin"
pub(crate) fn os_family(target_os: &str) -> String {
    match target_os {
        "linux" => "Linux".to_string(),
        "windows" => "Windows".to_string(),
        "macos" | "ios" => "Darwin".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "openbsd" => "OpenBSD".to_string(),
        "netbsd" => "NetBSD".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// "rustc 1.80.0 (051478957 2024-07-21)" -> "1.80.0"
pub(crate) fn parse_rustc_version(raw: &str) -> Option<String> {
    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("rustc"), Some(version)) => Some(version.to_string()),
        _ => None,
    }
}
