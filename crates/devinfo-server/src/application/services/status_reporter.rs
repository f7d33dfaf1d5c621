use chrono::{DateTime, Utc};
use devinfo_core::error::Result;
use std::sync::Arc;

use crate::application::ports::FactCollectorPort;
use crate::domain::{ProcessClock, SystemFacts, UptimeReport};

/// 状态报告服务
///
/// 只持有不可变的启动时间与无状态的采集器，可在请求间安全共享。
#[derive(Clone)]
pub struct StatusReporter {
    clock: ProcessClock,
    collector: Arc<dyn FactCollectorPort>,
}

impl StatusReporter {
    pub fn new(clock: ProcessClock, collector: Arc<dyn FactCollectorPort>) -> Self {
        Self { clock, collector }
    }

    pub fn clock(&self) -> &ProcessClock {
        &self.clock
    }

    /// 当前运行时长
    pub fn uptime(&self) -> UptimeReport {
        self.uptime_at(Utc::now())
    }

    /// 截至指定时刻的运行时长
    pub fn uptime_at(&self, now: DateTime<Utc>) -> UptimeReport {
        UptimeReport::from_seconds(self.clock.elapsed_seconds(now))
    }

    /// 采集主机信息（不缓存）
    pub async fn system_facts(&self) -> Result<SystemFacts> {
        self.collector.collect().await
    }
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCollector {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FactCollectorPort for CountingCollector {
        async fn collect(&self) -> Result<SystemFacts> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SystemFacts {
                hostname: format!("host-{}", n),
                platform: "Linux".to_string(),
                platform_version: "22.04".to_string(),
                architecture: "x86_64".to_string(),
                cpu_count: 4,
                rust_version: "1.80.0".to_string(),
            })
        }
    }

    fn reporter_started_at(start: DateTime<Utc>) -> (StatusReporter, Arc<CountingCollector>) {
        let collector = Arc::new(CountingCollector {
            calls: AtomicUsize::new(0),
        });
        let reporter = StatusReporter::new(ProcessClock::started_at(start), collector.clone());
        (reporter, collector)
    }

    #[test]
    fn test_uptime_difference_matches_elapsed_time() {
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let (reporter, _) = reporter_started_at(start);

        let first = reporter.uptime_at(start + Duration::seconds(42));
        for t in [0_i64, 1, 59, 3600, 86_400] {
            let later = reporter.uptime_at(start + Duration::seconds(42 + t));
            assert_eq!(later.seconds - first.seconds, t as u64);
        }
    }

    #[test]
    fn test_uptime_human_is_derived_from_seconds() {
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let (reporter, _) = reporter_started_at(start);

        let report = reporter.uptime_at(start + Duration::seconds(3660));
        assert_eq!(report.seconds, 3660);
        assert_eq!(report.human, "1 hour, 1 minute");
    }

    #[test]
    fn test_uptime_now_is_non_negative_and_small() {
        let (reporter, _) = reporter_started_at(Utc::now());
        assert!(reporter.uptime().seconds < 5);
    }

    #[tokio::test]
    async fn test_system_facts_are_not_cached() {
        let (reporter, collector) = reporter_started_at(Utc::now());

        let first = reporter.system_facts().await.unwrap();
        let second = reporter.system_facts().await.unwrap();

        assert_eq!(collector.calls.load(Ordering::SeqCst), 2);
        assert_ne!(first.hostname, second.hostname);
    }
}
