use anyhow::{Context, Result};
use devinfo_core::SHUTDOWN_GRACE_PERIOD_SECS;
use devinfo_core::config::DevinfoConfig;
use devinfo_core::shutdown::{GracefulShutdown, join_with_timeout};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::ports::FactCollectorPort;
use crate::application::services::StatusReporter;
use crate::domain::{ProcessClock, iso_timestamp};
use crate::infrastructure::system::SystemMonitor;
use crate::interface::http::{AppState, build_router};

/// 服务器启动器 - 负责整个应用程序的引导过程
pub struct ServerBootstrapper {
    config: DevinfoConfig,
    clock: ProcessClock,
    collector: Arc<dyn FactCollectorPort>,
    shutdown: GracefulShutdown,
    install_signal_handler: bool,
}

/// 运行中的服务器实例
pub struct RunningServer {
    local_addr: SocketAddr,
    handle: JoinHandle<std::io::Result<()>>,
    shutdown: GracefulShutdown,
}

impl ServerBootstrapper {
    /// 创建新的服务器启动器，默认使用 sysinfo 采集主机信息
    pub fn new(config: DevinfoConfig, clock: ProcessClock) -> Self {
        Self {
            config,
            clock,
            collector: Arc::new(SystemMonitor::new()),
            shutdown: GracefulShutdown::new(),
            install_signal_handler: true,
        }
    }

    /// 替换主机信息采集器
    pub fn with_collector(mut self, collector: Arc<dyn FactCollectorPort>) -> Self {
        self.collector = collector;
        self
    }

    /// 不监听 SIGINT/SIGTERM，由调用方通过 `RunningServer::shutdown_handle` 停机
    pub fn without_signal_handler(mut self) -> Self {
        self.install_signal_handler = false;
        self
    }

    /// 启动服务器，返回运行中的实例
    pub async fn start(self) -> Result<RunningServer> {
        let bind_address = self.config.bind_address();
        info!(
            bind = %bind_address,
            debug = self.config.debug,
            started_at = %iso_timestamp(self.clock.start_time()),
            "devinfo server starting"
        );

        let listener = TcpListener::bind(&bind_address)
            .await
            .with_context(|| format!("Failed to bind {}", bind_address))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read local address")?;

        let reporter = StatusReporter::new(self.clock, self.collector.clone());
        let app = build_router(AppState::new(reporter));

        if self.install_signal_handler {
            self.setup_signal_handler();
        }

        let token = self.shutdown.child_token();
        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
        });

        info!(%local_addr, "devinfo server listening");

        Ok(RunningServer {
            local_addr,
            handle,
            shutdown: self.shutdown,
        })
    }

    /// 设置信号处理器
    fn setup_signal_handler(&self) {
        let shutdown_signal = self.shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal.wait_for_signal().await;
        });
    }
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 用于主动触发停机的句柄
    pub fn shutdown_handle(&self) -> GracefulShutdown {
        self.shutdown.clone()
    }

    /// 等待停机信号并等待在途请求完成
    pub async fn wait_for_shutdown(mut self) -> Result<()> {
        tokio::select! {
            _ = self.shutdown.cancelled() => {}
            res = &mut self.handle => {
                // 服务在收到停机信号前退出
                return match res {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e).context("HTTP server failed"),
                    Err(e) => Err(e).context("HTTP server task panicked"),
                };
            }
        }

        let grace = Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS);
        match join_with_timeout(self.handle, grace).await {
            Some(Err(e)) => return Err(e).context("HTTP server failed during shutdown"),
            Some(Ok(())) => {}
            None => warn!("HTTP server did not stop within {:?}", grace),
        }

        info!("devinfo server shut down gracefully.");
        Ok(())
    }
}
