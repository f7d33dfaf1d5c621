use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 优雅停机管理器
#[derive(Debug, Clone)]
pub struct GracefulShutdown {
    /// 取消令牌，用于通知所有任务停止
    pub token: CancellationToken,
}

impl GracefulShutdown {
    /// 创建新的优雅停机管理器
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// 等待停机信号（SIGINT, SIGTERM）
    pub async fn wait_for_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                return;
            }
            _ = ctrl_c => {
                info!("Received Ctrl+C signal");
            }
            _ = terminate => {
                info!("Received SIGTERM signal");
            }
        }

        info!("Initiating graceful shutdown...");
        self.token.cancel();
    }

    /// 主动触发停机
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// 创建一个子令牌，用于特定的任务
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// 等待停机信号
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// 等待任务结束，超时则中止
pub async fn join_with_timeout<T>(handle: tokio::task::JoinHandle<T>, timeout: Duration) -> Option<T> {
    let abort = handle.abort_handle();
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(error = %e, "Task ended abnormally");
            None
        }
        Err(_) => {
            warn!(?timeout, "Timeout waiting for task to complete, aborting");
            abort.abort();
            None
        }
    }
}
